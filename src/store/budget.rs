//! The budget store: planned amounts per category, keyed by period.
//!
//! Numeric input is filtered, not validated: a raw value that does not look
//! like a plain decimal literal is dropped without mutating anything and
//! without raising an error. This mirrors how the input field behaved in the
//! original system and is a deliberate policy, not an error path.

use crate::api::{BudgetApi, UpsertPlannedAmountRequest};
use crate::model::{Amount, PeriodKey};
use crate::Result;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;
use tracing::debug;

pub struct BudgetStore {
    table: BTreeMap<PeriodKey, BTreeMap<String, Amount>>,
    api: Box<dyn BudgetApi + Send>,
}

impl BudgetStore {
    /// Creates an empty store over the given sync adapter.
    pub fn new(api: Box<dyn BudgetApi + Send>) -> Self {
        Self {
            table: BTreeMap::new(),
            api,
        }
    }

    /// The planned amounts recorded under `period`, by category. Unknown
    /// periods yield an empty map; this never fails.
    pub fn planned_amounts_for(&self, period: PeriodKey) -> BTreeMap<String, Amount> {
        self.table.get(&period).cloned().unwrap_or_default()
    }

    /// The period keys with at least one planned amount, in chronological
    /// order.
    pub fn periods(&self) -> Vec<PeriodKey> {
        self.table.keys().copied().collect()
    }

    /// Records `raw` as the planned amount for (`period`, `category`).
    ///
    /// Only strings shaped like a non-negative decimal literal (or the empty
    /// string, which reads as zero) are accepted; anything else is silently
    /// dropped and `Ok(false)` is returned. A conforming value updates local
    /// state first (last write wins), then requests the upsert from the
    /// remote store, which decides for itself whether the category already
    /// exists for the period.
    pub async fn set_planned_amount(
        &mut self,
        period: PeriodKey,
        category: impl Into<String>,
        raw: &str,
    ) -> Result<bool> {
        let category = category.into();
        let Some(value) = parse_planned_input(raw) else {
            debug!("dropping non-numeric planned amount input '{raw}' for {category}");
            return Ok(false);
        };

        self.table
            .entry(period)
            .or_default()
            .insert(category.clone(), Amount::new(value));

        let request = UpsertPlannedAmountRequest::new(period, category, value);
        self.api.upsert_planned_amount(&request).await?;
        Ok(true)
    }

    /// Replaces the entire local budget table with the remote snapshot. A
    /// full replace, not a merge.
    pub async fn load_all(&mut self) -> Result<()> {
        let snapshot = self.api.list_planned_amounts().await?;
        let mut table: BTreeMap<PeriodKey, BTreeMap<String, Amount>> = BTreeMap::new();
        for group in snapshot {
            let period: PeriodKey = group.month_year.parse()?;
            let amounts = table.entry(period).or_default();
            for record in group.planned_amounts {
                amounts.insert(record.category, Amount::new(record.amount));
            }
        }
        self.table = table;
        Ok(())
    }
}

/// Accepts "optional digits, one optional decimal point, optional digits" and
/// nothing else. Returns the parsed value, normalizing the fringe forms the
/// filter admits (`.5`, `5.`, `.`, empty) before handing them to `Decimal`.
fn parse_planned_input(raw: &str) -> Option<Decimal> {
    let mut dots = 0;
    for c in raw.chars() {
        match c {
            '0'..='9' => {}
            '.' => dots += 1,
            _ => return None,
        }
    }
    if dots > 1 {
        return None;
    }
    let normalized = match raw {
        "" | "." => "0".to_string(),
        s if s.starts_with('.') => format!("0{s}"),
        s if s.ends_with('.') => format!("{s}0"),
        s => s.to_string(),
    };
    Decimal::from_str(&normalized).ok()
}
