//! The read-side projection comparing planned and actual spend for one
//! period.

use crate::model::{Amount, TransactionEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

/// One row of the planned/actual/variance table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SummaryRow {
    pub category: String,
    pub planned: Amount,
    pub actual: Amount,
    /// Planned minus actual; negative when the category is over budget.
    pub difference: Amount,
}

/// Derives the summary table for one period from its entries and planned
/// amounts.
///
/// Rows are enumerated from the planned-amount keys: a category with
/// transactions but no planned entry does not appear (the summary is
/// budget-driven, not transaction-driven). Actual amounts sum the entries per
/// category, zero when there are none. No rounding is applied; display
/// precision is the caller's concern.
pub fn summarize(
    entries: &[TransactionEntry],
    planned: &BTreeMap<String, Amount>,
) -> Vec<SummaryRow> {
    let mut actuals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for entry in entries {
        *actuals.entry(entry.category()).or_default() += entry.amount().value();
    }

    planned
        .iter()
        .map(|(category, planned_amount)| {
            let actual = actuals.get(category.as_str()).copied().unwrap_or_default();
            SummaryRow {
                category: category.clone(),
                planned: *planned_amount,
                actual: Amount::new(actual),
                difference: Amount::new(planned_amount.value() - actual),
            }
        })
        .collect()
}
