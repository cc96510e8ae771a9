//! The session object that owns the ledger and budget stores.
//!
//! There is no module-level singleton: a `Session` is constructed explicitly
//! (empty maps), handed its sync adapters, and passed by reference to
//! whichever layer needs it. One session has exactly one active mutator.

use crate::api::{self, BudgetApi, Mode, TransactionApi};
use crate::model::PeriodKey;
use crate::store::{BudgetStore, LedgerStore};
use crate::summary::{summarize, SummaryRow};
use crate::{Config, Result};

pub struct Session {
    ledger: LedgerStore,
    budgets: BudgetStore,
}

impl Session {
    /// Creates a session with empty stores over the adapters selected by
    /// `mode`, using the config's failure policy for the ledger.
    pub fn new(config: &Config, mode: Mode) -> Result<Self> {
        Ok(Self {
            ledger: LedgerStore::with_policy(
                api::transaction_api(config, mode)?,
                config.sync_policy(),
            ),
            budgets: BudgetStore::new(api::budget_api(config, mode)?),
        })
    }

    /// Creates a session over explicitly provided adapters.
    pub(crate) fn with_apis(
        transaction_api: Box<dyn TransactionApi + Send>,
        budget_api: Box<dyn BudgetApi + Send>,
    ) -> Self {
        Self {
            ledger: LedgerStore::new(transaction_api),
            budgets: BudgetStore::new(budget_api),
        }
    }

    /// Loads both full snapshots from the remote store, replacing all local
    /// state.
    pub async fn load_all(&mut self) -> Result<()> {
        self.ledger.load_all().await?;
        self.budgets.load_all().await
    }

    pub fn ledger(&self) -> &LedgerStore {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut LedgerStore {
        &mut self.ledger
    }

    pub fn budgets(&self) -> &BudgetStore {
        &self.budgets
    }

    pub fn budgets_mut(&mut self) -> &mut BudgetStore {
        &mut self.budgets
    }

    /// The planned/actual/variance table for `period`, recomputed on demand.
    pub fn summary(&self, period: PeriodKey) -> Vec<SummaryRow> {
        summarize(
            self.ledger.transactions_for(period),
            &self.budgets.planned_amounts_for(period),
        )
    }

    /// Every period known to either store, in chronological order. Backs
    /// period-selection menus.
    pub fn periods(&self) -> Vec<PeriodKey> {
        let mut periods = self.ledger.periods();
        for period in self.budgets.periods() {
            if !periods.contains(&period) {
                periods.push(period);
            }
        }
        periods.sort();
        periods
    }
}
