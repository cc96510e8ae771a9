//! Implements the sync adapter traits using in-memory data for testing.
//!
//! Note: this is compiled even in the "production" version of this app so that
//! the whole program can run, top-to-bottom, without a backend process.

use crate::api::{
    BudgetApi, CreateTransactionRequest, PeriodPlannedAmounts, PeriodTransactions,
    PlannedAmountRecord, RemoteTransaction, RemoveTransactionRequest, TransactionApi,
    UpsertPlannedAmountRequest,
};
use crate::{Error, Result};
use anyhow::anyhow;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};
use std::io::Cursor;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

/// Shared test adapter state, keyed by server URL so that separately
/// constructed adapters for the same "server" observe the same data.
static REGISTRY: Lazy<Mutex<HashMap<String, Arc<Mutex<TestApiState>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// The in-memory contents standing in for the remote document store.
#[derive(Debug, Clone, Default)]
pub(crate) struct TestApiState {
    /// period key string -> transactions, as the server would group them.
    pub(crate) transactions: BTreeMap<String, Vec<RemoteTransaction>>,
    /// period key string -> category -> planned amount.
    pub(crate) planned: BTreeMap<String, BTreeMap<String, Decimal>>,
    /// Counter backing durable identifier assignment.
    pub(crate) next_id: u64,
    /// When true, every operation fails with a sync error.
    pub(crate) failing: bool,
}

impl TestApiState {
    fn assign_id(&mut self) -> String {
        self.next_id += 1;
        format!("srv{:08}", self.next_id)
    }
}

/// An implementation of the sync adapter traits that holds its data in memory.
/// By default it is seeded with some existing data.
pub(crate) struct TestApi {
    state: Arc<Mutex<TestApiState>>,
}

impl TestApi {
    /// Creates an adapter over the given state.
    pub(crate) fn with_state(state: TestApiState) -> Self {
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Creates an adapter seeded with the fixture data from this module.
    pub(crate) fn seeded() -> Self {
        Self::with_state(seed_data())
    }

    /// Attaches to (or creates) the shared state registered under `key`.
    /// First attachment seeds the state with fixture data.
    pub(crate) fn attach(key: &str) -> Self {
        let mut registry = lock(&REGISTRY);
        let state = registry
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(seed_data())))
            .clone();
        Self { state }
    }

    /// A handle to the underlying state, for seeding and inspection in tests.
    pub(crate) fn state(&self) -> Arc<Mutex<TestApiState>> {
        self.state.clone()
    }

    fn check_failing(state: &TestApiState) -> Result<()> {
        if state.failing {
            return Err(Error::sync(anyhow!("test adapter set to fail")));
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl TransactionApi for TestApi {
    async fn list_transactions(&self) -> Result<Vec<PeriodTransactions>> {
        let state = lock(&self.state);
        Self::check_failing(&state)?;
        Ok(state
            .transactions
            .iter()
            .map(|(month_year, transactions)| PeriodTransactions {
                month_year: month_year.clone(),
                transactions: transactions.clone(),
            })
            .collect())
    }

    async fn create_transaction(
        &self,
        request: &CreateTransactionRequest,
    ) -> Result<RemoteTransaction> {
        let mut state = lock(&self.state);
        Self::check_failing(&state)?;
        let created = RemoteTransaction {
            server_id: state.assign_id(),
            description: request.transaction.description.clone(),
            amount: request.transaction.amount,
            date: request.transaction.date,
            category: request.transaction.category.clone(),
        };
        state
            .transactions
            .entry(request.month_year.clone())
            .or_default()
            .push(created.clone());
        Ok(created)
    }

    async fn delete_transaction(&self, request: &RemoveTransactionRequest) -> Result<()> {
        let mut state = lock(&self.state);
        Self::check_failing(&state)?;
        if let Some(transactions) = state.transactions.get_mut(&request.month_year) {
            transactions.retain(|t| t.server_id != request.transaction_id);
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl BudgetApi for TestApi {
    async fn list_planned_amounts(&self) -> Result<Vec<PeriodPlannedAmounts>> {
        let state = lock(&self.state);
        Self::check_failing(&state)?;
        Ok(state
            .planned
            .iter()
            .map(|(month_year, amounts)| PeriodPlannedAmounts {
                month_year: month_year.clone(),
                planned_amounts: amounts
                    .iter()
                    .map(|(category, amount)| PlannedAmountRecord {
                        category: category.clone(),
                        amount: *amount,
                    })
                    .collect(),
            })
            .collect())
    }

    async fn upsert_planned_amount(&self, request: &UpsertPlannedAmountRequest) -> Result<()> {
        let mut state = lock(&self.state);
        Self::check_failing(&state)?;
        state
            .planned
            .entry(request.month_year.clone())
            .or_default()
            .insert(request.category.clone(), request.new_amount);
        Ok(())
    }
}

/// Builds the seed state from the CSV fixtures below.
fn seed_data() -> TestApiState {
    let mut state = TestApiState {
        next_id: 100,
        ..TestApiState::default()
    };
    for row in load_csv(TRANSACTION_DATA) {
        let transaction = RemoteTransaction {
            server_id: row[1].clone(),
            description: row[3].clone(),
            amount: Decimal::from_str(&row[4]).unwrap_or_default(),
            date: NaiveDate::from_str(&row[2]).unwrap_or_default(),
            category: row[5].clone(),
        };
        state
            .transactions
            .entry(row[0].clone())
            .or_default()
            .push(transaction);
    }
    for row in load_csv(PLANNED_DATA) {
        state
            .planned
            .entry(row[0].clone())
            .or_default()
            .insert(row[1].clone(), Decimal::from_str(&row[2]).unwrap_or_default());
    }
    state
}

/// Loads rows from a CSV-formatted string.
fn load_csv(csv_data: &str) -> Vec<Vec<String>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(Cursor::new(csv_data.as_bytes()));
    rdr.records()
        .filter_map(|record| record.ok())
        .map(|record| record.iter().map(|field| field.to_string()).collect())
        .collect()
}

/// Seed transaction data: period key, server id, date, description, amount,
/// category.
const TRANSACTION_DATA: &str = r##"10/2024,seed0000000001,2024-10-01,Rent,1200.00,Rent
10/2024,seed0000000002,2024-10-02,Walmart,150.00,Groceries
10/2024,seed0000000003,2024-10-03,Car Payment,300.00,Car Payment
09/2024,seed0000000004,2024-09-10,Internet,100.00,Utilities
"##;

/// Seed planned-amount data: period key, category, amount.
const PLANNED_DATA: &str = r##"10/2024,Rent,1000.00
10/2024,Groceries,400.00
10/2024,Car Payment,300.00
09/2024,Utilities,120.00
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PeriodKey;

    #[tokio::test]
    async fn test_create_assigns_durable_ids() {
        let api = TestApi::seeded();
        let period = PeriodKey::new(11, 2024).unwrap();
        let request = CreateTransactionRequest {
            month_year: period.to_string(),
            transaction: crate::api::NewTransaction {
                description: "Coffee".to_string(),
                amount: Decimal::new(575, 2),
                date: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                category: "Food".to_string(),
            },
        };
        let first = api.create_transaction(&request).await.unwrap();
        let second = api.create_transaction(&request).await.unwrap();
        assert_ne!(first.server_id, second.server_id);

        let snapshot = api.list_transactions().await.unwrap();
        let bucket = snapshot
            .iter()
            .find(|group| group.month_year == "11/2024")
            .unwrap();
        assert_eq!(bucket.transactions.len(), 2);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let api = TestApi::seeded();
        let request = RemoveTransactionRequest {
            month_year: "10/2024".to_string(),
            transaction_id: "seed0000000001".to_string(),
        };
        api.delete_transaction(&request).await.unwrap();
        // a second delete of the same id is accepted
        api.delete_transaction(&request).await.unwrap();
    }

    #[tokio::test]
    async fn test_failing_flag_rejects_operations() {
        let api = TestApi::seeded();
        api.state().lock().unwrap().failing = true;
        let err = api.list_transactions().await.unwrap_err();
        assert!(err.is_sync_failure());
    }

    #[tokio::test]
    async fn test_attach_shares_state_per_key() {
        let key = format!("http://{}.test.invalid", uuid::Uuid::new_v4());
        let a = TestApi::attach(&key);
        let b = TestApi::attach(&key);
        a.state().lock().unwrap().planned.clear();
        let request = UpsertPlannedAmountRequest {
            month_year: "01/2025".to_string(),
            category: "Food".to_string(),
            new_amount: Decimal::from(50),
        };
        a.upsert_planned_amount(&request).await.unwrap();
        let snapshot = b.list_planned_amounts().await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].planned_amounts[0].category, "Food");
    }
}
