//! The boundary contract between the in-memory stores and the remote
//! authoritative store.
//!
//! The remote store is a REST/JSON service backed by a document database; the
//! wire shapes here match its routes field-for-field (including the `_id` and
//! `monthYear` names it uses). The adapter is stateless between calls.

mod rest;
mod test_api;

use crate::model::{PeriodKey, TransactionEntry};
use crate::{Config, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub(crate) use rest::RestClient;
pub(crate) use test_api::TestApi;
#[cfg(test)]
pub(crate) use test_api::TestApiState;

/// The environment variable that routes API construction to the in-memory
/// test adapter.
const IN_TEST_MODE: &str = "BUDGET_LEDGER_IN_TEST_MODE";

/// Selects the backing implementation of the sync adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Use the REST backend named by the config's server URL.
    #[default]
    Remote,
    /// Use the in-memory test adapter so the whole program can run without a
    /// backend.
    Test,
}

impl Mode {
    /// Returns `Mode::Test` when `BUDGET_LEDGER_IN_TEST_MODE` is set and
    /// non-empty, otherwise `Mode::Remote`.
    pub fn from_env() -> Self {
        match std::env::var(IN_TEST_MODE) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Remote,
        }
    }
}

/// Persistence operations for transaction entries.
#[async_trait::async_trait]
pub trait TransactionApi {
    /// Fetches the full transaction snapshot, grouped by period key.
    async fn list_transactions(&self) -> Result<Vec<PeriodTransactions>>;

    /// Persists a new transaction and returns it with its durable identifier.
    async fn create_transaction(&self, request: &CreateTransactionRequest)
        -> Result<RemoteTransaction>;

    /// Deletes a transaction by its durable identifier. Idempotent from the
    /// caller's point of view.
    async fn delete_transaction(&self, request: &RemoveTransactionRequest) -> Result<()>;
}

/// Persistence operations for planned budget amounts.
#[async_trait::async_trait]
pub trait BudgetApi {
    /// Fetches the full planned-amount snapshot, grouped by period key.
    async fn list_planned_amounts(&self) -> Result<Vec<PeriodPlannedAmounts>>;

    /// Writes a planned amount for one (period, category) pair. Whether this
    /// is an insert or an update is the server's decision.
    async fn upsert_planned_amount(&self, request: &UpsertPlannedAmountRequest) -> Result<()>;
}

/// Creates the transaction adapter for `mode`.
pub(crate) fn transaction_api(
    config: &Config,
    mode: Mode,
) -> Result<Box<dyn TransactionApi + Send>> {
    Ok(match mode {
        Mode::Remote => Box::new(RestClient::new(config.server_url())?),
        Mode::Test => Box::new(TestApi::attach(config.server_url())),
    })
}

/// Creates the budget adapter for `mode`.
pub(crate) fn budget_api(config: &Config, mode: Mode) -> Result<Box<dyn BudgetApi + Send>> {
    Ok(match mode {
        Mode::Remote => Box::new(RestClient::new(config.server_url())?),
        Mode::Test => Box::new(TestApi::attach(config.server_url())),
    })
}

/// One period bucket of the transaction snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodTransactions {
    #[serde(rename = "monthYear")]
    pub month_year: String,
    pub transactions: Vec<RemoteTransaction>,
}

/// A transaction as the remote store reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteTransaction {
    /// The durable identifier assigned by the document database.
    #[serde(rename = "_id")]
    pub server_id: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
}

/// The fields of a transaction that does not yet have a durable identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub date: NaiveDate,
    pub category: String,
}

/// Request body for the create-transaction operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "monthYear")]
    pub month_year: String,
    pub transaction: NewTransaction,
}

impl CreateTransactionRequest {
    pub(crate) fn new(period: PeriodKey, entry: &TransactionEntry) -> Self {
        Self {
            month_year: period.to_string(),
            transaction: NewTransaction {
                description: entry.description().to_string(),
                amount: entry.amount().value(),
                date: entry.date(),
                category: entry.category().to_string(),
            },
        }
    }
}

/// Request body for the delete-transaction operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveTransactionRequest {
    #[serde(rename = "monthYear")]
    pub month_year: String,
    #[serde(rename = "transactionID")]
    pub transaction_id: String,
}

impl RemoveTransactionRequest {
    pub(crate) fn new(period: PeriodKey, server_id: impl Into<String>) -> Self {
        Self {
            month_year: period.to_string(),
            transaction_id: server_id.into(),
        }
    }
}

/// One period bucket of the planned-amount snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodPlannedAmounts {
    #[serde(rename = "monthYear")]
    pub month_year: String,
    #[serde(rename = "plannedAmounts")]
    pub planned_amounts: Vec<PlannedAmountRecord>,
}

/// A planned amount for one category as the remote store reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedAmountRecord {
    pub category: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
}

/// Request body for the upsert-planned-amount operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpsertPlannedAmountRequest {
    #[serde(rename = "monthYear")]
    pub month_year: String,
    pub category: String,
    #[serde(rename = "newAmount", with = "rust_decimal::serde::float")]
    pub new_amount: Decimal,
}

impl UpsertPlannedAmountRequest {
    pub(crate) fn new(period: PeriodKey, category: impl Into<String>, new_amount: Decimal) -> Self {
        Self {
            month_year: period.to_string(),
            category: category.into(),
            new_amount,
        }
    }
}
