//! The transaction entry and its two-phase identifier.

use crate::model::Amount;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The identifier of a ledger entry.
///
/// A freshly added entry carries a locally generated `Provisional` id until
/// the remote store confirms persistence, at which point the id is replaced in
/// place with the durable `Confirmed` one. An entry is "not yet durable"
/// exactly when its id is still provisional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryId {
    /// A local placeholder assigned at creation time.
    Provisional(Uuid),
    /// The durable identifier assigned by the remote store.
    Confirmed(String),
}

impl EntryId {
    /// Generates a fresh provisional id.
    pub fn provisional() -> Self {
        EntryId::Provisional(Uuid::new_v4())
    }

    pub fn is_confirmed(&self) -> bool {
        matches!(self, EntryId::Confirmed(_))
    }

    /// The durable identifier, if the remote store has assigned one.
    pub fn server_id(&self) -> Option<&str> {
        match self {
            EntryId::Provisional(_) => None,
            EntryId::Confirmed(id) => Some(id),
        }
    }
}

/// The caller-supplied fields of a new transaction, before any identifier
/// exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionDraft {
    pub description: String,
    pub amount: Amount,
    pub date: NaiveDate,
    pub category: String,
}

/// A single dated spending entry within one period bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TransactionEntry {
    id: EntryId,
    description: String,
    amount: Amount,
    date: NaiveDate,
    category: String,
}

impl TransactionEntry {
    /// Creates a provisional entry from a draft.
    pub fn provisional(draft: TransactionDraft) -> Self {
        Self {
            id: EntryId::provisional(),
            description: draft.description,
            amount: draft.amount,
            date: draft.date,
            category: draft.category,
        }
    }

    /// Creates an entry that the remote store already knows about.
    pub fn confirmed(
        server_id: impl Into<String>,
        description: impl Into<String>,
        amount: Amount,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: EntryId::Confirmed(server_id.into()),
            description: description.into(),
            amount,
            date,
            category: category.into(),
        }
    }

    /// Replaces the provisional identifier with the confirmed one. This is the
    /// only mutation an entry undergoes after creation.
    pub(crate) fn confirm(&mut self, server_id: impl Into<String>) {
        self.id = EntryId::Confirmed(server_id.into());
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}
