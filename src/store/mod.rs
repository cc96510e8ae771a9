//! The session-scoped stores that hold the month-keyed ledger and budget
//! table, apply optimistic local mutations, and reconcile them with the
//! remote store through the sync adapter.
mod budget;
mod ledger;

use serde::{Deserialize, Serialize};

pub use budget::BudgetStore;
pub use ledger::LedgerStore;

/// What to do with an optimistic local mutation when the remote create
/// fails. The observed behavior of the original system is `Keep` (local and
/// remote state diverge until the next full load); `Rollback` is offered as an
/// explicit policy because changing this silently would change user-visible
/// behavior.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPolicy {
    /// Keep the local mutation; the entry stays provisional.
    #[default]
    Keep,
    /// Undo the local mutation when the remote operation fails.
    Rollback,
}

serde_plain::derive_display_from_serialize!(SyncPolicy);
serde_plain::derive_fromstr_from_deserialize!(SyncPolicy);
