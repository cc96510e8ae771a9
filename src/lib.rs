mod api;
pub mod args;
pub mod commands;
mod config;
mod error;
mod model;
mod session;
mod store;
mod summary;
#[cfg(test)]
mod test;
mod utils;

pub use api::Mode;
pub use config::Config;
pub use error::Error;
pub use error::Result;
pub use model::{Amount, AmountError, EntryId, PeriodKey, TransactionDraft, TransactionEntry};
pub use session::Session;
pub use store::{BudgetStore, LedgerStore, SyncPolicy};
pub use summary::{summarize, SummaryRow};
