//! Types that represent the core data model, such as `PeriodKey` and
//! `TransactionEntry`.
mod amount;
mod period;
mod transaction;

pub use amount::{Amount, AmountError};
pub use period::PeriodKey;
pub use transaction::{EntryId, TransactionDraft, TransactionEntry};
