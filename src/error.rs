//! The error type for the budget ledger.
//!
//! Validation problems get their own variants because callers branch on them:
//! a bad period or date is the caller's mistake and is reported before any
//! state changes, while a sync failure arrives after the optimistic local
//! mutation has already been applied.

use chrono::NaiveDate;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A month/year pair (or an `MM/YYYY` string) that does not name a valid
    /// calendar month.
    #[error("invalid period '{0}': expected MM/YYYY with month 01-12")]
    InvalidPeriod(String),

    /// A transaction date that falls outside the period it was filed under.
    #[error("date {date} does not fall within period {period}")]
    InvalidDate { date: NaiveDate, period: String },

    /// A remote operation was rejected or unreachable. The optimistic local
    /// mutation is not undone when this is returned (see `SyncPolicy`).
    #[error("sync failure: {0}")]
    Sync(#[source] anyhow::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Wraps a remote-store failure.
    pub fn sync(err: impl Into<anyhow::Error>) -> Self {
        Error::Sync(err.into())
    }

    /// True for `Error::Sync`, the only kind that leaves local and remote
    /// state diverged.
    pub fn is_sync_failure(&self) -> bool {
        matches!(self, Error::Sync(_))
    }
}
