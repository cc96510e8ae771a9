//! The ledger store: a month-keyed view of transaction entries kept
//! consistent with the remote store through optimistic mutation.
//!
//! Local mutations are applied before the corresponding remote call is made,
//! so reads within the session observe them immediately ("read your write").
//! Remote confirmation only replaces a provisional identifier in place; it
//! never reorders or revalidates entries.

use crate::api::{CreateTransactionRequest, RemoveTransactionRequest, TransactionApi};
use crate::model::{Amount, EntryId, PeriodKey, TransactionDraft, TransactionEntry};
use crate::store::SyncPolicy;
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::{debug, warn};

pub struct LedgerStore {
    /// Entries within a period are kept in append order; no secondary sort by
    /// date is applied.
    entries: BTreeMap<PeriodKey, Vec<TransactionEntry>>,
    api: Box<dyn TransactionApi + Send>,
    on_failure: SyncPolicy,
}

impl LedgerStore {
    /// Creates an empty store over the given sync adapter with the default
    /// (keep-on-failure) policy.
    pub fn new(api: Box<dyn TransactionApi + Send>) -> Self {
        Self::with_policy(api, SyncPolicy::default())
    }

    pub fn with_policy(api: Box<dyn TransactionApi + Send>, on_failure: SyncPolicy) -> Self {
        Self {
            entries: BTreeMap::new(),
            api,
            on_failure,
        }
    }

    /// The entries recorded under `period`, in append order. Unknown periods
    /// yield an empty slice; this never fails.
    pub fn transactions_for(&self, period: PeriodKey) -> &[TransactionEntry] {
        self.entries
            .get(&period)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// The period keys with at least one entry, in chronological order.
    pub fn periods(&self) -> Vec<PeriodKey> {
        self.entries.keys().copied().collect()
    }

    /// Validates the draft against `period`, appends it locally as a
    /// provisional entry, and requests persistence from the remote store.
    ///
    /// On success the provisional identifier is replaced in place with the
    /// server-assigned one and the confirmed entry is returned. On failure the
    /// entry remains in local state, still provisional, unless this store was
    /// built with `SyncPolicy::Rollback`.
    pub async fn add_transaction(
        &mut self,
        period: PeriodKey,
        draft: TransactionDraft,
    ) -> Result<TransactionEntry> {
        if !period.contains(draft.date) {
            return Err(Error::InvalidDate {
                date: draft.date,
                period: period.to_string(),
            });
        }

        let entry = TransactionEntry::provisional(draft);
        let provisional_id = entry.id().clone();
        self.entries.entry(period).or_default().push(entry.clone());

        let request = CreateTransactionRequest::new(period, &entry);
        match self.api.create_transaction(&request).await {
            Ok(remote) => {
                let slot = self
                    .entries
                    .get_mut(&period)
                    .and_then(|list| list.iter_mut().find(|e| *e.id() == provisional_id));
                match slot {
                    Some(slot) => {
                        slot.confirm(remote.server_id);
                        Ok(slot.clone())
                    }
                    None => {
                        // The entry was removed while the create was in
                        // flight; the remote copy stays until the caller
                        // deletes it or the next load_all.
                        warn!(
                            "entry confirmed as {} but no longer present under {period}",
                            remote.server_id
                        );
                        let mut confirmed = entry;
                        confirmed.confirm(remote.server_id);
                        Ok(confirmed)
                    }
                }
            }
            Err(e) => {
                match self.on_failure {
                    SyncPolicy::Keep => {
                        debug!("create failed; keeping provisional entry under {period}");
                    }
                    SyncPolicy::Rollback => {
                        if let Some(list) = self.entries.get_mut(&period) {
                            list.retain(|e| *e.id() != provisional_id);
                        }
                    }
                }
                Err(e)
            }
        }
    }

    /// Removes the entry with `id` from local state immediately (a missing id
    /// is a no-op, not an error), then requests deletion from the remote
    /// store when the entry has a durable identifier. Local removal is not
    /// gated on remote confirmation.
    pub async fn remove_transaction(&mut self, period: PeriodKey, id: &EntryId) -> Result<()> {
        let removed = match self.entries.get_mut(&period) {
            Some(list) => {
                let before = list.len();
                list.retain(|e| e.id() != id);
                let removed = before != list.len();
                // an emptied bucket would otherwise still show up in periods()
                if list.is_empty() {
                    self.entries.remove(&period);
                }
                removed
            }
            None => false,
        };
        if !removed {
            debug!("no entry with id {id:?} under {period}");
        }

        // A provisional entry has no durable identifier for the remote store
        // to delete.
        if let Some(server_id) = id.server_id() {
            let request = RemoveTransactionRequest::new(period, server_id);
            self.api.delete_transaction(&request).await?;
        }
        Ok(())
    }

    /// Replaces the entire local ledger with the remote snapshot. This is a
    /// full replace, not a merge: provisional entries created before this
    /// completes are discarded.
    pub async fn load_all(&mut self) -> Result<()> {
        let snapshot = self.api.list_transactions().await?;
        let mut entries: BTreeMap<PeriodKey, Vec<TransactionEntry>> = BTreeMap::new();
        for group in snapshot {
            let period: PeriodKey = group.month_year.parse()?;
            let list = entries.entry(period).or_default();
            for remote in group.transactions {
                let entry = TransactionEntry::confirmed(
                    remote.server_id,
                    remote.description,
                    Amount::new(remote.amount),
                    remote.date,
                    remote.category,
                );
                if !period.contains(entry.date()) {
                    // The server is authoritative about grouping; keep the
                    // entry where it was filed.
                    warn!(
                        "entry {:?} dated {} filed under {period}",
                        entry.id(),
                        entry.date()
                    );
                }
                list.push(entry);
            }
        }
        self.entries = entries;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{TestApi, TestApiState};
    use crate::model::Amount;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use std::sync::{Arc, Mutex};

    fn store() -> (LedgerStore, Arc<Mutex<TestApiState>>) {
        let api = TestApi::with_state(TestApiState::default());
        let state = api.state();
        (LedgerStore::new(Box::new(api)), state)
    }

    fn failing_store() -> LedgerStore {
        let api = TestApi::with_state(TestApiState {
            failing: true,
            ..TestApiState::default()
        });
        LedgerStore::new(Box::new(api))
    }

    fn draft(day: u32) -> TransactionDraft {
        TransactionDraft {
            description: "Groceries run".to_string(),
            amount: Amount::from_str("42.50").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 10, day).unwrap(),
            category: "Groceries".to_string(),
        }
    }

    fn period() -> PeriodKey {
        PeriodKey::new(10, 2024).unwrap()
    }

    #[tokio::test]
    async fn test_add_then_read_includes_entry() {
        let (mut store, _state) = store();
        let entry = store.add_transaction(period(), draft(5)).await.unwrap();
        assert!(entry.id().is_confirmed());

        let entries = store.transactions_for(period());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id(), entry.id());
        assert_eq!(entries[0].description(), "Groceries run");
    }

    #[tokio::test]
    async fn test_read_your_write_before_confirmation() {
        // The remote create fails, so the entry never gets confirmed; it must
        // still be visible locally, provisional.
        let mut store = failing_store();
        let err = store.add_transaction(period(), draft(5)).await.unwrap_err();
        assert!(err.is_sync_failure());

        let entries = store.transactions_for(period());
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].id().is_confirmed());
    }

    #[tokio::test]
    async fn test_rollback_policy_undoes_failed_add() {
        let api = TestApi::with_state(TestApiState {
            failing: true,
            ..TestApiState::default()
        });
        let mut store = LedgerStore::with_policy(Box::new(api), SyncPolicy::Rollback);
        let err = store.add_transaction(period(), draft(5)).await.unwrap_err();
        assert!(err.is_sync_failure());
        assert!(store.transactions_for(period()).is_empty());
    }

    #[tokio::test]
    async fn test_add_rejects_date_outside_period() {
        let (mut store, _state) = store();
        let mut bad = draft(5);
        bad.date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        let err = store.add_transaction(period(), bad).await.unwrap_err();
        assert!(matches!(err, Error::InvalidDate { .. }));
        // nothing was staged locally
        assert!(store.transactions_for(period()).is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_immediate_and_idempotent() {
        let (mut store, state) = store();
        let entry = store.add_transaction(period(), draft(5)).await.unwrap();
        let id = entry.id().clone();

        store.remove_transaction(period(), &id).await.unwrap();
        assert!(store.transactions_for(period()).is_empty());
        // remote copy was deleted too
        assert!(state.lock().unwrap().transactions[&period().to_string()].is_empty());

        // removing an absent id is a no-op
        store.remove_transaction(period(), &id).await.unwrap();
        let unknown = EntryId::Confirmed("nope".to_string());
        store.remove_transaction(period(), &unknown).await.unwrap();
    }

    #[tokio::test]
    async fn test_remove_last_entry_unlists_period() {
        let (mut store, _state) = store();
        let entry = store.add_transaction(period(), draft(5)).await.unwrap();
        assert_eq!(store.periods(), vec![period()]);

        store
            .remove_transaction(period(), &entry.id().clone())
            .await
            .unwrap();
        assert!(store.periods().is_empty());
    }

    #[tokio::test]
    async fn test_remove_is_not_gated_on_remote_confirmation() {
        let (mut store, state) = store();
        let entry = store.add_transaction(period(), draft(5)).await.unwrap();
        state.lock().unwrap().failing = true;

        let err = store
            .remove_transaction(period(), &entry.id().clone())
            .await
            .unwrap_err();
        assert!(err.is_sync_failure());
        // local removal already happened
        assert!(store.transactions_for(period()).is_empty());
    }

    #[tokio::test]
    async fn test_remove_provisional_entry_skips_remote_call() {
        let mut store = failing_store();
        let _ = store.add_transaction(period(), draft(5)).await;
        let id = store.transactions_for(period())[0].id().clone();
        assert!(!id.is_confirmed());

        // succeeds even though the adapter would fail, because no remote call
        // is made for a provisional id
        store.remove_transaction(period(), &id).await.unwrap();
        assert!(store.transactions_for(period()).is_empty());
    }

    #[tokio::test]
    async fn test_load_all_replaces_local_state() {
        let api = TestApi::seeded();
        let mut store = LedgerStore::new(Box::new(api));
        store.load_all().await.unwrap();

        let october = store.transactions_for(period());
        assert_eq!(october.len(), 3);
        assert!(october.iter().all(|e| e.id().is_confirmed()));

        let first = store.periods();
        // unchanged snapshot loads to identical state
        store.load_all().await.unwrap();
        assert_eq!(store.periods(), first);
        assert_eq!(store.transactions_for(period()).len(), 3);
    }

    #[tokio::test]
    async fn test_load_all_discards_unconfirmed_entries() {
        // Known race: a full replace drops provisional entries whose create
        // never confirmed, because the server snapshot has never seen them.
        let (mut store, state) = store();
        state.lock().unwrap().failing = true;
        let _ = store.add_transaction(period(), draft(5)).await;
        assert_eq!(store.transactions_for(period()).len(), 1);

        state.lock().unwrap().failing = false;
        store.load_all().await.unwrap();
        assert!(store.transactions_for(period()).is_empty());
    }

    #[tokio::test]
    async fn test_unknown_period_reads_empty() {
        let (store, _state) = store();
        assert!(store
            .transactions_for(PeriodKey::new(1, 2031).unwrap())
            .is_empty());
    }

    #[tokio::test]
    async fn test_append_order_is_preserved() {
        let (mut store, _state) = store();
        // dates deliberately out of order; the store must not re-sort
        store.add_transaction(period(), draft(20)).await.unwrap();
        store.add_transaction(period(), draft(3)).await.unwrap();
        store.add_transaction(period(), draft(11)).await.unwrap();
        let days: Vec<u32> = store
            .transactions_for(period())
            .iter()
            .map(|e| chrono::Datelike::day(&e.date()))
            .collect();
        assert_eq!(days, vec![20, 3, 11]);
    }
}
