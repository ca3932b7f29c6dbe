//! PaymentHistoryStore - append-only log of completed payments
//!
//! Sole writer of the persisted history. The whole log is rewritten under a
//! single key on every mutation; it is read exactly once, at startup.

use super::codec;
use crate::storage::KvStore;
use chrono::Utc;
use shared::{BillingError, PaidItem, PaymentDraft, PaymentEntry, PaymentStatus};
use std::sync::Arc;

/// Storage key shared with the web till
pub const DEFAULT_HISTORY_KEY: &str = "kherwal_bazaar_payment_history_v1";

pub struct PaymentHistoryStore {
    kv: Arc<dyn KvStore>,
    key: String,
    /// Most-recent-first
    entries: Vec<PaymentEntry>,
}

impl std::fmt::Debug for PaymentHistoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentHistoryStore")
            .field("key", &self.key)
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl PaymentHistoryStore {
    /// Restore the log from storage
    ///
    /// Never fails: a missing, unreadable or corrupted payload yields an
    /// empty log and a diagnostic.
    pub fn load(kv: Arc<dyn KvStore>, key: impl Into<String>) -> Self {
        let key = key.into();
        let raw = match kv.get(&key) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Failed to read payment history, starting empty");
                None
            }
        };
        let entries = codec::decode_or_empty(raw.as_deref());
        tracing::info!(key = %key, entries = entries.len(), "Payment history loaded");
        Self { kv, key, entries }
    }

    /// Record a payment for `items`
    ///
    /// Callers check `items` is non-empty and `amount > 0` first; the store
    /// does not re-validate. The items are copied so later changes to the
    /// source bill cannot reach the stored entry.
    pub fn record_payment(
        &mut self,
        items: &[PaidItem],
        amount: f64,
        vpa: &str,
    ) -> Result<PaymentEntry, BillingError> {
        self.record_payment_with(PaymentDraft::new(items.to_vec(), amount, vpa))
    }

    /// Record a payment with payee name and method
    pub fn record_payment_with(&mut self, draft: PaymentDraft) -> Result<PaymentEntry, BillingError> {
        let entry = PaymentEntry {
            id: shared::util::new_id(),
            created_at: Utc::now(),
            amount: draft.amount,
            payee_vpa: draft.payee_vpa,
            payee_name: draft.payee_name,
            status: PaymentStatus::Completed,
            payment_method: draft.payment_method,
            items: draft.items,
        };

        self.entries.insert(0, entry.clone());
        if let Err(e) = self.persist() {
            // keep memory and storage in step
            self.entries.remove(0);
            return Err(e);
        }

        tracing::info!(
            payment_id = %entry.id,
            amount = entry.amount,
            items = entry.items.len(),
            "Payment recorded"
        );
        Ok(entry)
    }

    /// Read-only view, most-recent-first
    pub fn list(&self) -> &[PaymentEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all recorded amounts
    pub fn total_collected(&self) -> f64 {
        shared::money::to_f64(
            self.entries
                .iter()
                .map(|e| shared::money::to_decimal(e.amount))
                .sum(),
        )
    }

    /// Drop the whole log and persist the empty state
    ///
    /// Irreversible. Confirmation is the caller's job.
    pub fn clear(&mut self) -> Result<(), BillingError> {
        let previous = std::mem::take(&mut self.entries);
        if let Err(e) = self.persist() {
            self.entries = previous;
            return Err(e);
        }
        tracing::info!(cleared = previous.len(), "Payment history cleared");
        Ok(())
    }

    fn persist(&self) -> Result<(), BillingError> {
        let raw = codec::encode(&self.entries)
            .map_err(|e| BillingError::storage(format!("encode history: {}", e)))?;
        self.kv.set(&self.key, &raw).map_err(|e| {
            tracing::error!(key = %self.key, error = %e, "Failed to persist payment history");
            BillingError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{MemoryKv, StorageError, StorageResult};

    fn items() -> Vec<PaidItem> {
        vec![
            PaidItem { name: "Garments".to_string(), qty: 1, price: 100.0 },
            PaidItem { name: "Shirt".to_string(), qty: 2, price: 499.5 },
        ]
    }

    /// Store that refuses every write
    struct ReadOnlyKv;

    impl KvStore for ReadOnlyKv {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Ok(None)
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
    }

    /// Store whose reads always fail, writes go to memory
    #[derive(Default)]
    struct UnreadableKv {
        inner: MemoryKv,
    }

    impl KvStore for UnreadableKv {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Io(std::io::Error::other("disk unreadable")))
        }
        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> StorageResult<()> {
            self.inner.remove(key)
        }
    }

    #[test]
    fn test_record_prepends_and_persists() {
        let kv = Arc::new(MemoryKv::new());
        let mut store = PaymentHistoryStore::load(kv.clone(), DEFAULT_HISTORY_KEY);
        assert!(store.is_empty());

        let first = store.record_payment(&items(), 1099.0, "merchant@bank").unwrap();
        let second = store.record_payment(&items()[..1], 100.0, "merchant@bank").unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(store.list()[0].id, second.id);
        assert_eq!(store.list()[1].id, first.id);
        assert_eq!(store.total_collected(), 1199.0);

        let reloaded = PaymentHistoryStore::load(kv, DEFAULT_HISTORY_KEY);
        assert_eq!(reloaded.list(), store.list());
    }

    #[test]
    fn test_recorded_entry_is_isolated_from_source() {
        let kv = Arc::new(MemoryKv::new());
        let mut store = PaymentHistoryStore::load(kv, "h");
        let mut source = items();
        let entry = store.record_payment(&source, 1099.0, "merchant@bank").unwrap();

        source[0].name = "Changed".to_string();
        source.clear();

        assert_eq!(store.list()[0].items, entry.items);
        assert_eq!(store.list()[0].items[0].name, "Garments");
        assert!(store.list()[0].is_consistent());
    }

    #[test]
    fn test_clear_persists_empty_state() {
        let kv = Arc::new(MemoryKv::new());
        let mut store = PaymentHistoryStore::load(kv.clone(), "h");
        store.record_payment(&items(), 1099.0, "merchant@bank").unwrap();
        store.clear().unwrap();
        assert!(store.is_empty());

        assert_eq!(kv.get("h").unwrap().as_deref(), Some(r#"{"version":1,"entries":[]}"#));
        assert!(PaymentHistoryStore::load(kv, "h").is_empty());
    }

    #[test]
    fn test_corrupted_storage_loads_empty() {
        let kv = Arc::new(MemoryKv::with_value("h", "{\"oops\""));
        let store = PaymentHistoryStore::load(kv, "h");
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut store = PaymentHistoryStore::load(Arc::new(ReadOnlyKv), "h");
        let err = store.record_payment(&items(), 1099.0, "merchant@bank").unwrap_err();
        assert!(matches!(err, BillingError::Storage(_)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_record_with_payee_details() {
        let mut store = PaymentHistoryStore::load(Arc::new(MemoryKv::new()), "h");
        let draft = PaymentDraft::new(items(), 1099.0, "merchant@bank")
            .with_payee_name("Shop Name")
            .with_payment_method("PhonePe");
        let entry = store.record_payment_with(draft).unwrap();
        assert_eq!(entry.payee_name.as_deref(), Some("Shop Name"));
        assert_eq!(entry.payment_method.as_deref(), Some("PhonePe"));
        assert_eq!(entry.status, PaymentStatus::Completed);
    }

    #[test]
    fn test_read_failure_loads_empty_and_keeps_recording() {
        let kv = Arc::new(UnreadableKv::default());
        let mut store = PaymentHistoryStore::load(kv.clone(), "h");
        assert!(store.is_empty());

        store.record_payment(&items(), 1099.0, "merchant@bank").unwrap();
        assert_eq!(store.len(), 1);
        assert!(kv.inner.get("h").unwrap().is_some());
    }

    #[test]
    fn test_overflowing_entry_loads_without_panic() {
        let raw = r#"{"version":1,"entries":[{"id":"x","createdAt":"2025-01-05T09:30:00Z","amount":1.0,"vpa":"merchant@bank","items":[{"name":"Big","qty":4294967295,"price":1e20}]}]}"#;
        let kv = Arc::new(MemoryKv::with_value("h", raw));
        let mut store = PaymentHistoryStore::load(kv, "h");
        assert!(store.is_empty());

        store.record_payment(&items(), 1099.0, "merchant@bank").unwrap();
        assert_eq!(store.total_collected(), 1099.0);
    }
}
