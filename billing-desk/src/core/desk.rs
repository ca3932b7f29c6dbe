//! BillingDesk - the handle a front-end holds
//!
//! Owns the working bill and the payment history. Every bill/history
//! mutation goes through here so that "mark paid" can be one critical
//! section: the bill is never seen reset without its history entry, and
//! never seen recorded while still open.
//!
//! Lock order is always ledger → history.

use super::config::DeskConfig;
use crate::bill::BillLedger;
use crate::history::PaymentHistoryStore;
use crate::storage::{KvStore, MemoryKv, RedbKv};
use crate::upi::{QrImage, QrRenderer, build_payment_url_with_currency};
use parking_lot::Mutex;
use shared::{BillingError, LineItem, PaymentDraft, PaymentEntry};
use std::sync::Arc;

/// What the front-end shows in the QR modal
#[derive(Debug, Clone)]
pub struct PaymentRequest {
    pub url: String,
    pub amount: f64,
    pub qr: QrImage,
}

/// Result of a successful "mark paid"
#[derive(Debug, Clone)]
pub struct PaidReceipt {
    pub entry: PaymentEntry,
    /// Link to hand to the wallet app
    pub url: String,
}

pub struct BillingDesk {
    config: DeskConfig,
    ledger: Mutex<BillLedger>,
    history: Mutex<PaymentHistoryStore>,
    renderer: Box<dyn QrRenderer>,
}

impl std::fmt::Debug for BillingDesk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingDesk")
            .field("vpa", &self.config.vpa)
            .field("ledger", &*self.ledger.lock())
            .field("history", &*self.history.lock())
            .finish()
    }
}

impl BillingDesk {
    /// Open the desk on the redb file under `config.work_dir`
    pub fn open(config: DeskConfig) -> Result<Self, BillingError> {
        let path = config.db_path();
        let kv = RedbKv::open(&path)?;
        tracing::info!(path = %path.display(), "Billing database opened");
        Ok(Self::with_store(Arc::new(kv), config))
    }

    /// Open the redb file, or fall back to an in-memory store
    ///
    /// The returned error is set when the fallback was taken; payments
    /// recorded on such a desk are lost on exit.
    pub fn open_or_ephemeral(config: DeskConfig) -> (Self, Option<BillingError>) {
        match Self::open(config.clone()) {
            Ok(desk) => (desk, None),
            Err(e) => {
                tracing::warn!(error = %e, "Billing database unavailable, using in-memory history");
                (Self::with_store(Arc::new(MemoryKv::new()), config), Some(e))
            }
        }
    }

    /// Build the desk on any key-value substrate
    pub fn with_store(kv: Arc<dyn KvStore>, config: DeskConfig) -> Self {
        let ledger = BillLedger::new(config.fallback_item_name.clone());
        let history = PaymentHistoryStore::load(kv, config.history_key.clone());
        let renderer = config.qr_mode.renderer(config.qr_size);
        Self {
            config,
            ledger: Mutex::new(ledger),
            history: Mutex::new(history),
            renderer,
        }
    }

    /// Swap the QR renderer
    pub fn with_renderer(mut self, renderer: Box<dyn QrRenderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &DeskConfig {
        &self.config
    }

    // ========== Bill ==========

    /// Add an item from raw quick-entry fields
    pub fn add_item(&self, name: &str, qty: &str, price: &str) -> Result<LineItem, BillingError> {
        self.ledger.lock().add_item(name, qty, price)
    }

    pub fn add(&self, name: &str, qty: u32, price: f64) -> Result<LineItem, BillingError> {
        self.ledger.lock().add(name, qty, price)
    }

    pub fn remove_item(&self, id: &str) -> bool {
        self.ledger.lock().remove_item(id)
    }

    /// Current bill, most-recent-first
    pub fn items(&self) -> Vec<LineItem> {
        self.ledger.lock().items().to_vec()
    }

    pub fn grand_total(&self) -> f64 {
        self.ledger.lock().grand_total()
    }

    // ========== Payment ==========

    /// Payment link and QR for the current total
    ///
    /// The bill is left as it is whatever happens.
    pub fn payment_request(&self) -> Result<PaymentRequest, BillingError> {
        let amount = {
            let ledger = self.ledger.lock();
            if !ledger.is_payable() {
                return Err(BillingError::EmptyBillOperation);
            }
            ledger.grand_total()
        };

        let url = self.payment_url(amount);
        let qr = self.renderer.render(&url).inspect_err(|e| {
            tracing::warn!(error = %e, "QR render failed");
        })?;

        Ok(PaymentRequest { url, amount, qr })
    }

    /// Record the current bill as paid and reset it
    ///
    /// Confirmation is optimistic: the wallet gives no callback, so the
    /// entry is recorded as completed on the merchant's word.
    pub fn mark_paid(&self) -> Result<PaidReceipt, BillingError> {
        let mut ledger = self.ledger.lock();
        let mut history = self.history.lock();

        if !ledger.is_payable() {
            return Err(BillingError::EmptyBillOperation);
        }

        let amount = ledger.grand_total();
        let draft = PaymentDraft::new(ledger.snapshot(), amount, self.config.vpa.clone())
            .with_payee_name(self.config.payee_name.clone())
            .with_payment_method(self.config.payment_method.clone());

        // 写入失败时账单保持不变
        let entry = history.record_payment_with(draft)?;
        ledger.clear();

        Ok(PaidReceipt {
            url: self.payment_url(entry.amount),
            entry,
        })
    }

    fn payment_url(&self, amount: f64) -> String {
        build_payment_url_with_currency(
            &self.config.vpa,
            &self.config.payee_name,
            amount,
            &self.config.currency,
        )
    }

    // ========== History ==========

    /// Recorded payments, most-recent-first
    pub fn history(&self) -> Vec<PaymentEntry> {
        self.history.lock().list().to_vec()
    }

    /// Wipe the payment history; the open bill is not touched
    pub fn clear_history(&self) -> Result<(), BillingError> {
        self.history.lock().clear()
    }

    pub fn total_collected(&self) -> f64 {
        self.history.lock().total_collected()
    }
}
