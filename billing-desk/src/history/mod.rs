//! Payment history: the persisted ledger of completed payments

pub mod codec;
mod store;

pub use store::{DEFAULT_HISTORY_KEY, PaymentHistoryStore};
