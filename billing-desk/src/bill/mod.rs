//! Working bill

pub mod input;
mod ledger;

pub use input::{ItemFields, MAX_PRICE, MAX_QUANTITY};
pub use ledger::{BillLedger, DEFAULT_FALLBACK_NAME};
