//! Desk core: configuration and the BillingDesk facade

pub mod config;
pub mod desk;

pub use config::DeskConfig;
pub use desk::{BillingDesk, PaidReceipt, PaymentRequest};
