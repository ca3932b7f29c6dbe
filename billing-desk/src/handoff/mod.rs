//! Wallet handoff: dispatching the payment link and the delayed UI reset

mod launcher;
mod scheduler;

pub use launcher::{NoopLauncher, SystemLauncher, WalletLauncher};
pub use scheduler::{DEFAULT_RESET_DELAY_MS, HandoffScheduler, HandoffTicket};
