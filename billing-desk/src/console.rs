//! Line-oriented till front-end
//!
//! Parses one command per line and renders the bill, the QR "modal" and the
//! payment history as plain text. Holds no bill state of its own: everything
//! is read back from the [`BillingDesk`] after each command.

use crate::core::{BillingDesk, PaymentRequest};
use crate::handoff::{HandoffScheduler, HandoffTicket, WalletLauncher};
use crate::upi::{QrImage, render_terminal};
use crate::utils::{format_date_time, format_inr, item_summary};
use chrono_tz::Tz;
use shared::{BillingError, LineItem, PaymentEntry};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// File the PNG payment QR is written to, under the work dir
pub const QR_PNG_FILE: &str = "payment-qr.png";

pub const HELP: &str = "\
Commands:
  add <name|-> <qty|-> <price>   add an item (- leaves the field blank)
  rm <n>                         remove item number n of the bill
  list                           show the bill
  qr                             show the payment QR for the bill
  paid                           record the bill as paid and open the wallet
  history                        show recorded payments
  clear-history                  delete all recorded payments
  help                           this text
  quit                           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { name: String, qty: String, price: String },
    Remove(usize),
    List,
    Qr,
    Paid,
    History,
    ClearHistory,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("unknown command '{0}', type 'help'")]
    Unknown(String),
}

/// Parse one input line; blank lines give `Ok(None)`
pub fn parse_line(line: &str) -> Result<Option<Command>, CommandError> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let Some((&head, args)) = tokens.split_first() else {
        return Ok(None);
    };

    let command = match head.to_ascii_lowercase().as_str() {
        "add" | "a" => parse_add(args)?,
        "rm" | "remove" => {
            let [n] = args else {
                return Err(CommandError::Usage("rm <n>"));
            };
            let n: usize = n.parse().map_err(|_| CommandError::Usage("rm <n>"))?;
            if n == 0 {
                return Err(CommandError::Usage("rm <n>"));
            }
            Command::Remove(n)
        }
        "list" | "ls" => Command::List,
        "qr" | "pay" => Command::Qr,
        "paid" => Command::Paid,
        "history" | "h" => Command::History,
        "clear-history" => Command::ClearHistory,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

/// `add 100`, or `add <name words...> <qty> <price>`
fn parse_add(args: &[&str]) -> Result<Command, CommandError> {
    const USAGE: &str = "add <name|-> <qty|-> <price>";
    let blank = |s: &str| if s == "-" { String::new() } else { s.to_string() };

    match args {
        [price] => Ok(Command::Add {
            name: String::new(),
            qty: String::new(),
            price: price.to_string(),
        }),
        [name @ .., qty, price] if !name.is_empty() => {
            let name = if name == ["-"] { String::new() } else { name.join(" ") };
            Ok(Command::Add {
                name,
                qty: blank(qty),
                price: price.to_string(),
            })
        }
        _ => Err(CommandError::Usage(USAGE)),
    }
}

// ========== Rendering ==========

pub fn render_bill(items: &[LineItem], total: f64) -> String {
    if items.is_empty() {
        return "Bill is empty.".to_string();
    }
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<24} {:>4} × {:>12} = {:>14}",
            i + 1,
            item.name,
            item.qty,
            format_inr(item.price),
            item.line_total().map(format_inr).unwrap_or_else(|| "-".to_string())
        );
    }
    let _ = write!(out, "     Total: {}", format_inr(total));
    out
}

/// `collected` is the store's running total
pub fn render_history(entries: &[PaymentEntry], collected: f64, tz: Tz) -> String {
    if entries.is_empty() {
        return "No payments recorded.".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "{}  {:>14}  {}",
            format_date_time(entry.created_at, tz),
            format_inr(entry.amount),
            item_summary(&entry.items)
        );
    }
    let _ = write!(out, "{} payment(s), collected {}", entries.len(), format_inr(collected));
    out
}

/// `[4001 bill] <notice>: <detail>`
pub fn render_error(err: &BillingError) -> String {
    let code = err.code();
    let category = code.category();
    if !category.is_user_error() {
        tracing::warn!(code = %code, category = category.name(), error = %err, "Till operation failed");
    }
    format!("[{} {}] {}: {}", code, category.name(), err.notice(), err)
}

/// QR modal text; `saved_png` is where the PNG was written, if anywhere
pub fn render_request(request: &PaymentRequest, saved_png: Option<&Path>) -> String {
    let mut out = String::new();
    match &request.qr {
        QrImage::Png(_) => {
            match render_terminal(&request.url) {
                Ok(text) => {
                    let _ = writeln!(out, "{}", text);
                }
                Err(e) => {
                    let _ = writeln!(out, "(QR unavailable: {})", e);
                }
            }
            if let Some(path) = saved_png {
                let _ = writeln!(out, "QR image: {}", path.display());
            }
        }
        QrImage::Remote(url) => {
            let _ = writeln!(out, "QR image: {}", url);
        }
    }
    let _ = writeln!(out, "Amount: {}", format_inr(request.amount));
    let _ = write!(out, "Link:   {}", request.url);
    out
}

// ========== Session ==========

/// What the caller should do after a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Show(String),
    /// Ask the merchant, then call [`Console::confirm_clear_history`]
    Confirm(String),
    Quit,
}

/// One till session over a desk
pub struct Console {
    desk: Arc<BillingDesk>,
    launcher: Box<dyn WalletLauncher>,
    scheduler: HandoffScheduler,
    modal_open: Arc<AtomicBool>,
    pending_reset: Option<HandoffTicket>,
}

impl Console {
    pub fn new(desk: Arc<BillingDesk>, launcher: Box<dyn WalletLauncher>) -> Self {
        let scheduler = HandoffScheduler::new(desk.config().handoff_reset_delay());
        Self {
            desk,
            launcher,
            scheduler,
            modal_open: Arc::new(AtomicBool::new(false)),
            pending_reset: None,
        }
    }

    pub fn desk(&self) -> &BillingDesk {
        &self.desk
    }

    /// Whether the payment QR is currently on screen
    pub fn is_modal_open(&self) -> bool {
        self.modal_open.load(Ordering::SeqCst)
    }

    /// Run one command; must be called inside a tokio runtime
    pub fn execute(&mut self, command: Command) -> Outcome {
        match command {
            Command::Add { name, qty, price } => match self.desk.add_item(&name, &qty, &price) {
                Ok(item) => {
                    tracing::debug!(item_id = %item.id, "Added from console");
                    Outcome::Show(self.bill_view())
                }
                Err(e) => Outcome::Show(render_error(&e)),
            },
            Command::Remove(n) => {
                let items = self.desk.items();
                match n.checked_sub(1).and_then(|i| items.get(i)) {
                    Some(item) => {
                        self.desk.remove_item(&item.id);
                        Outcome::Show(self.bill_view())
                    }
                    None => Outcome::Show(format!("No item {} on the bill.", n)),
                }
            }
            Command::List => Outcome::Show(self.bill_view()),
            Command::Qr => match self.desk.payment_request() {
                Ok(request) => {
                    self.open_modal();
                    let saved = self.save_qr_png(&request.qr);
                    Outcome::Show(render_request(&request, saved.as_deref()))
                }
                Err(e) => Outcome::Show(render_error(&e)),
            },
            Command::Paid => self.mark_paid(),
            Command::History => Outcome::Show(self.history_view()),
            Command::ClearHistory => {
                if self.desk.history().is_empty() {
                    Outcome::Show("No payments recorded.".to_string())
                } else {
                    Outcome::Confirm("Delete all payment history? This cannot be undone. [y/N]".to_string())
                }
            }
            Command::Help => Outcome::Show(HELP.to_string()),
            Command::Quit => {
                self.cancel_pending_reset();
                Outcome::Quit
            }
        }
    }

    pub fn confirm_clear_history(&mut self) -> Outcome {
        match self.desk.clear_history() {
            Ok(()) => Outcome::Show(format!("History cleared.\n{}\n{}", self.history_view(), self.bill_view())),
            Err(e) => Outcome::Show(render_error(&e)),
        }
    }

    fn mark_paid(&mut self) -> Outcome {
        let receipt = match self.desk.mark_paid() {
            Ok(receipt) => receipt,
            Err(e) => return Outcome::Show(render_error(&e)),
        };

        let mut out = format!(
            "Recorded {} ({}).",
            format_inr(receipt.entry.amount),
            item_summary(&receipt.entry.items)
        );

        // 已记账，钱包唤起失败只提示
        if let Err(e) = self.launcher.launch(&receipt.url) {
            let _ = write!(out, "\nCould not open a wallet app: {}\nLink: {}", e, receipt.url);
        }

        self.open_modal();
        self.schedule_modal_reset();

        let _ = write!(out, "\n{}\n{}", self.bill_view(), self.history_view());
        Outcome::Show(out)
    }

    /// Write a PNG QR next to the database for a customer-facing screen
    fn save_qr_png(&self, qr: &QrImage) -> Option<PathBuf> {
        let QrImage::Png(bytes) = qr else {
            return None;
        };
        let path = Path::new(&self.desk.config().work_dir).join(QR_PNG_FILE);
        match std::fs::write(&path, bytes) {
            Ok(()) => Some(path),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to save QR image");
                None
            }
        }
    }

    fn open_modal(&mut self) {
        self.cancel_pending_reset();
        self.modal_open.store(true, Ordering::SeqCst);
    }

    fn schedule_modal_reset(&mut self) {
        let modal_open = self.modal_open.clone();
        let ticket = self.scheduler.schedule(move || {
            modal_open.store(false, Ordering::SeqCst);
            tracing::debug!("Payment modal closed");
        });
        self.pending_reset = Some(ticket);
    }

    fn cancel_pending_reset(&mut self) {
        if let Some(ticket) = self.pending_reset.take() {
            ticket.cancel();
        }
    }

    /// Wait for a scheduled modal reset, if any
    pub async fn settle(&mut self) -> bool {
        match self.pending_reset.take() {
            Some(ticket) => ticket.wait().await,
            None => false,
        }
    }

    fn bill_view(&self) -> String {
        let items = self.desk.items();
        render_bill(&items, self.desk.grand_total())
    }

    fn history_view(&self) -> String {
        render_history(
            &self.desk.history(),
            self.desk.total_collected(),
            self.desk.config().business_tz,
        )
    }
}
