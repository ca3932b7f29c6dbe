//! Wallet dispatch
//!
//! Handing the link to a wallet app is fire-and-forget: nothing comes back,
//! so a successful launch says nothing about whether money moved.

use shared::BillingError;
use std::process::{Command, ExitStatus, Stdio};
use std::thread::JoinHandle;

/// Opens a `upi://` link in whatever wallet the platform picks
pub trait WalletLauncher: Send + Sync {
    fn launch(&self, url: &str) -> Result<(), BillingError>;
}

/// Launcher that only logs the link (headless tills, tests)
#[derive(Debug, Clone, Default)]
pub struct NoopLauncher;

impl WalletLauncher for NoopLauncher {
    fn launch(&self, url: &str) -> Result<(), BillingError> {
        tracing::info!(url = %url, "Wallet launch skipped (no launcher configured)");
        Ok(())
    }
}

/// Launcher that hands the link to the OS URL opener
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    program: String,
    args: Vec<String>,
}

impl Default for SystemLauncher {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Self::with_command("open", &[])
        } else if cfg!(target_os = "windows") {
            Self::with_command("cmd", &["/C", "start", ""])
        } else {
            Self::with_command("xdg-open", &[])
        }
    }
}

impl SystemLauncher {
    pub fn with_command(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// Start the opener and reap it on a background thread
    fn spawn_reaped(&self, url: &str) -> std::io::Result<JoinHandle<std::io::Result<ExitStatus>>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;

        let program = self.program.clone();
        Ok(std::thread::spawn(move || {
            let status = child.wait();
            match &status {
                Ok(s) if !s.success() => {
                    tracing::warn!(program = %program, status = %s, "Wallet opener exited with failure")
                }
                Err(e) => tracing::warn!(program = %program, error = %e, "Failed to reap wallet opener"),
                Ok(_) => {}
            }
            status
        }))
    }
}

impl WalletLauncher for SystemLauncher {
    fn launch(&self, url: &str) -> Result<(), BillingError> {
        self.spawn_reaped(url)
            .map(|_reaper| {
                tracing::info!(program = %self.program, "Wallet link dispatched");
            })
            .map_err(|e| {
                tracing::warn!(program = %self.program, error = %e, "Wallet dispatch failed");
                BillingError::handoff(format!("cannot run {}: {}", self.program, e))
            })
    }
}
