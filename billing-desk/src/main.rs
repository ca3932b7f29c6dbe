use anyhow::Context;
use billing_desk::console::{Console, Outcome, parse_line};
use billing_desk::{BillingDesk, DeskConfig, NoopLauncher, QrMode, SystemLauncher, WalletLauncher};
use clap::Parser;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Quick-entry billing till with UPI payment links
#[derive(Debug, Parser)]
#[command(name = "billing-desk", version)]
struct Args {
    /// Working directory (database, logs)
    #[arg(long)]
    work_dir: Option<String>,

    /// Payee VPA, e.g. shop@okaxis
    #[arg(long)]
    vpa: Option<String>,

    /// Payee display name
    #[arg(long)]
    payee_name: Option<String>,

    /// QR rendering: local | remote
    #[arg(long)]
    qr_mode: Option<QrMode>,

    /// Log level when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Do not try to open a wallet app after "paid"
    #[arg(long)]
    no_wallet: bool,
}

impl Args {
    fn apply(self, config: &mut DeskConfig) {
        if let Some(dir) = self.work_dir {
            config.work_dir = dir;
        }
        if let Some(vpa) = self.vpa {
            config.vpa = vpa;
        }
        if let Some(name) = self.payee_name {
            config.payee_name = name;
        }
        if let Some(mode) = self.qr_mode {
            config.qr_mode = mode;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 环境变量 (.env) 与命令行参数
    dotenv::dotenv().ok();
    let args = Args::parse();
    let no_wallet = args.no_wallet;

    let mut config = DeskConfig::from_env();
    args.apply(&mut config);

    // 2. 日志 (guard 需存活到退出)
    let _log_guard = billing_desk::init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
    tracing::info!(work_dir = %config.work_dir, vpa = %config.vpa, "Billing desk starting");

    // 3. 打开收银台 (数据库不可用时退回内存存储，本次会话的记录不会保存)
    let (desk, open_error) = BillingDesk::open_or_ephemeral(config);
    if let Some(e) = open_error {
        println!("WARNING: {}. Payments recorded now will be lost on exit.", e);
    }
    let launcher: Box<dyn WalletLauncher> = if no_wallet {
        Box::new(NoopLauncher)
    } else {
        Box::new(SystemLauncher::default())
    };
    let mut console = Console::new(Arc::new(desk), launcher);

    println!("{}", billing_desk::console::HELP);

    // 4. 命令循环
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await.context("failed to read input")? else {
            break;
        };

        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match console.execute(command) {
            Outcome::Show(text) => println!("{}", text),
            Outcome::Confirm(question) => {
                println!("{}", question);
                print_prompt();
                let answer = lines.next_line().await.context("failed to read input")?;
                let confirmed = answer
                    .map(|a| matches!(a.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
                    .unwrap_or(false);
                if confirmed {
                    if let Outcome::Show(text) = console.confirm_clear_history() {
                        println!("{}", text);
                    }
                } else {
                    println!("Kept payment history.");
                }
            }
            Outcome::Quit => break,
        }
    }

    tracing::info!("Billing desk stopped");
    Ok(())
}

fn print_prompt() {
    use std::io::Write;
    print!("> ");
    let _ = std::io::stdout().flush();
}
