//! Billing Desk - 服装店收银台 (UPI 收款)
//!
//! # 架构概述
//!
//! 快速录入商品、计算总额、生成 UPI 收款链接和二维码，
//! 并把"已收款"的账单冻结进本地支付历史。
//!
//! - **账单** (`bill`): 当前未付款的商品行与总额
//! - **支付历史** (`history`): 只追加的已收款记录，带版本的 JSON 编码
//! - **存储** (`storage`): 键值存储 (redb / 内存)
//! - **UPI** (`upi`): `upi://pay` 链接与二维码渲染
//! - **钱包唤起** (`handoff`): 打开钱包 App、延迟关闭收款弹窗
//! - **收银台** (`core`): 配置与 `BillingDesk` 门面
//!
//! # 模块结构
//!
//! ```text
//! billing-desk/src/
//! ├── bill/          # 账单与输入校验
//! ├── history/       # 支付历史与编码
//! ├── storage/       # KvStore, RedbKv, MemoryKv
//! ├── upi/           # 链接构造、二维码
//! ├── handoff/       # 钱包唤起、延迟重置
//! ├── core/          # 配置、BillingDesk
//! ├── utils/         # 日志、显示格式
//! └── console.rs     # 终端前端
//! ```

pub mod bill;
pub mod console;
pub mod core;
pub mod handoff;
pub mod history;
pub mod storage;
pub mod upi;
pub mod utils;

// Re-export 公共类型
pub use bill::BillLedger;
pub use core::{BillingDesk, DeskConfig, PaidReceipt, PaymentRequest};
pub use handoff::{HandoffScheduler, HandoffTicket, NoopLauncher, SystemLauncher, WalletLauncher};
pub use history::PaymentHistoryStore;
pub use storage::{KvStore, MemoryKv, RedbKv};
pub use upi::{QrImage, QrMode, QrRenderer, build_payment_url};

// Re-export unified error types from shared
pub use shared::{BillingError, BillingResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};
