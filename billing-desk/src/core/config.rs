use crate::bill::DEFAULT_FALLBACK_NAME;
use crate::handoff::DEFAULT_RESET_DELAY_MS;
use crate::history::DEFAULT_HISTORY_KEY;
use crate::upi::QrMode;
use crate::upi::qr::DEFAULT_QR_SIZE;
use crate::upi::url::DEFAULT_CURRENCY;
use chrono_tz::Tz;
use std::path::PathBuf;
use std::time::Duration;

/// 默认收款 VPA
pub const DEFAULT_UPI_VPA: &str = "9583252256-3@axl";
/// 默认收款人名称
pub const DEFAULT_PAYEE_NAME: &str = "KHERWAL BAZAAR";
/// 默认支付方式标签
pub const DEFAULT_PAYMENT_METHOD: &str = "UPI";
/// 默认营业时区
pub const DEFAULT_BUSINESS_TZ: Tz = chrono_tz::Asia::Kolkata;

/// 收银台配置
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖 (也可写入 `.env`)：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./billing-data | 工作目录 (数据库、日志) |
/// | UPI_VPA | 9583252256-3@axl | 收款 VPA |
/// | UPI_PAYEE_NAME | KHERWAL BAZAAR | 收款人名称 |
/// | UPI_CURRENCY | INR | 币种 |
/// | PAYMENT_METHOD | UPI | 记录在支付条目上的方式标签 |
/// | FALLBACK_ITEM_NAME | Garments | 名称留空时使用的商品名 |
/// | HISTORY_KEY | kherwal_bazaar_payment_history_v1 | 支付历史存储键 |
/// | QR_MODE | local | 二维码渲染: local \| remote |
/// | QR_SIZE | 280 | 二维码边长 (像素) |
/// | HANDOFF_RESET_MS | 1000 | 唤起钱包后关闭弹窗的延迟 (毫秒) |
/// | BUSINESS_TZ | Asia/Kolkata | 营业时区 (显示用) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，设置后按天滚动写文件 |
///
/// # 示例
///
/// ```ignore
/// UPI_VPA=shop@okaxis UPI_PAYEE_NAME="My Shop" cargo run -p billing-desk
/// ```
#[derive(Debug, Clone)]
pub struct DeskConfig {
    /// 工作目录，存放数据库等文件
    pub work_dir: String,
    pub vpa: String,
    pub payee_name: String,
    pub currency: String,
    pub payment_method: String,
    pub fallback_item_name: String,
    pub history_key: String,
    pub qr_mode: QrMode,
    pub qr_size: u32,
    pub handoff_reset_ms: u64,
    pub business_tz: Tz,
    pub log_level: String,
    pub log_dir: Option<String>,
}

impl DeskConfig {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./billing-data".into()),
            vpa: std::env::var("UPI_VPA").unwrap_or_else(|_| DEFAULT_UPI_VPA.into()),
            payee_name: std::env::var("UPI_PAYEE_NAME").unwrap_or_else(|_| DEFAULT_PAYEE_NAME.into()),
            currency: std::env::var("UPI_CURRENCY").unwrap_or_else(|_| DEFAULT_CURRENCY.into()),
            payment_method: std::env::var("PAYMENT_METHOD")
                .unwrap_or_else(|_| DEFAULT_PAYMENT_METHOD.into()),
            fallback_item_name: std::env::var("FALLBACK_ITEM_NAME")
                .unwrap_or_else(|_| DEFAULT_FALLBACK_NAME.into()),
            history_key: std::env::var("HISTORY_KEY").unwrap_or_else(|_| DEFAULT_HISTORY_KEY.into()),
            qr_mode: std::env::var("QR_MODE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or_default(),
            qr_size: std::env::var("QR_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_QR_SIZE),
            handoff_reset_ms: std::env::var("HANDOFF_RESET_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_RESET_DELAY_MS),
            business_tz: std::env::var("BUSINESS_TZ")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_BUSINESS_TZ),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
        }
    }

    /// 使用指定工作目录，其余取默认值 (不读环境变量)
    ///
    /// 常用于测试场景
    pub fn with_work_dir(work_dir: impl Into<String>) -> Self {
        Self {
            work_dir: work_dir.into(),
            ..Self::defaults()
        }
    }

    fn defaults() -> Self {
        Self {
            work_dir: "./billing-data".into(),
            vpa: DEFAULT_UPI_VPA.into(),
            payee_name: DEFAULT_PAYEE_NAME.into(),
            currency: DEFAULT_CURRENCY.into(),
            payment_method: DEFAULT_PAYMENT_METHOD.into(),
            fallback_item_name: DEFAULT_FALLBACK_NAME.into(),
            history_key: DEFAULT_HISTORY_KEY.into(),
            qr_mode: QrMode::default(),
            qr_size: DEFAULT_QR_SIZE,
            handoff_reset_ms: DEFAULT_RESET_DELAY_MS,
            business_tz: DEFAULT_BUSINESS_TZ,
            log_level: "info".into(),
            log_dir: None,
        }
    }

    /// 数据库文件路径
    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("billing.redb")
    }

    pub fn handoff_reset_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_reset_ms)
    }
}

impl Default for DeskConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
