pub mod format;
pub mod logger;

pub use format::{format_date_time, format_inr, item_summary};
pub use logger::{init_logger, init_logger_with_file};
