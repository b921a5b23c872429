pub mod date_utils;
pub mod log_utils;

pub use date_utils::{long_date_label, short_date_label, today};
pub use log_utils::init_logging;
