//! Shared helpers: logging and progress, text cleanup, link discovery.

pub mod html;
pub mod logging;
pub mod text;

pub use logging::{RowProgress, log_operation_complete, log_operation_start, log_warning};
