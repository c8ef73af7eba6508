//! Engine-side services

mod execution_log_service;

pub use execution_log_service::{ExecutionLogService, LogParams};
