//! 工具模块
//!
//! - [`error`] - 错误类型 (from shared::error) 与存储错误转换
//! - [`logger`] - 日志初始化
//! - [`time`] - 日期/时间解析
//! - [`validation`] - 输入校验

pub mod error;
pub mod logger;
pub mod time;
pub mod validation;

pub use error::{AppError, AppResult, ErrorCategory, ErrorCode};
