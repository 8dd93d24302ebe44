//! 统一错误处理
//!
//! 服务层统一返回 [`AppResult`]。存储错误在这里转换为系统错误码，
//! 原始信息只进日志，不进入面向用户的 message。

pub use shared::error::{AppError, AppResult, ErrorCategory, ErrorCode};

use crate::store::StorageError;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        tracing::error!(error = %err, "Storage failure");
        match err {
            StorageError::Serialization(e) => {
                AppError::with_message(ErrorCode::InvalidFormat, format!("Stored data could not be encoded: {e}"))
            }
            other => AppError::database(other.to_string()),
        }
    }
}
