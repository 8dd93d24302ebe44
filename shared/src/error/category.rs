//! Error category classification

use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Account errors
/// - 4xxx: Class schedule errors
/// - 5xxx: Booking errors
/// - 8xxx: Member errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Account errors (1xxx)
    Account,
    /// Class schedule errors (4xxx)
    Class,
    /// Booking errors (5xxx)
    Booking,
    /// Member errors (8xxx)
    Member,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Account,
            4000..5000 => Self::Class,
            5000..6000 => Self::Booking,
            8000..9000 => Self::Member,
            _ => Self::System,
        }
    }

    /// 是否为用户可见的业务错误 (非系统错误)
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::System)
    }
}
