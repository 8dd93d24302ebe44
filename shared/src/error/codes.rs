//! Unified error codes for the Cottage booking node
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Account errors
//! - 4xxx: Class schedule errors
//! - 5xxx: Booking errors
//! - 8xxx: Member / message errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the views can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Account ====================
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Passwords do not match
    PasswordMismatch = 1010,
    /// Password too short
    PasswordTooShort = 1011,

    // ==================== 4xxx: Class ====================
    /// Class not found
    ClassNotFound = 4001,
    /// Class date is in the past
    ClassDateInPast = 4002,
    /// Capacity below seats already booked
    CapacityBelowBooked = 4003,

    // ==================== 5xxx: Booking ====================
    /// Not enough seats left
    InsufficientSeats = 5001,
    /// Booking not found
    BookingNotFound = 5002,

    // ==================== 8xxx: Member ====================
    /// Member not found
    MemberNotFound = 8001,
    /// Email already registered
    MemberEmailExists = 8002,

    // ==================== 9xxx: System ====================
    /// Internal error
    InternalError = 9001,
    /// Storage engine error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Category derived from the leading digit
    pub fn category(&self) -> super::ErrorCategory {
        super::ErrorCategory::from_code(self.code())
    }

    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Account
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::PasswordMismatch => "Passwords do not match",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters long",

            // Class
            ErrorCode::ClassNotFound => "Class not found",
            ErrorCode::ClassDateInPast => "Please select a future date",
            ErrorCode::CapacityBelowBooked => "Capacity is below seats already booked",

            // Booking
            ErrorCode::InsufficientSeats => "Not enough seats available for this class",
            ErrorCode::BookingNotFound => "Booking not found",

            // Member
            ErrorCode::MemberNotFound => "No account found with that email address",
            ErrorCode::MemberEmailExists => "An account with this email already exists",

            // System
            ErrorCode::InternalError => "Internal error",
            ErrorCode::DatabaseError => "Storage error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Account
            1002 => Ok(ErrorCode::InvalidCredentials),
            1010 => Ok(ErrorCode::PasswordMismatch),
            1011 => Ok(ErrorCode::PasswordTooShort),

            // Class
            4001 => Ok(ErrorCode::ClassNotFound),
            4002 => Ok(ErrorCode::ClassDateInPast),
            4003 => Ok(ErrorCode::CapacityBelowBooked),

            // Booking
            5001 => Ok(ErrorCode::InsufficientSeats),
            5002 => Ok(ErrorCode::BookingNotFound),

            // Member
            8001 => Ok(ErrorCode::MemberNotFound),
            8002 => Ok(ErrorCode::MemberEmailExists),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);
        assert_eq!(ErrorCode::ClassNotFound.code(), 4001);
        assert_eq!(ErrorCode::InsufficientSeats.code(), 5001);
        assert_eq!(ErrorCode::MemberEmailExists.code(), 8002);
        assert_eq!(ErrorCode::DatabaseError.code(), 9002);
    }

    #[test]
    fn test_try_from_round_trips_known_codes() {
        for code in [
            ErrorCode::NotFound,
            ErrorCode::PasswordTooShort,
            ErrorCode::CapacityBelowBooked,
            ErrorCode::BookingNotFound,
            ErrorCode::ConfigError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_try_from_rejects_unknown_code() {
        assert_eq!(ErrorCode::try_from(4999), Err(InvalidErrorCode(4999)));
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&ErrorCode::InsufficientSeats).unwrap();
        assert_eq!(json, "5001");
        let back: ErrorCode = serde_json::from_str("5001").unwrap();
        assert_eq!(back, ErrorCode::InsufficientSeats);
    }
}
