//! Booking Model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::ClassCategory;

/// Booking status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Pending,
    Cancelled,
}

impl BookingStatus {
    /// Whether seats booked under this status count against capacity
    pub fn holds_seats(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Confirmed => write!(f, "confirmed"),
            Self::Pending => write!(f, "pending"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Booking ledger entry (预订记录, append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRecord {
    pub id: i64,
    pub date: NaiveDate,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    /// Category key, not the display name
    pub class_name: ClassCategory,
    pub seats: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<String>,
    pub status: BookingStatus,
    pub booking_time: DateTime<Utc>,
}

/// Customer details from the booking form
///
/// The form has already checked required fields and the email shape; the
/// booking transaction checks again before touching storage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dietary: Option<String>,
}

impl CustomerInfo {
    /// First word of the name
    pub fn first_name(&self) -> &str {
        self.name.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the first word
    pub fn last_name(&self) -> String {
        self.name
            .split_whitespace()
            .skip(1)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
