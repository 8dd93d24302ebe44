//! Class Record Models
//!
//! | Type | Stored under | Role |
//! |------|--------------|------|
//! | [`AdminClassRecord`] | `cottageClassesAdmin` | authoritative schedule |
//! | [`PublicClassEntry`] | `cottageClasses` | derived calendar view |

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::category::ClassCategory;

/// Scheduled class (管理端权威记录)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminClassRecord {
    pub id: i64,
    #[serde(rename = "type")]
    pub category: ClassCategory,
    /// Display name, copied from the category lookup at creation
    pub name: String,
    pub date: NaiveDate,
    /// Start time, `HH:MM`
    pub time: String,
    pub max_seats: u32,
    pub booked_seats: u32,
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AdminClassRecord {
    /// Seats still open (`maxSeats - bookedSeats`, floored at zero)
    pub fn available_seats(&self) -> u32 {
        self.max_seats.saturating_sub(self.booked_seats)
    }

    /// Date-only comparison: a class dated today is still upcoming
    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        self.date >= today
    }

    /// Revenue from seats already booked
    pub fn booked_revenue(&self) -> Decimal {
        self.price * Decimal::from(self.booked_seats)
    }
}

/// Create / update class payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassInput {
    #[serde(rename = "type")]
    pub category: ClassCategory,
    pub date: NaiveDate,
    pub time: String,
    pub max_seats: u32,
    pub price: Decimal,
    pub notes: Option<String>,
}

/// Calendar entry shown to visitors (公开日历条目)
///
/// Strictly derived from [`AdminClassRecord`]; only the booking transaction
/// decrements `seats` in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicClassEntry {
    pub id: i64,
    pub date: NaiveDate,
    /// Display name of the class
    #[serde(rename = "class")]
    pub class_name: String,
    pub seats: u32,
}

impl PublicClassEntry {
    /// Canonical category behind the display name
    pub fn category(&self) -> ClassCategory {
        ClassCategory::from_display_name(&self.class_name)
    }

    pub fn is_full(&self) -> bool {
        self.seats == 0
    }
}
