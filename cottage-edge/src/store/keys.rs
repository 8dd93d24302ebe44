//! Stored collection keys
//!
//! Key names match the layout the browser views already use, so a store
//! exported from one can be read by the other.

use std::fmt;
use std::str::FromStr;

/// One key in the record store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKey {
    /// `[AdminClassRecord]`
    AdminClasses,
    /// `[PublicClassEntry]`
    PublicClasses,
    /// `[BookingRecord]`
    Bookings,
    /// `[UserRecord]`
    Users,
    /// `{ email: [ChatMessage] }`
    Messages,
    /// `[AdminNotification]`, newest first
    Notifications,
    /// Unix millis of the last announced change
    LastUpdate,
}

impl CollectionKey {
    pub const ALL: [CollectionKey; 7] = [
        CollectionKey::AdminClasses,
        CollectionKey::PublicClasses,
        CollectionKey::Bookings,
        CollectionKey::Users,
        CollectionKey::Messages,
        CollectionKey::Notifications,
        CollectionKey::LastUpdate,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            CollectionKey::AdminClasses => "cottageClassesAdmin",
            CollectionKey::PublicClasses => "cottageClasses",
            CollectionKey::Bookings => "cottageBookings",
            CollectionKey::Users => "users",
            CollectionKey::Messages => "userMessages",
            CollectionKey::Notifications => "adminNotifications",
            CollectionKey::LastUpdate => "lastUpdate",
        }
    }

    /// Keys whose changes should re-render the class calendar
    pub fn affects_calendar(&self) -> bool {
        matches!(self, CollectionKey::AdminClasses | CollectionKey::PublicClasses)
    }
}

impl fmt::Display for CollectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CollectionKey::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("unknown collection key: {s}"))
    }
}
