//! Class Category Model
//!
//! The one canonical identity of a class kind. Admin records store the key
//! (`type`), public entries and schedules show the display name, and bookings
//! store the key again (`className`). Every conversion between the two goes
//! through this type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class category (课程类别)
///
/// Unknown keys are kept verbatim in [`ClassCategory::Other`]; their display
/// name is the key itself.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClassCategory {
    Bread,
    FarmToTable,
    Desserts,
    Other(String),
}

impl ClassCategory {
    /// Built-in categories, in menu order
    pub const KNOWN: [ClassCategory; 3] = [
        ClassCategory::Bread,
        ClassCategory::FarmToTable,
        ClassCategory::Desserts,
    ];

    /// Stored category key
    pub fn key(&self) -> &str {
        match self {
            Self::Bread => "bread",
            Self::FarmToTable => "farm-to-table",
            Self::Desserts => "desserts",
            Self::Other(key) => key,
        }
    }

    /// Display name shown on schedules and the public calendar
    pub fn display_name(&self) -> &str {
        match self {
            Self::Bread => "Artisan Bread Making",
            Self::FarmToTable => "Farm-to-Table Cooking",
            Self::Desserts => "Classic Desserts",
            Self::Other(key) => key,
        }
    }

    /// Parse a stored key. Never fails: unknown keys become `Other`.
    pub fn from_key(key: &str) -> Self {
        match key.trim().to_ascii_lowercase().as_str() {
            "bread" => Self::Bread,
            "farm-to-table" => Self::FarmToTable,
            "desserts" => Self::Desserts,
            _ => Self::Other(key.trim().to_string()),
        }
    }

    /// Reverse of [`display_name`](Self::display_name), case-insensitive.
    ///
    /// Only whole display names match; anything else is a custom category
    /// whose display name is its key.
    pub fn from_display_name(name: &str) -> Self {
        let name = name.trim();
        Self::KNOWN
            .into_iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(name))
            .unwrap_or_else(|| Self::Other(name.to_string()))
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl From<String> for ClassCategory {
    fn from(key: String) -> Self {
        Self::from_key(&key)
    }
}

impl From<ClassCategory> for String {
    fn from(category: ClassCategory) -> Self {
        category.key().to_string()
    }
}

impl fmt::Display for ClassCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
