//! Member Model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How the account came to exist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccountType {
    /// Signed up through the account form
    #[default]
    SelfRegistered,
    /// Synthesized at the member's first booking
    AutoCreated,
}

/// Member account (会员)
///
/// `email` is the unique key. Passwords are kept as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_experience")]
    pub experience: String,
    #[serde(default)]
    pub account_type: AccountType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_last_updated: Option<DateTime<Utc>>,
}

fn default_experience() -> String {
    "beginner".to_string()
}

impl UserRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Case-insensitive email match
    pub fn has_email(&self, email: &str) -> bool {
        self.email.eq_ignore_ascii_case(email.trim())
    }
}

/// Sign-up form payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub dietary: Option<String>,
}
