//! Admin notification feed

use serde::{Deserialize, Serialize};

/// 通知类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// New booking submitted
    Booking,
    /// Member signed up
    NewMember,
    /// Password reset
    Security,
    /// Member logged out
    Logout,
    /// Customer sent a message
    Message,
}

/// Feed entry, stored newest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminNotification {
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub message: String,
    /// Unix millis
    pub timestamp: i64,
    #[serde(default)]
    pub read: bool,
    /// Related record (booking, user) as stored JSON
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl AdminNotification {
    pub fn new(kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            timestamp: crate::util::now_millis(),
            read: false,
            data: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }
}
