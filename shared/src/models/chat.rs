//! Customer message threads

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Who wrote a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatSender {
    Customer,
    Admin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub sender: ChatSender,
    pub text: String,
    /// Unix millis
    pub timestamp: i64,
    #[serde(default)]
    pub read: bool,
}

/// All threads, keyed by customer email
pub type MessageThreads = BTreeMap<String, Vec<ChatMessage>>;

/// One thread in the admin inbox list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadSummary {
    pub email: String,
    pub last_message: Option<ChatMessage>,
    /// Customer messages the admin has not read
    pub unread: usize,
}
