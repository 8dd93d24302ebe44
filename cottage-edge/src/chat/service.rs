//! Customer message threads, one per email

use shared::models::{AdminNotification, ChatMessage, ChatSender, MessageThreads, NotificationKind, ThreadSummary};
use shared::util::{now_millis, snowflake_id};

use crate::notifications::NotificationService;
use crate::store::{CollectionKey, RecordStore};
use crate::sync::Broadcaster;
use crate::utils::validation::{MAX_NOTE_LEN, normalize_email, validate_email, validate_required_text};
use crate::utils::AppResult;

/// Longest preview quoted in the admin notification
const PREVIEW_LEN: usize = 60;

#[derive(Debug, Clone)]
pub struct ChatService {
    store: RecordStore,
    broadcaster: Broadcaster,
    notifications: NotificationService,
}

impl ChatService {
    pub fn new(store: RecordStore, broadcaster: Broadcaster, notifications: NotificationService) -> Self {
        Self {
            store,
            broadcaster,
            notifications,
        }
    }

    pub fn send_customer_message(&self, email: &str, text: &str) -> AppResult<ChatMessage> {
        let message = self.append(email, ChatSender::Customer, text)?;

        let preview: String = message.text.chars().take(PREVIEW_LEN).collect();
        self.notifications.push(
            AdminNotification::new(
                NotificationKind::Message,
                format!("New message from {}: {}", normalize_email(email), preview),
            )
            .with_data(serde_json::json!({ "email": normalize_email(email) })),
        )?;
        Ok(message)
    }

    pub fn send_admin_reply(&self, email: &str, text: &str) -> AppResult<ChatMessage> {
        self.append(email, ChatSender::Admin, text)
    }

    /// Messages for one customer, oldest first
    pub fn thread(&self, email: &str) -> AppResult<Vec<ChatMessage>> {
        let mut threads = self.load()?;
        Ok(threads.remove(&normalize_email(email)).unwrap_or_default())
    }

    /// Inbox list, most recent activity first
    pub fn threads(&self) -> AppResult<Vec<ThreadSummary>> {
        let mut summaries: Vec<ThreadSummary> = self
            .load()?
            .into_iter()
            .map(|(email, messages)| ThreadSummary {
                unread: unread_from_customer(&messages),
                last_message: messages.last().cloned(),
                email,
            })
            .collect();
        summaries.sort_by_key(|s| std::cmp::Reverse(s.last_message.as_ref().map(|m| m.timestamp).unwrap_or(0)));
        Ok(summaries)
    }

    /// Mark the customer's messages in a thread as read; returns how many changed
    pub fn mark_thread_read(&self, email: &str) -> AppResult<usize> {
        let mut threads = self.load()?;
        let Some(messages) = threads.get_mut(&normalize_email(email)) else {
            return Ok(0);
        };
        let mut marked = 0;
        for m in messages.iter_mut().filter(|m| m.sender == ChatSender::Customer && !m.read) {
            m.read = true;
            marked += 1;
        }
        if marked > 0 {
            self.save(&threads)?;
        }
        Ok(marked)
    }

    /// Unread customer messages across all threads
    pub fn unread_count(&self) -> AppResult<usize> {
        Ok(self.load()?.values().map(|m| unread_from_customer(m)).sum())
    }

    fn append(&self, email: &str, sender: ChatSender, text: &str) -> AppResult<ChatMessage> {
        validate_email(email)?;
        validate_required_text(text, "message", MAX_NOTE_LEN)?;

        let message = ChatMessage {
            id: snowflake_id(),
            sender,
            text: text.trim().to_string(),
            timestamp: now_millis(),
            read: false,
        };

        let mut threads = self.load()?;
        threads
            .entry(normalize_email(email))
            .or_default()
            .push(message.clone());
        self.save(&threads)?;

        tracing::debug!(email = %normalize_email(email), sender = ?sender, "Message appended");
        Ok(message)
    }

    fn load(&self) -> AppResult<MessageThreads> {
        Ok(self.store.read_document(CollectionKey::Messages)?)
    }

    fn save(&self, threads: &MessageThreads) -> AppResult<()> {
        self.store.write_document(CollectionKey::Messages, threads)?;
        self.broadcaster.announce_change(CollectionKey::Messages)?;
        Ok(())
    }
}

fn unread_from_customer(messages: &[ChatMessage]) -> usize {
    messages
        .iter()
        .filter(|m| m.sender == ChatSender::Customer && !m.read)
        .count()
}
