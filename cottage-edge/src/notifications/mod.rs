//! 管理端通知
//!
//! 最新的在前，超出上限的旧通知直接丢弃。

use shared::models::AdminNotification;

use crate::store::{CollectionKey, RecordStore};
use crate::sync::Broadcaster;
use crate::utils::AppResult;

/// 默认保留条数
pub const DEFAULT_NOTIFICATION_CAP: usize = 50;

#[derive(Debug, Clone)]
pub struct NotificationService {
    store: RecordStore,
    broadcaster: Broadcaster,
    cap: usize,
}

impl NotificationService {
    pub fn new(store: RecordStore, broadcaster: Broadcaster) -> Self {
        Self::with_cap(store, broadcaster, DEFAULT_NOTIFICATION_CAP)
    }

    pub fn with_cap(store: RecordStore, broadcaster: Broadcaster, cap: usize) -> Self {
        Self {
            store,
            broadcaster,
            cap: cap.max(1),
        }
    }

    pub fn push(&self, notification: AdminNotification) -> AppResult<()> {
        let mut feed: Vec<AdminNotification> = self.store.read(CollectionKey::Notifications)?;
        tracing::debug!(kind = ?notification.kind, message = %notification.message, "Admin notification");
        feed.insert(0, notification);
        feed.truncate(self.cap);
        self.save(&feed)
    }

    pub fn list(&self) -> AppResult<Vec<AdminNotification>> {
        Ok(self.store.read(CollectionKey::Notifications)?)
    }

    pub fn unread_count(&self) -> AppResult<usize> {
        Ok(self.list()?.iter().filter(|n| !n.read).count())
    }

    /// 返回本次标记的数量
    pub fn mark_all_read(&self) -> AppResult<usize> {
        let mut feed = self.list()?;
        let mut marked = 0;
        for n in feed.iter_mut().filter(|n| !n.read) {
            n.read = true;
            marked += 1;
        }
        if marked > 0 {
            self.save(&feed)?;
        }
        Ok(marked)
    }

    fn save(&self, feed: &[AdminNotification]) -> AppResult<()> {
        self.store.write(CollectionKey::Notifications, feed)?;
        self.broadcaster.announce_change(CollectionKey::Notifications)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::ChangeBus;
    use shared::models::NotificationKind;

    fn service(cap: usize) -> NotificationService {
        let store = RecordStore::open_in_memory(ChangeBus::new()).unwrap();
        NotificationService::with_cap(store.clone(), Broadcaster::new(store), cap)
    }

    #[test]
    fn newest_first_and_capped() {
        let svc = service(3);
        for i in 0..5 {
            svc.push(AdminNotification::new(NotificationKind::Booking, format!("n{i}")))
                .unwrap();
        }
        let feed = svc.list().unwrap();
        let messages: Vec<&str> = feed.iter().map(|n| n.message.as_str()).collect();
        assert_eq!(messages, vec!["n4", "n3", "n2"]);
    }

    #[test]
    fn mark_all_read() {
        let svc = service(DEFAULT_NOTIFICATION_CAP);
        svc.push(AdminNotification::new(NotificationKind::NewMember, "a")).unwrap();
        svc.push(AdminNotification::new(NotificationKind::Security, "b")).unwrap();
        assert_eq!(svc.unread_count().unwrap(), 2);
        assert_eq!(svc.mark_all_read().unwrap(), 2);
        assert_eq!(svc.unread_count().unwrap(), 0);
        assert_eq!(svc.mark_all_read().unwrap(), 0);
    }
}
