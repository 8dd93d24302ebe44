//! 日历刷新
//!
//! 公开日历挂载后有两个刷新来源：
//! - 监听器：收到日历相关键的通知就重新读取
//! - 轮询器：每隔 `interval` 检查 `lastUpdate`，如果在最近一个周期内有宣告就重新读取
//!
//! 两者可能对同一次变更各触发一次，[`CalendarView::refresh`] 必须幂等。

use std::sync::Arc;
use std::time::Duration;

use shared::models::PublicClassEntry;
use shared::util::now_millis;

use crate::classes::load_public_classes;
use crate::core::{BackgroundTasks, TaskKind};
use crate::store::{CollectionKey, RecordStore, StorageResult};

/// 默认轮询周期
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// 可被刷新的日历视图
pub trait CalendarView: Send + Sync + 'static {
    /// 用最新的公开课程列表重新渲染
    fn refresh(&self, classes: &[PublicClassEntry]);
}

#[derive(Debug, Clone)]
pub struct CalendarPoller {
    store: RecordStore,
    interval: Duration,
}

impl CalendarPoller {
    pub fn new(store: RecordStore, interval: Duration) -> Self {
        Self { store, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// `lastUpdate` 是否落在 `now` 之前的一个周期内
    pub fn is_recent(&self, now: i64) -> StorageResult<bool> {
        let window = i64::try_from(self.interval.as_millis()).unwrap_or(i64::MAX);
        Ok(match self.store.last_update()? {
            Some(last) => now.saturating_sub(last) < window,
            None => false,
        })
    }

    /// 一次轮询：有近期变更时刷新视图，返回是否刷新
    pub fn poll_once(&self, view: &dyn CalendarView, now: i64) -> StorageResult<bool> {
        if !self.is_recent(now)? {
            return Ok(false);
        }
        refresh_from_store(&self.store, view)?;
        Ok(true)
    }
}

/// 读取公开课程并刷新视图
pub fn refresh_from_store(store: &RecordStore, view: &dyn CalendarView) -> StorageResult<()> {
    let classes = load_public_classes(store)?;
    view.refresh(&classes);
    Ok(())
}

/// 挂载日历视图：立即刷新一次，然后注册监听任务和轮询任务
///
/// 两个任务都随 `tasks` 的关闭令牌停止。
pub fn mount_calendar(
    tasks: &mut BackgroundTasks,
    store: RecordStore,
    view: Arc<dyn CalendarView>,
    poll_interval: Duration,
) -> StorageResult<()> {
    refresh_from_store(&store, view.as_ref())?;

    let shutdown = tasks.shutdown_token();

    // Listener
    {
        let store = store.clone();
        let view = Arc::clone(&view);
        let shutdown = shutdown.clone();
        let mut listener = store.bus().listener(store.view());
        tasks.spawn("calendar_listener", TaskKind::Listener, async move {
            loop {
                let notice = tokio::select! {
                    _ = shutdown.cancelled() => break,
                    notice = listener.recv() => notice,
                };
                let Some(notice) = notice else { break };

                let affects = notice
                    .key()
                    .parse::<CollectionKey>()
                    .map(|k| k.affects_calendar())
                    .unwrap_or(false);
                if !affects {
                    continue;
                }

                tracing::debug!(
                    key = %notice.key(),
                    event_type = %notice.event_type(),
                    "Calendar refresh on change notice"
                );
                if let Err(e) = refresh_from_store(&store, view.as_ref()) {
                    tracing::error!(error = %e, "Calendar refresh failed");
                }
            }
        });
    }

    // Poller
    {
        let poller = CalendarPoller::new(store, poll_interval);
        tasks.spawn("calendar_poller", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(poller.interval());
            // First tick completes immediately; mount already refreshed
            ticker.tick().await;
            loop {
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = ticker.tick() => {
                        match poller.poll_once(view.as_ref(), now_millis()) {
                            Ok(true) => tracing::debug!("Calendar refreshed by poll"),
                            Ok(false) => {}
                            Err(e) => tracing::error!(error = %e, "Calendar poll failed"),
                        }
                    }
                }
            }
        });
    }

    Ok(())
}
