//! 变更宣告
//!
//! 一次宣告走三条路径：
//! 1. 写入 `lastUpdate` (供轮询器判断)
//! 2. 立即发出同视图 [`ChangeSignal`]
//! 3. 延迟后重放一次合成 [`StorageEvent`]，只投递给发起视图
//!
//! 没有 tokio 运行时 (同步测试、命令行工具) 时，合成事件立即发出。

use std::time::Duration;

use shared::message::{ChangeSignal, StorageEvent};
use shared::util::now_millis;

use crate::store::{CollectionKey, RecordStore, StorageResult};

/// 默认重放延迟
pub const DEFAULT_REPLAY_DELAY: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub struct Broadcaster {
    store: RecordStore,
    replay_delay: Duration,
}

impl Broadcaster {
    pub fn new(store: RecordStore) -> Self {
        Self::with_replay_delay(store, DEFAULT_REPLAY_DELAY)
    }

    pub fn with_replay_delay(store: RecordStore, replay_delay: Duration) -> Self {
        Self { store, replay_delay }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// 宣告某个键已变更
    ///
    /// 返回已发出的信号，便于调用方记录版本号。
    pub fn announce_change(&self, key: CollectionKey) -> StorageResult<ChangeSignal> {
        let now = now_millis();
        self.store.set_last_update(now)?;

        let bus = self.store.bus();
        let version = bus.next_version(key.as_str());
        let signal = ChangeSignal::new(self.store.view(), key.as_str(), version, now);
        bus.emit_signal(signal.clone());

        let current = self.store.get_raw(key)?;
        let replay = StorageEvent::synthetic(self.store.view(), key.as_str(), current);

        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let bus = bus.clone();
                let delay = self.replay_delay;
                handle.spawn(async move {
                    tokio::select! {
                        _ = bus.shutdown_token().cancelled() => {}
                        _ = tokio::time::sleep(delay) => bus.publish_storage(replay),
                    }
                });
            }
            Err(_) => bus.publish_storage(replay),
        }

        tracing::debug!(
            key = %key,
            version = version,
            view = %self.store.view(),
            "Change announced"
        );
        Ok(signal)
    }
}
