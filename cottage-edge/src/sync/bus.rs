//! 变更总线
//!
//! 两条 broadcast 通道显式分开：
//!
//! ```text
//! emit_signal() ──────▶ signal_tx ──┐
//!                                   ├──▶ ViewListener (按视图过滤)
//! publish_storage() ──▶ storage_tx ─┘
//! ```

use std::sync::Arc;

use dashmap::DashMap;
use shared::message::{ChangeSignal, StorageEvent, ViewId};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use super::ViewListener;

/// 默认通道容量
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// 每个存储键的本地宣告版本号
#[derive(Debug, Default)]
pub struct KeyVersions {
    versions: DashMap<String, u64>,
}

impl KeyVersions {
    pub fn new() -> Self {
        Self::default()
    }

    /// 递增并返回新版本号 (首次返回 1)
    pub fn increment(&self, key: &str) -> u64 {
        let mut entry = self.versions.entry(key.to_string()).or_insert(0);
        *entry += 1;
        *entry
    }

    /// 当前版本号，未宣告过返回 0
    pub fn get(&self, key: &str) -> u64 {
        self.versions.get(key).map(|v| *v).unwrap_or(0)
    }
}

/// 变更总线 - 所有视图共享
///
/// Clone 是浅拷贝，所有克隆共享同一组通道。
#[derive(Debug, Clone)]
pub struct ChangeBus {
    /// 同视图信号通道
    signal_tx: broadcast::Sender<ChangeSignal>,
    /// 跨视图存储事件通道
    storage_tx: broadcast::Sender<StorageEvent>,
    versions: Arc<KeyVersions>,
    /// 关闭信号令牌
    shutdown_token: CancellationToken,
}

impl ChangeBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    /// 创建指定容量的总线
    pub fn with_capacity(capacity: usize) -> Self {
        let (signal_tx, _) = broadcast::channel(capacity.max(1));
        let (storage_tx, _) = broadcast::channel(capacity.max(1));
        Self {
            signal_tx,
            storage_tx,
            versions: Arc::new(KeyVersions::new()),
            shutdown_token: CancellationToken::new(),
        }
    }

    /// 发出同视图信号
    ///
    /// 没有订阅者不是错误 (没有挂载任何视图)。
    pub fn emit_signal(&self, signal: ChangeSignal) {
        if let Err(e) = self.signal_tx.send(signal) {
            tracing::trace!(key = %e.0.key, "No listeners for change signal");
        }
    }

    /// 发布存储事件
    pub fn publish_storage(&self, event: StorageEvent) {
        if let Err(e) = self.storage_tx.send(event) {
            tracing::trace!(key = %e.0.key, "No listeners for storage event");
        }
    }

    pub fn subscribe_signals(&self) -> broadcast::Receiver<ChangeSignal> {
        self.signal_tx.subscribe()
    }

    pub fn subscribe_storage(&self) -> broadcast::Receiver<StorageEvent> {
        self.storage_tx.subscribe()
    }

    /// 为指定视图创建监听器 (只接收该视图应看到的通知)
    pub fn listener(&self, view: ViewId) -> ViewListener {
        ViewListener::new(
            view,
            self.subscribe_signals(),
            self.subscribe_storage(),
            self.shutdown_token.clone(),
        )
    }

    /// 递增某个键的宣告版本号
    pub fn next_version(&self, key: &str) -> u64 {
        self.versions.increment(key)
    }

    pub fn versions(&self) -> &KeyVersions {
        &self.versions
    }

    /// 获取关闭令牌
    pub fn shutdown_token(&self) -> &CancellationToken {
        &self.shutdown_token
    }

    /// 关闭总线，所有监听器的 recv() 返回 None
    pub fn shutdown(&self) {
        tracing::info!("Shutting down change bus");
        self.shutdown_token.cancel();
    }
}

impl Default for ChangeBus {
    fn default() -> Self {
        Self::new()
    }
}
