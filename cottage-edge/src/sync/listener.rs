//! 视图监听器
//!
//! 每个挂载的视图持有一个 [`ViewListener`]，只接收投递给自己的通知：
//!
//! | 通知 | 条件 |
//! |------|------|
//! | `ChangeSignal` | `origin == view` |
//! | `StorageEvent` (genuine) | `origin != view` |
//! | `StorageEvent` (synthetic) | `origin == view` |

use shared::message::{ChangeNotice, ChangeSignal, StorageEvent, ViewId};
use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tokio_util::sync::CancellationToken;

pub struct ViewListener {
    view: ViewId,
    signal_rx: broadcast::Receiver<ChangeSignal>,
    storage_rx: broadcast::Receiver<StorageEvent>,
    shutdown: CancellationToken,
    signals_closed: bool,
    storage_closed: bool,
}

impl ViewListener {
    pub(crate) fn new(
        view: ViewId,
        signal_rx: broadcast::Receiver<ChangeSignal>,
        storage_rx: broadcast::Receiver<StorageEvent>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            view,
            signal_rx,
            storage_rx,
            shutdown,
            signals_closed: false,
            storage_closed: false,
        }
    }

    pub fn view(&self) -> ViewId {
        self.view
    }

    fn accepts_signal(&self, signal: &ChangeSignal) -> bool {
        signal.origin == self.view
    }

    /// 等待下一条属于该视图的通知
    ///
    /// 总线关闭或所有发送端都已释放时返回 `None`。
    pub async fn recv(&mut self) -> Option<ChangeNotice> {
        loop {
            if self.signals_closed && self.storage_closed {
                return None;
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => return None,
                result = self.signal_rx.recv(), if !self.signals_closed => match result {
                    Ok(signal) if self.accepts_signal(&signal) => {
                        return Some(ChangeNotice::Signal(signal));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(view = %self.view, skipped = n, "Signal listener lagged");
                    }
                    Err(RecvError::Closed) => self.signals_closed = true,
                },
                result = self.storage_rx.recv(), if !self.storage_closed => match result {
                    Ok(event) if event.is_visible_to(self.view) => {
                        return Some(ChangeNotice::Storage(event));
                    }
                    Ok(_) => continue,
                    Err(RecvError::Lagged(n)) => {
                        tracing::warn!(view = %self.view, skipped = n, "Storage listener lagged");
                    }
                    Err(RecvError::Closed) => self.storage_closed = true,
                },
            }
        }
    }

    /// 非阻塞读取：没有待处理通知时返回 `None`
    ///
    /// 信号优先于存储事件。
    pub fn try_recv(&mut self) -> Option<ChangeNotice> {
        loop {
            match self.signal_rx.try_recv() {
                Ok(signal) if self.accepts_signal(&signal) => {
                    return Some(ChangeNotice::Signal(signal));
                }
                Ok(_) => continue,
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(view = %self.view, skipped = n, "Signal listener lagged");
                    continue;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }

        loop {
            match self.storage_rx.try_recv() {
                Ok(event) if event.is_visible_to(self.view) => {
                    return Some(ChangeNotice::Storage(event));
                }
                Ok(_) => continue,
                Err(TryRecvError::Lagged(n)) => {
                    tracing::warn!(view = %self.view, skipped = n, "Storage listener lagged");
                    continue;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => return None,
            }
        }
    }
}
