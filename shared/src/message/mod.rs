//! 变更通知消息类型定义
//!
//! 同一存储上打开的每个视图 (public calendar, admin panel, ...) 都通过这些
//! 类型得知数据变化。两条通道显式分开：
//!
//! | 通道 | 类型 | 谁会收到 |
//! |------|------|----------|
//! | same-view | [`ChangeSignal`] | 只有发起写入的视图 |
//! | cross-view | [`StorageEvent`] | 真实写入: 其他视图; 合成重放: 发起视图 |

use serde::{Deserialize, Serialize};
use std::fmt;

use uuid::Uuid;

pub mod payload;
pub use payload::*;

/// 视图标识 (一个打开的页面/标签页)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(Uuid);

impl ViewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ViewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 短格式便于日志阅读
        let s = self.0.simple().to_string();
        write!(f, "view-{}", &s[..8])
    }
}

/// 通知事件类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// 同视图信号 (classesUpdated)
    Signal = 0,
    /// 存储变更 (真实写入)
    Storage = 1,
    /// 存储变更 (合成重放)
    SyntheticStorage = 2,
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventType::Signal => write!(f, "signal"),
            EventType::Storage => write!(f, "storage"),
            EventType::SyntheticStorage => write!(f, "synthetic_storage"),
        }
    }
}

/// 视图收到的一条变更通知
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "channel", content = "event", rename_all = "snake_case")]
pub enum ChangeNotice {
    Signal(ChangeSignal),
    Storage(StorageEvent),
}

impl ChangeNotice {
    pub fn event_type(&self) -> EventType {
        match self {
            ChangeNotice::Signal(_) => EventType::Signal,
            ChangeNotice::Storage(e) if e.synthetic => EventType::SyntheticStorage,
            ChangeNotice::Storage(_) => EventType::Storage,
        }
    }

    /// 变更的存储键
    pub fn key(&self) -> &str {
        match self {
            ChangeNotice::Signal(s) => &s.key,
            ChangeNotice::Storage(e) => &e.key,
        }
    }

    pub fn origin(&self) -> ViewId {
        match self {
            ChangeNotice::Signal(s) => s.origin,
            ChangeNotice::Storage(e) => e.origin,
        }
    }
}
