use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ViewId;

/// 同视图信号载荷
///
/// 写入方在自己的视图内立即发出，通知挂载的组件重新读取。
///
/// # 示例
/// - `key`: "cottageClasses"
/// - `version`: 42
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSignal {
    pub request_id: Uuid,
    /// 发出信号的视图
    pub origin: ViewId,
    /// 变更的存储键
    pub key: String,
    /// 该键的本地版本号 (每次宣告递增)
    pub version: u64,
    /// 宣告时间 (Unix millis)
    pub timestamp: i64,
}

impl ChangeSignal {
    pub fn new(origin: ViewId, key: impl Into<String>, version: u64, timestamp: i64) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            origin,
            key: key.into(),
            version,
            timestamp,
        }
    }
}

/// 存储变更载荷
///
/// 真实写入时由存储层发出 (`synthetic = false`)，只投递给其他视图；
/// 合成重放由广播器延迟发出 (`synthetic = true`)，只投递给发起视图。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageEvent {
    pub request_id: Uuid,
    pub origin: ViewId,
    pub key: String,
    /// 写入前的原始 JSON (合成重放时为 None)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_value: Option<String>,
    /// 写入后的原始 JSON
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<String>,
    pub synthetic: bool,
}

impl StorageEvent {
    /// 真实写入产生的事件
    pub fn genuine(
        origin: ViewId,
        key: impl Into<String>,
        old_value: Option<String>,
        new_value: Option<String>,
    ) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            origin,
            key: key.into(),
            old_value,
            new_value,
            synthetic: false,
        }
    }

    /// 手动构造的重放事件
    pub fn synthetic(origin: ViewId, key: impl Into<String>, new_value: Option<String>) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            origin,
            key: key.into(),
            old_value: None,
            new_value,
            synthetic: true,
        }
    }

    /// 该事件是否应投递给 `view`
    ///
    /// 真实写入不会在写入方触发，合成重放只在写入方触发。
    pub fn is_visible_to(&self, view: ViewId) -> bool {
        if self.synthetic {
            self.origin == view
        } else {
            self.origin != view
        }
    }
}
