//! 变更传播
//!
//! # 架构
//!
//! ```text
//! RecordStore::set_raw ──▶ StorageEvent (genuine) ──▶ 其他视图
//!
//! Broadcaster::announce_change
//!     ├─▶ lastUpdate = now
//!     ├─▶ ChangeSignal ──────────────────────────────▶ 发起视图
//!     └─▶ (delay) StorageEvent (synthetic) ──────────▶ 发起视图
//!
//! CalendarPoller (interval) ──▶ lastUpdate 足够新? ──▶ refresh
//! ```
//!
//! 三条路径互为冗余：视图可能收到同一次变更的多次通知，
//! 刷新操作必须是幂等的 (重新读取 + 重新渲染)。

pub mod broadcaster;
pub mod bus;
pub mod listener;
pub mod poller;

pub use broadcaster::Broadcaster;
pub use bus::{ChangeBus, KeyVersions};
pub use listener::ViewListener;
pub use poller::{CalendarPoller, CalendarView, mount_calendar, refresh_from_store};
