//! Record store
//!
//! - [`keys`] - 存储键定义
//! - [`storage`] - redb 持久化 (整键替换, 自愈读取)

pub mod keys;
pub mod storage;

pub use keys::CollectionKey;
pub use storage::{RecordStore, StorageError, StorageResult};
