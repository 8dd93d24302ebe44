//! 课程管理
//!
//! - [`derivation`] - 管理端记录 → 公开日历 (纯函数)
//! - [`seed`] - 默认课程表
//! - [`service`] - 增删改查 + 保存时重新派生并宣告

pub mod derivation;
pub mod seed;
pub mod service;

pub use derivation::derive_customer_view;
pub use seed::default_admin_classes;
pub use service::{ClassService, load_admin_classes, load_public_classes};
