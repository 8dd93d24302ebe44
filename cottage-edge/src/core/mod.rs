//! 核心模块
//!
//! - [`Config`] - 节点配置
//! - [`ServerState`] - 服务单例集合
//! - [`BackgroundTasks`] - 后台任务管理

pub mod config;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
