//! Cottage Edge - 烹饪课程预订本地节点
//!
//! # 架构概述
//!
//! - **存储** (`store`): redb 嵌入式存储，每个键保存一个完整 JSON 集合
//! - **派生** (`classes`): 管理端课程表 → 公开日历
//! - **预订** (`bookings`): 座位检查与扣减、预订记录
//! - **传播** (`sync`): 同视图信号、跨视图存储事件、日历轮询
//! - **会员/留言/通知** (`members`, `chat`, `notifications`)
//!
//! # 模块结构
//!
//! ```text
//! cottage-edge/src/
//! ├── core/           # 配置、状态、后台任务
//! ├── store/          # redb 存储层
//! ├── sync/           # 变更总线、监听器、宣告、轮询
//! ├── classes/        # 课程管理与日历派生
//! ├── bookings/       # 预订事务、记录、统计
//! ├── members/        # 会员账户
//! ├── chat/           # 客户留言
//! ├── notifications/  # 管理端通知
//! └── utils/          # 错误、日志、时间、校验
//! ```

pub mod bookings;
pub mod chat;
pub mod classes;
pub mod core;
pub mod members;
pub mod notifications;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use bookings::{BookingError, BookingService, MonthlyStats};
pub use classes::{ClassService, derive_customer_view};
pub use crate::core::{BackgroundTasks, Config, ServerState, TaskKind};
pub use store::{CollectionKey, RecordStore, StorageError};
pub use sync::{Broadcaster, CalendarPoller, CalendarView, ChangeBus, ViewListener, mount_calendar};
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

/// 设置运行环境
///
/// 1. 加载 `.env` (不存在时忽略)
/// 2. 按 LOG_LEVEL / LOG_DIR 初始化日志
pub fn setup_environment() -> AppResult<()> {
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        return Err(AppError::with_message(
            ErrorCode::ConfigError,
            format!("Failed to load .env: {e}"),
        ));
    }

    let level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(level.as_deref(), log_dir.as_deref());
    Ok(())
}
