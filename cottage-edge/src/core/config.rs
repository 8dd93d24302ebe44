use std::path::PathBuf;
use std::time::Duration;

/// 节点配置
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | ./data | 工作目录 |
/// | STORE_FILE | cottage.redb | 存储文件名 (相对 WORK_DIR) |
/// | ENVIRONMENT | development | 运行环境 |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志目录，存在时按天滚动写文件 |
/// | SYNC_REPLAY_DELAY_MS | 50 | 合成存储事件重放延迟 |
/// | SYNC_POLL_INTERVAL_MS | 30000 | 日历轮询周期 |
/// | NOTIFICATION_CAP | 50 | 管理端通知保留条数 |
/// | CHANNEL_CAPACITY | 256 | 变更总线通道容量 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/srv/cottage LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存放存储文件
    pub work_dir: String,
    pub store_file: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub sync_replay_delay_ms: u64,
    pub sync_poll_interval_ms: u64,
    pub notification_cap: usize,
    pub channel_capacity: usize,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 未设置或无法解析的变量使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            store_file: std::env::var("STORE_FILE").unwrap_or_else(|_| "cottage.redb".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.trim().is_empty()),
            sync_replay_delay_ms: env_parse("SYNC_REPLAY_DELAY_MS", 50),
            sync_poll_interval_ms: env_parse("SYNC_POLL_INTERVAL_MS", 30_000),
            notification_cap: env_parse("NOTIFICATION_CAP", 50),
            channel_capacity: env_parse("CHANNEL_CAPACITY", 256),
        }
    }

    /// 使用自定义工作目录
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config
    }

    /// 存储文件完整路径
    pub fn store_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join(&self.store_file)
    }

    pub fn replay_delay(&self) -> Duration {
        Duration::from_millis(self.sync_replay_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.sync_poll_interval_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
