use std::sync::Arc;

use anyhow::Context;
use cottage_edge::{BackgroundTasks, CalendarView, Config, ServerState, mount_calendar, setup_environment};
use shared::models::PublicClassEntry;

/// 无界面运行时的日历：把每次刷新写进日志
struct LoggingCalendar;

impl CalendarView for LoggingCalendar {
    fn refresh(&self, classes: &[PublicClassEntry]) {
        let open: u32 = classes.iter().map(|c| c.seats).sum();
        tracing::info!(classes = classes.len(), open_seats = open, "Calendar refreshed");
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (dotenv, 日志)
    setup_environment()?;

    tracing::info!("Cottage edge node starting...");

    // 2. 加载配置
    let config = Config::from_env();
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "Configuration loaded"
    );

    // 3. 初始化状态 (打开存储, 写入种子数据)
    let state = ServerState::initialize(&config).context("failed to initialize node state")?;

    // 4. 挂载日历视图
    let calendar = state.open_view();
    let mut tasks = BackgroundTasks::with_token(state.bus().shutdown_token().child_token());
    mount_calendar(
        &mut tasks,
        calendar.store.clone(),
        Arc::new(LoggingCalendar),
        config.poll_interval(),
    )
    .context("failed to mount calendar")?;
    tasks.log_summary();

    // 5. 等待退出信号
    tokio::signal::ctrl_c().await.context("failed to listen for ctrl-c")?;
    tracing::info!("Shutdown signal received");

    state.shutdown();
    tasks.shutdown().await;
    Ok(())
}
