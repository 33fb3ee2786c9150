/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use std::fs;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化 tracing
///
/// `RUST_LOG` 优先；否则普通模式为 info，详细模式为 debug
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("legend_runner={},warn", default_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化运行日志文件
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n运行日志 - {}\n{}\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 传奇课程自动处理");
    info!("🌐 浏览器调试端口: {}", config.browser_debug_port);
    info!("📁 进度缓存: {}", config.progress_file);
    info!("{}", "=".repeat(60));
}

/// 输出可用命令
pub fn log_usage() {
    info!("💡 可用命令: start / stop / clear / reset / status / quit");
}
