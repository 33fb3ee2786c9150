//! 通知
//!
//! 严重卡死时立即报警，运行结束时输出汇总

use std::fs::OpenOptions;
use std::io::Write;

use tracing::{error, info, warn};

use crate::control::status::StatusReport;

pub trait Notifier: Send + Sync {
    /// 状态变化
    fn status(&self, report: &StatusReport);

    /// 致命错误，与结束汇总分开
    fn fatal(&self, message: &str);

    /// 运行结束（正常完成或被停止）
    fn summary(&self, completed: u32, failed: u32, skipped: u32);
}

/// 输出到日志，并把通知追加到运行日志文件
pub struct ConsoleNotifier {
    log_file_path: String,
}

impl ConsoleNotifier {
    pub fn with_log_file(path: impl Into<String>) -> Self {
        Self {
            log_file_path: path.into(),
        }
    }

    fn append(&self, line: &str) {
        let path = &self.log_file_path;
        let written = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .and_then(|mut file| {
                writeln!(
                    file,
                    "[{}] {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    line
                )
            });
        if let Err(e) = written {
            warn!("写入运行日志失败 ({}): {}", path, e);
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn status(&self, report: &StatusReport) {
        info!("📊 {}", report);
    }

    fn fatal(&self, message: &str) {
        error!("{}", "!".repeat(60));
        error!("❌ 脚本已停止: {}", message);
        error!("{}", "!".repeat(60));
        self.append(&format!("致命错误: {}", message));
    }

    fn summary(&self, completed: u32, failed: u32, skipped: u32) {
        info!("\n{}", "=".repeat(60));
        info!("🎉 运行结束");
        info!("✅ 完成: {}", completed);
        info!("❌ 失败: {}", failed);
        info!("⏭ 跳过: {}", skipped);
        info!("{}", "=".repeat(60));
        self.append(&format!(
            "运行结束: 完成 {}, 失败 {}, 跳过 {}",
            completed, failed, skipped
        ));
    }
}
