use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{AppResult, ConfigError};
use crate::models::MarkerKind;

/// 默认配置文件名
pub const DEFAULT_CONFIG_FILE: &str = "legend_runner.toml";

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标URL（找不到已打开的页面时导航到这里）
    pub target_url: String,
    /// 用于识别已打开页面的标题关键字
    pub target_title: String,
    /// 进度缓存文件
    pub progress_file: String,
    /// 运行日志文件
    pub output_log_file: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 连接后是否立即开始
    pub auto_start: bool,
    /// 额外的图标签名（文件名 -> 类型）
    pub signatures: HashMap<String, MarkerKind>,
    /// 各种等待时间
    pub timings: Timings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://www.duolingo.com/learn".to_string(),
            target_title: "Duolingo".to_string(),
            progress_file: "legend_progress.json".to_string(),
            output_log_file: "legend_runner.log".to_string(),
            verbose_logging: false,
            auto_start: false,
            signatures: HashMap::new(),
            timings: Timings::default(),
        }
    }
}

/// 等待时间和轮询上限，单位毫秒
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// 内容加载轮询间隔
    pub content_poll_ms: u64,
    /// 内容加载轮询次数
    pub content_poll_attempts: u32,
    /// 每一步点击后的等待
    pub step_delay_ms: u64,
    /// 滚动到按钮后的等待
    pub scroll_settle_ms: u64,
    /// 等待按钮出现的上限
    pub control_wait_ms: u64,
    /// 等待按钮时的轮询间隔
    pub control_poll_ms: u64,
    /// 一键完成后的等待
    pub solve_settle_ms: u64,
    /// 等待结束页的上限（秒）
    pub confirmation_timeout_secs: u64,
    /// 等待结束页的轮询间隔
    pub confirmation_poll_ms: u64,
    /// 点击继续后额外等待
    pub confirmation_return_ms: u64,
    /// 两个课程之间的间隔
    pub between_items_ms: u64,
    /// 查找下一单元时每次滚动后的等待
    pub scan_settle_ms: u64,
    /// 每次滚动的视口比例
    pub scan_fraction: f64,
    /// 查找下一单元的滚动次数
    pub scan_attempts: u32,
    /// 主循环每轮之间的间隔
    pub loop_pause_ms: u64,
    /// 主循环出错后的退避
    pub loop_error_backoff_ms: u64,
    /// 运行中状态输出间隔
    pub status_interval_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            content_poll_ms: 300,
            content_poll_attempts: 10,
            step_delay_ms: 1000,
            scroll_settle_ms: 1000,
            control_wait_ms: 3000,
            control_poll_ms: 300,
            solve_settle_ms: 3000,
            confirmation_timeout_secs: 5 * 60,
            confirmation_poll_ms: 1000,
            confirmation_return_ms: 500,
            between_items_ms: 800,
            scan_settle_ms: 1200,
            scan_fraction: 0.33,
            scan_attempts: 10,
            loop_pause_ms: 1000,
            loop_error_backoff_ms: 3000,
            status_interval_ms: 2000,
        }
    }
}

impl Timings {
    pub fn content_poll(&self) -> Duration {
        Duration::from_millis(self.content_poll_ms)
    }

    pub fn step_delay(&self) -> Duration {
        Duration::from_millis(self.step_delay_ms)
    }

    pub fn scroll_settle(&self) -> Duration {
        Duration::from_millis(self.scroll_settle_ms)
    }

    pub fn control_wait(&self) -> Duration {
        Duration::from_millis(self.control_wait_ms)
    }

    pub fn control_poll(&self) -> Duration {
        Duration::from_millis(self.control_poll_ms)
    }

    pub fn solve_settle(&self) -> Duration {
        Duration::from_millis(self.solve_settle_ms)
    }

    pub fn confirmation_timeout(&self) -> Duration {
        Duration::from_secs(self.confirmation_timeout_secs)
    }

    pub fn confirmation_poll(&self) -> Duration {
        Duration::from_millis(self.confirmation_poll_ms)
    }

    pub fn confirmation_return(&self) -> Duration {
        Duration::from_millis(self.confirmation_return_ms)
    }

    pub fn between_items(&self) -> Duration {
        Duration::from_millis(self.between_items_ms)
    }

    pub fn scan_settle(&self) -> Duration {
        Duration::from_millis(self.scan_settle_ms)
    }

    pub fn loop_pause(&self) -> Duration {
        Duration::from_millis(self.loop_pause_ms)
    }

    pub fn loop_error_backoff(&self) -> Duration {
        Duration::from_millis(self.loop_error_backoff_ms)
    }

    pub fn status_interval(&self) -> Duration {
        Duration::from_millis(self.status_interval_ms)
    }
}

impl Config {
    /// 读取配置：默认值 → TOML 文件 → 环境变量
    pub fn load() -> AppResult<Self> {
        let path = std::env::var("LEGEND_RUNNER_CONFIG")
            .unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let base = if Path::new(&path).exists() {
            info!("📄 读取配置文件: {}", path);
            Self::from_toml_file(&path)?
        } else {
            debug!("配置文件 {} 不存在，使用默认配置", path);
            Self::default()
        };

        base.with_env()
    }

    /// 从 TOML 文件读取，缺省字段使用默认值
    pub fn from_toml_file(path: &str) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::FileReadFailed {
            path: path.to_string(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|e| match e {
            crate::error::AppError::Config(ConfigError::TomlParseFailed { source, .. }) => {
                ConfigError::TomlParseFailed {
                    path: path.to_string(),
                    source,
                }
                .into()
            }
            other => other,
        })
    }

    pub fn from_toml_str(content: &str) -> AppResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 用环境变量覆盖已有配置
    pub fn with_env(self) -> AppResult<Self> {
        Ok(Self {
            browser_debug_port: env_parse("BROWSER_DEBUG_PORT", "u16")?
                .unwrap_or(self.browser_debug_port),
            target_url: std::env::var("TARGET_URL").unwrap_or(self.target_url),
            target_title: std::env::var("TARGET_TITLE").unwrap_or(self.target_title),
            progress_file: std::env::var("PROGRESS_FILE").unwrap_or(self.progress_file),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
            auto_start: env_parse("AUTO_START", "bool")?.unwrap_or(self.auto_start),
            signatures: self.signatures,
            timings: self.timings,
        })
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}
