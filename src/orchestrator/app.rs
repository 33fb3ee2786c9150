//! 应用生命周期
//!
//! 连接浏览器、组装控制器，然后在控制台读取命令，定时输出状态。

use std::sync::Arc;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::browser;
use crate::config::Config;
use crate::control::{ConsoleNotifier, ControlCommand, Notifier, StatusReport};
use crate::infrastructure::{Clock, JsExecutor, PageContent, TokioClock};
use crate::orchestrator::controller::Controller;
use crate::orchestrator::controller_slot::{ControllerFactory, ControllerSlot};
use crate::services::SignatureTable;
use crate::store::{FilePersistence, ProgressStore};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    // 连接断开前必须保持存活
    _browser: Browser,
    notifier: Arc<ConsoleNotifier>,
    slot: ControllerSlot,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)
            .with_context(|| format!("无法创建运行日志 {}", config.output_log_file))?;
        logging::log_startup(&config);

        let (browser, page) = browser::connect_to_browser_and_page(
            config.browser_debug_port,
            &config.target_url,
            Some(&config.target_title),
        )
        .await
        .context("连接浏览器失败，请确认浏览器已用 --remote-debugging-port 启动")?;

        let page: Arc<dyn PageContent> = Arc::new(JsExecutor::new(page));
        let notifier = Arc::new(ConsoleNotifier::with_log_file(
            config.output_log_file.clone(),
        ));
        let slot = ControllerSlot::new(controller_factory(&config, page, notifier.clone()))
            .with_context(|| format!("无法读取进度缓存 {}", config.progress_file))?;

        Ok(Self {
            config,
            _browser: browser,
            notifier,
            slot,
        })
    }

    /// 命令循环，直到 quit、Ctrl+C 或输入结束
    pub async fn run(mut self) -> Result<()> {
        logging::log_usage();

        let mut commands = spawn_stdin_reader();
        let mut ticker = tokio::time::interval(self.config.timings.status_interval());
        let mut last_report: Option<StatusReport> = None;

        if self.config.auto_start {
            info!("⚡ 自动启动");
            self.slot.start().await?;
        }

        loop {
            tokio::select! {
                line = commands.recv() => {
                    let Some(line) = line else {
                        debug!("输入已结束");
                        if self.slot.is_running() {
                            info!("⏳ 输入已结束，等待本次运行完成...");
                            self.slot.join().await;
                        }
                        break;
                    };
                    if line.trim().is_empty() {
                        continue;
                    }
                    match line.parse::<ControlCommand>() {
                        Ok(ControlCommand::Quit) => break,
                        Ok(command) => {
                            if let Err(e) = self.execute(command).await {
                                error!("❌ 执行命令失败: {}", e);
                            }
                        }
                        Err(message) => warn!("{}", message),
                    }
                }
                _ = ticker.tick() => {
                    // 状态变化或运行中时输出
                    if let Some(report) = self.slot.status() {
                        if self.slot.is_running() || last_report.as_ref() != Some(&report) {
                            self.notifier.status(&report);
                        }
                        last_report = Some(report);
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("收到 Ctrl+C");
                    break;
                }
            }
        }

        self.shutdown().await;
        Ok(())
    }

    async fn execute(&mut self, command: ControlCommand) -> Result<()> {
        match command {
            ControlCommand::Start => self.slot.start().await?,
            ControlCommand::Stop => self.slot.stop(),
            ControlCommand::ClearCache => {
                if !self.slot.clear_cache().await? {
                    warn!("⚠️ 缓存未清空");
                }
            }
            ControlCommand::Reset => self.slot.replace().await?,
            ControlCommand::Status => match self.slot.status() {
                Some(report) => self.notifier.status(&report),
                None => warn!("⚠️ 控制器不可用"),
            },
            ControlCommand::Quit => {}
        }
        Ok(())
    }

    async fn shutdown(&mut self) {
        if self.slot.is_running() {
            info!("⏳ 等待当前课程结束...");
        }
        self.slot.stop();
        self.slot.join().await;
        info!("👋 已退出");
    }
}

/// 每次调用都重新读取进度文件，构造一个新控制器
fn controller_factory(
    config: &Config,
    page: Arc<dyn PageContent>,
    notifier: Arc<ConsoleNotifier>,
) -> ControllerFactory {
    let progress_file = config.progress_file.clone();
    let signatures = SignatureTable::builtin().extend(config.signatures.clone());
    let timings = config.timings.clone();
    let clock: Arc<dyn Clock> = Arc::new(TokioClock::new());

    Box::new(move || {
        let store = ProgressStore::open(FilePersistence::new(progress_file.clone()))?;
        Ok(Controller::new(
            page.clone(),
            clock.clone(),
            notifier.clone(),
            store,
            signatures.clone(),
            timings.clone(),
        ))
    })
}

/// 在后台按行读取标准输入
fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (tx, rx) = mpsc::channel(16);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(line).await.is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    error!("读取命令失败: {}", e);
                    break;
                }
            }
        }
    });
    rx
}
