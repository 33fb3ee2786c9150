//! 主控制器 - 编排层
//!
//! ## 职责
//!
//! 1. **运行状态**：running 标志、计数器、当前单元
//! 2. **主循环**：起始单元 → 处理 → 查找下一单元 → 处理 ...
//! 3. **协作式停止**：只在课程之间和循环边界检查 running，不打断正在进行的课程
//! 4. **致命错误**：严重卡死时立即停止并报警
//!
//! 单元内的处理见 `section_processor`。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Timings;
use crate::control::{Notifier, RunState, StatusReport};
use crate::error::AppResult;
use crate::infrastructure::{Clock, PageContent};
use crate::services::{Discovery, SectionScanner, SignatureTable};
use crate::store::ProgressStore;
use crate::workflow::ItemFlow;

/// 可跨任务传递的停止句柄
#[derive(Clone, Default)]
pub struct StopHandle {
    running: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    fn set_running(&self) {
        self.running.store(true, Ordering::SeqCst);
    }
}

/// 计数器
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub completed: u32,
    pub failed: u32,
    pub skipped: u32,
}

/// 主控制器，每次运行只有一个实例
pub struct Controller {
    pub(crate) running: StopHandle,
    pub(crate) counters: RunCounters,
    pub(crate) processing_section: Option<u32>,
    pub(crate) store: ProgressStore,
    pub(crate) discovery: Discovery,
    pub(crate) scanner: SectionScanner,
    pub(crate) flow: ItemFlow,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) timings: Timings,
    status_tx: watch::Sender<StatusReport>,
}

impl Controller {
    pub fn new(
        page: Arc<dyn PageContent>,
        clock: Arc<dyn Clock>,
        notifier: Arc<dyn Notifier>,
        store: ProgressStore,
        signatures: SignatureTable,
        timings: Timings,
    ) -> Self {
        let (status_tx, _) = watch::channel(StatusReport::default());
        let controller = Self {
            running: StopHandle::default(),
            counters: RunCounters::default(),
            processing_section: None,
            store,
            discovery: Discovery::new(page.clone(), signatures),
            scanner: SectionScanner::new(page.clone(), clock.clone(), &timings),
            flow: ItemFlow::new(page, clock.clone(), timings.clone()),
            clock,
            notifier,
            timings,
            status_tx,
        };
        controller.publish_status();
        controller
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.running.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<StatusReport> {
        self.status_tx.subscribe()
    }

    pub fn is_running(&self) -> bool {
        self.running.is_running()
    }

    pub fn counters(&self) -> RunCounters {
        self.counters
    }

    pub fn store(&self) -> &ProgressStore {
        &self.store
    }

    /// 启动并一直运行到结束；已在运行时什么也不做
    pub async fn start(&mut self) {
        if self.begin() {
            self.run().await;
        }
    }

    /// 标记为运行中；已在运行时返回 false
    pub fn begin(&mut self) -> bool {
        if self.is_running() {
            info!("已经在运行中");
            return false;
        }

        info!("🚀 开始运行...");
        self.running.set_running();
        self.publish_status();
        true
    }

    /// 执行主循环，需要先调用 `begin`
    pub async fn run(&mut self) {
        if !self.is_running() {
            info!("🛑 主循环开始前已被停止");
            return;
        }
        self.run_main_loop().await;
    }

    pub fn stop(&mut self) {
        info!("🛑 正在停止...");
        self.running.stop();
        self.publish_status();
    }

    /// 清空进度缓存，运行中拒绝执行
    pub fn clear_cache(&mut self) -> AppResult<bool> {
        if self.is_running() {
            return Ok(false);
        }
        self.store.clear()?;
        self.processing_section = None;
        self.publish_status();
        info!("🗑️ 进度缓存已清空");
        Ok(true)
    }

    /// 当前状态快照
    pub fn status(&self) -> StatusReport {
        let current_section = self.processing_section.or(self.store.current_section());
        let (pending_count, total_count) = current_section
            .map(|id| (self.store.pending_count(id), self.store.total_count(id)))
            .unwrap_or((0, 0));

        StatusReport {
            state: if self.is_running() {
                RunState::Running
            } else {
                RunState::Ready
            },
            current_section,
            pending_count,
            total_count,
            completed: self.counters.completed,
            failed: self.counters.failed,
            skipped: self.counters.skipped,
        }
    }

    pub(crate) fn publish_status(&self) {
        self.status_tx.send_replace(self.status());
    }

    async fn run_main_loop(&mut self) {
        info!("🔄 主循环启动...");

        let start_section = match self.discovery.current_section_id().await {
            Ok(Some(id)) => id,
            Ok(None) => {
                self.abort_startup("无法确定起始单元");
                return;
            }
            Err(e) => {
                self.abort_startup(&format!("无法确定起始单元: {}", e));
                return;
            }
        };
        info!("📍 从单元 {} 开始", start_section);

        let mut current = start_section;
        if let Err(e) = self.process_section(current).await {
            error!("❌ 处理单元 {} 出错: {}", current, e);
            self.clock.sleep(self.timings.loop_error_backoff()).await;
        }

        while self.is_running() {
            match self.advance(current).await {
                Ok(Some(next)) => current = next,
                Ok(None) => {
                    info!("🏁 没有更多单元");
                    self.stop();
                    break;
                }
                Err(e) => {
                    error!("❌ 主循环出错: {}", e);
                    self.clock.sleep(self.timings.loop_error_backoff()).await;
                }
            }
        }

        info!("🏁 运行结束");
        self.publish_status();
        self.notifier.summary(
            self.counters.completed,
            self.counters.failed,
            self.counters.skipped,
        );
    }

    /// 查找并处理下一个单元；没有下一个单元时返回 None
    async fn advance(&mut self, current: u32) -> AppResult<Option<u32>> {
        let Some(next) = self.scanner.find_next(current).await? else {
            return Ok(None);
        };

        if self.is_running() {
            self.process_section(next).await?;
        }
        self.clock.sleep(self.timings.loop_pause()).await;

        Ok(Some(next))
    }

    fn abort_startup(&mut self, reason: &str) {
        error!("❌ {}", reason);
        self.stop();
        self.notifier.fatal(reason);
    }
}
