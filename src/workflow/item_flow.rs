//! 单个课程处理流程 - 流程层
//!
//! 核心职责：把一节传奇课从地图上点开、做完、回到地图
//!
//! 阶段顺序：
//! 1. 定位 → 打开：滚动到课程按钮并点击
//! 2. 打开 → 传奇模式 → 开始：等待按钮出现并点击，找不到视为被踢出
//! 3. 开始 → 加载：轮询题目是否出现，超时为普通失败
//! 4. 加载 → 完成题目：有一键完成按钮就点
//! 5. 完成题目 → 等待结束页：最多五分钟，超时为严重卡死
//! 6. 等待结束页 → 完成：点继续，回到地图即成功
//!
//! 任何一次调用都只会返回一个 `Outcome`。

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::{Clock, PageContent};
use crate::models::{DriveStage, Outcome};
use crate::services::page_layout;
use crate::workflow::item_ctx::ItemCtx;

/// 等待结束页时多久输出一次进度
const CONFIRMATION_REPORT_EVERY: Duration = Duration::from_secs(30);

/// 状态机的一步
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Next(DriveStage),
    Exit(Outcome),
}

/// 课程处理流程
///
/// - 不持有缓存，不计数
/// - 只依赖页面能力和时钟
pub struct ItemFlow {
    page: Arc<dyn PageContent>,
    clock: Arc<dyn Clock>,
    timings: Timings,
}

impl ItemFlow {
    pub fn new(page: Arc<dyn PageContent>, clock: Arc<dyn Clock>, timings: Timings) -> Self {
        Self {
            page,
            clock,
            timings,
        }
    }

    /// 执行一次完整流程
    pub async fn run(&self, ctx: &ItemCtx) -> Outcome {
        info!("🔄 {} 开始处理", ctx);

        let mut stage = DriveStage::Located;
        loop {
            let step = match self.advance(stage, ctx).await {
                Ok(step) => step,
                Err(e) => {
                    error!("❌ {} 在 [{}] 阶段出错: {}", ctx, stage, e);
                    Step::Exit(Outcome::Failed)
                }
            };

            match step {
                Step::Next(next) => {
                    debug!("{} {} → {}", ctx, stage, next);
                    stage = next;
                }
                Step::Exit(outcome) => {
                    info!("{} 结束于 [{}]: {}", ctx, stage, outcome);
                    return outcome;
                }
            }
        }
    }

    async fn advance(&self, stage: DriveStage, ctx: &ItemCtx) -> AppResult<Step> {
        match stage {
            DriveStage::Located => self.open_item(ctx).await,
            DriveStage::Opened => {
                self.press_when_ready(ctx, page_layout::SPECIAL_MODE_BUTTON, stage)
                    .await
            }
            DriveStage::SpecialModeEntered => {
                self.press_when_ready(ctx, page_layout::START_BUTTON, stage)
                    .await
            }
            DriveStage::Started => self.wait_for_content(ctx).await,
            DriveStage::ContentLoaded => self.solve(ctx).await,
            DriveStage::Solved => self.await_confirmation(ctx).await,
            DriveStage::AwaitingConfirmation => self.confirm(ctx).await,
            DriveStage::Completed => Ok(Step::Exit(Outcome::Completed)),
        }
    }

    /// 定位 → 打开
    async fn open_item(&self, ctx: &ItemCtx) -> AppResult<Step> {
        let container = self
            .page
            .closest_attribute(
                &ctx.boundary_selector(),
                page_layout::SECTION_CONTAINER,
                "data-test",
            )
            .await?;
        let Some(container) = container else {
            warn!("❌ {} 找不到单元容器", ctx);
            return Ok(Step::Exit(Outcome::Kicked));
        };

        let selector = page_layout::item_control(&container, ctx.item_number);
        if !self.page.scroll_into_view(&selector).await? {
            warn!("❌ {} 找不到课程按钮", ctx);
            return Ok(Step::Exit(Outcome::Kicked));
        }
        self.clock.sleep(self.timings.scroll_settle()).await;

        if !self.page.click(&selector).await? {
            warn!("❌ {} 课程按钮已消失", ctx);
            return Ok(Step::Exit(Outcome::Kicked));
        }
        self.clock.sleep(self.timings.step_delay()).await;

        Ok(Step::Next(DriveStage::Opened))
    }

    /// 打开 → 传奇模式，传奇模式 → 开始
    async fn press_when_ready(
        &self,
        ctx: &ItemCtx,
        selector: &str,
        stage: DriveStage,
    ) -> AppResult<Step> {
        let next = match stage {
            DriveStage::Opened => DriveStage::SpecialModeEntered,
            _ => DriveStage::Started,
        };

        if !self.wait_for_control(selector).await? || !self.page.click(selector).await? {
            warn!("❌ {} 未找到 {}（可能被踢回地图）", ctx, selector);
            return Ok(Step::Exit(Outcome::Kicked));
        }
        self.clock.sleep(self.timings.step_delay()).await;

        Ok(Step::Next(next))
    }

    /// 等待按钮出现；已经回到地图时提前放弃
    async fn wait_for_control(&self, selector: &str) -> AppResult<bool> {
        let started = self.clock.elapsed();

        while self.clock.elapsed() - started < self.timings.control_wait() {
            if self.page.exists(selector).await? {
                return Ok(true);
            }
            if self.page.exists(page_layout::OVERVIEW_MARKER).await? {
                return Ok(false);
            }
            self.clock.sleep(self.timings.control_poll()).await;
        }

        Ok(false)
    }

    /// 开始 → 加载
    async fn wait_for_content(&self, ctx: &ItemCtx) -> AppResult<Step> {
        let attempts = self.timings.content_poll_attempts;

        for attempt in 1..=attempts {
            self.clock.sleep(self.timings.content_poll()).await;

            if self.page.exists(page_layout::SOLVE_BUTTON).await?
                || self.page.exists(page_layout::CHALLENGE_CONTENT).await?
            {
                info!(
                    "✅ {} 题目加载完成，用时 {}ms",
                    ctx,
                    u64::from(attempt) * self.timings.content_poll_ms
                );
                return Ok(Step::Next(DriveStage::ContentLoaded));
            }

            if self.page.exists(page_layout::OVERVIEW_MARKER).await? {
                warn!("⚠️ {} 加载过程中被踢回地图", ctx);
                return Ok(Step::Exit(Outcome::Kicked));
            }
        }

        warn!("❌ {} 题目在 {} 次检查后仍未加载", ctx, attempts);
        Ok(Step::Exit(Outcome::Failed))
    }

    /// 加载 → 完成题目；没有一键完成按钮不算失败
    async fn solve(&self, ctx: &ItemCtx) -> AppResult<Step> {
        if self.page.click(page_layout::SOLVE_BUTTON).await? {
            debug!("{} 已点击一键完成", ctx);
            self.clock.sleep(self.timings.solve_settle()).await;
        } else {
            debug!("{} 没有一键完成按钮，直接等待结束页", ctx);
        }
        Ok(Step::Next(DriveStage::Solved))
    }

    /// 完成题目 → 等待结束页
    async fn await_confirmation(&self, ctx: &ItemCtx) -> AppResult<Step> {
        let timeout = self.timings.confirmation_timeout();
        let started = self.clock.elapsed();
        let mut next_report = CONFIRMATION_REPORT_EVERY;

        info!("⏳ {} 等待继续按钮（最多 {} 秒）...", ctx, timeout.as_secs());

        loop {
            let waited = self.clock.elapsed() - started;
            if waited >= timeout {
                break;
            }

            if self.page.exists(page_layout::CONFIRM_BUTTON).await? {
                info!("✅ {} {}ms 后出现继续按钮", ctx, waited.as_millis());
                return Ok(Step::Next(DriveStage::AwaitingConfirmation));
            }
            if self.page.exists(page_layout::OVERVIEW_MARKER).await? {
                info!("✅ {} 已经回到地图", ctx);
                return Ok(Step::Next(DriveStage::AwaitingConfirmation));
            }

            self.clock.sleep(self.timings.confirmation_poll()).await;

            let waited = self.clock.elapsed() - started;
            if waited >= next_report {
                info!("⏳ {} 仍在等待继续按钮... ({} 秒)", ctx, waited.as_secs());
                next_report += CONFIRMATION_REPORT_EVERY;
            }
        }

        error!("❌ {} {} 秒内没有出现继续按钮", ctx, timeout.as_secs());
        Ok(Step::Exit(Outcome::Critical))
    }

    /// 等待结束页 → 完成
    async fn confirm(&self, ctx: &ItemCtx) -> AppResult<Step> {
        if self.page.click(page_layout::CONFIRM_BUTTON).await? {
            self.clock.sleep(self.timings.step_delay()).await;
            self.clock.sleep(self.timings.confirmation_return()).await;

            if self.page.exists(page_layout::OVERVIEW_MARKER).await? {
                info!("✅ {} 已返回地图", ctx);
                return Ok(Step::Next(DriveStage::Completed));
            }
        }

        if self.page.exists(page_layout::OVERVIEW_MARKER).await? {
            info!("✅ {} 课程完成", ctx);
            return Ok(Step::Next(DriveStage::Completed));
        }

        warn!("❌ {} 点击继续后没有回到地图", ctx);
        Ok(Step::Exit(Outcome::Failed))
    }
}
