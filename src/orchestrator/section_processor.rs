//! 单个单元处理器 - 编排层
//!
//! 1. **读取缓存**：单元已有非空记录时直接使用，不再分析页面
//! 2. **发现与分类**：否则从页面读取课程、分类并写入缓存
//! 3. **遍历课程**：按编号升序处理所有待处理课程
//! 4. **更新状态**：除严重卡死外，任何结果都把课程标记为跳过

use tracing::{error, info, warn};

use crate::error::AppResult;
use crate::models::{ItemStatus, Outcome, SectionRecord};
use crate::orchestrator::controller::Controller;
use crate::services::classify;
use crate::workflow::ItemCtx;

impl Controller {
    /// 处理一个单元
    pub async fn process_section(&mut self, section_id: u32) -> AppResult<()> {
        info!("\n=== 处理单元 {} ===", section_id);

        self.processing_section = Some(section_id);
        self.store.set_current_section(section_id)?;
        self.publish_status();

        let cached = self
            .store
            .section(section_id)
            .filter(|record| !record.is_empty())
            .cloned();

        let record = match cached {
            Some(record) => {
                info!("📁 使用单元 {} 的缓存数据", section_id);
                record
            }
            None => match self.analyze_section(section_id).await? {
                Some(record) => record,
                None => return Ok(()),
            },
        };

        let pending = record.pending_numbers();
        if pending.is_empty() {
            info!("📭 单元 {} 没有需要处理的课程", section_id);
            return Ok(());
        }

        let mut processed = 0;
        for item_number in pending {
            if !self.is_running() {
                info!("🛑 已停止，单元 {} 剩余课程留到下次", section_id);
                break;
            }

            info!("🎯 处理单元 {} 的课程 {}", section_id, item_number);
            let outcome = self.flow.run(&ItemCtx::new(section_id, item_number)).await;

            match outcome {
                Outcome::Completed => {
                    self.counters.completed += 1;
                    self.store
                        .set_item_status(section_id, item_number, ItemStatus::Skip)?;
                    info!("✅ 已完成: {}", self.counters.completed);
                }
                Outcome::Kicked => {
                    self.counters.failed += 1;
                    self.counters.skipped += 1;
                    self.store
                        .set_item_status(section_id, item_number, ItemStatus::Skip)?;
                    warn!("⚠️ 课程 {} 被踢出", item_number);
                }
                Outcome::Critical => {
                    self.counters.failed += 1;
                    self.counters.skipped += 1;
                    error!("❌ 课程 {} 卡在继续按钮", item_number);
                    self.stop();
                    self.notifier.fatal("卡在继续按钮，已停止运行");
                    return Ok(());
                }
                Outcome::Failed => {
                    self.counters.failed += 1;
                    self.counters.skipped += 1;
                    self.store
                        .set_item_status(section_id, item_number, ItemStatus::Skip)?;
                    warn!("❌ 课程 {} 失败", item_number);
                }
            }

            processed += 1;
            self.publish_status();

            if outcome.is_success() || outcome.is_kicked() {
                self.clock.sleep(self.timings.between_items()).await;
            }
        }

        info!("✅ 单元 {} 处理完毕: {} 个课程", section_id, processed);
        Ok(())
    }

    /// 从页面发现课程并写入缓存；没有课程时不写缓存
    async fn analyze_section(&mut self, section_id: u32) -> AppResult<Option<SectionRecord>> {
        info!("🔍 分析单元 {}...", section_id);

        let items = self.discovery.discover(section_id).await?;
        if items.is_empty() {
            info!("📭 单元 {} 中没有课程", section_id);
            return Ok(None);
        }

        let record = SectionRecord::from(classify(&items));
        self.store.set_section(section_id, record.clone())?;
        info!(
            "📊 缓存已更新: {} 个课程, {} 个待处理",
            record.items.len(),
            record.pending_count()
        );

        Ok(Some(record))
    }
}
