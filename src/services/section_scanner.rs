//! 查找下一个单元
//!
//! 不断向下滚动，每次滚动后等待页面稳定，再从页面文本读取当前单元。
//! 只保证返回一个与当前不同的单元，不保证编号相邻。

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Timings;
use crate::error::AppResult;
use crate::infrastructure::{Clock, PageContent};
use crate::services::discovery::parse_current_section;

pub struct SectionScanner {
    page: Arc<dyn PageContent>,
    clock: Arc<dyn Clock>,
    scroll_fraction: f64,
    settle: std::time::Duration,
    max_attempts: u32,
}

impl SectionScanner {
    pub fn new(page: Arc<dyn PageContent>, clock: Arc<dyn Clock>, timings: &Timings) -> Self {
        Self {
            page,
            clock,
            scroll_fraction: timings.scan_fraction,
            settle: timings.scan_settle(),
            max_attempts: timings.scan_attempts,
        }
    }

    /// 返回第一个与 `current` 不同的单元编号，滚动次数用完返回 None
    pub async fn find_next(&self, current: u32) -> AppResult<Option<u32>> {
        info!("🔍 查找单元 {} 之后的单元...", current);

        for attempt in 1..=self.max_attempts {
            self.page.scroll_by_viewport(self.scroll_fraction).await?;
            self.clock.sleep(self.settle).await;

            let text = self.page.body_text().await?;
            match parse_current_section(&text) {
                Some(found) if found != current => {
                    info!("✅ 找到下一个单元: {}", found);
                    return Ok(Some(found));
                }
                found => debug!(
                    "第 {}/{} 次滚动后当前单元: {:?}",
                    attempt, self.max_attempts, found
                ),
            }
        }

        info!("❌ 单元 {} 之后没有找到新的单元", current);
        Ok(None)
    }
}
