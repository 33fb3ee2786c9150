//! 单元 / 课程发现服务 - 业务能力层
//!
//! 只读取页面快照，不点击、不写缓存。页面尚未渲染时返回空结果，
//! 由调用方决定重试还是当作"本轮没有课程"。

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::infrastructure::{ControlSnapshot, PageContent};
use crate::models::DiscoveredItem;
use crate::services::page_layout;
use crate::services::signatures::SignatureTable;

/// 单元容器，用它的 data-test 属性定位
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionContainer {
    pub section_id: u32,
    pub key: String,
}

impl SectionContainer {
    pub fn selector(&self) -> String {
        page_layout::container_selector(&self.key)
    }
}

/// 发现服务
pub struct Discovery {
    page: Arc<dyn PageContent>,
    signatures: SignatureTable,
}

impl Discovery {
    pub fn new(page: Arc<dyn PageContent>, signatures: SignatureTable) -> Self {
        Self { page, signatures }
    }

    /// 从页面文本读取当前单元编号
    pub async fn current_section_id(&self) -> AppResult<Option<u32>> {
        let text = self.page.body_text().await?;
        Ok(parse_current_section(&text))
    }

    /// 找到单元最后一课的边界按钮，返回它所在的单元容器
    pub async fn locate_section_boundary(
        &self,
        section_id: u32,
    ) -> AppResult<Option<SectionContainer>> {
        debug!("🔍 查找单元 {} 的边界...", section_id);

        let key = self
            .page
            .closest_attribute(
                &page_layout::boundary_marker(section_id),
                page_layout::SECTION_CONTAINER,
                "data-test",
            )
            .await?;

        match key {
            Some(key) => {
                debug!("✅ 找到单元 {} 的容器: {}", section_id, key);
                Ok(Some(SectionContainer { section_id, key }))
            }
            None => {
                debug!("❌ 未找到单元 {} 的边界", section_id);
                Ok(None)
            }
        }
    }

    /// 列出容器内所有能识别图标的课程
    pub async fn enumerate_items(
        &self,
        container: &SectionContainer,
    ) -> AppResult<Vec<DiscoveredItem>> {
        let controls = self
            .page
            .controls(&page_layout::item_controls(&container.key))
            .await?;
        debug!("📋 单元 {} 中找到 {} 个按钮", container.section_id, controls.len());

        let items = parse_items(&controls, &self.signatures);
        info!(
            "📚 单元 {} 中识别出 {} 个课程",
            container.section_id,
            items.len()
        );
        Ok(items)
    }

    /// 定位 + 列举；找不到单元时返回空列表
    pub async fn discover(&self, section_id: u32) -> AppResult<Vec<DiscoveredItem>> {
        match self.locate_section_boundary(section_id).await? {
            Some(container) => self.enumerate_items(&container).await,
            None => Ok(Vec::new()),
        }
    }
}

/// 从页面文本中解析 "SECTION x, UNIT y" 里的 y
pub fn parse_current_section(text: &str) -> Option<u32> {
    page_layout::current_section_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// 解析按钮快照；没有编号或图标不认识的按钮被丢弃
pub fn parse_items(controls: &[ControlSnapshot], signatures: &SignatureTable) -> Vec<DiscoveredItem> {
    controls
        .iter()
        .filter_map(|control| {
            let data_test = control.data_test.as_deref()?;
            let number = page_layout::item_number_pattern()
                .captures(data_test)?
                .get(1)?
                .as_str()
                .parse()
                .ok()?;

            match signatures.classify(&control.image_sources) {
                Some(marker) => {
                    debug!("  课程 {}: 图标={:?}", number, marker);
                    Some(DiscoveredItem::new(number, marker))
                }
                None => {
                    debug!("  课程 {}: 图标无法识别，忽略", number);
                    None
                }
            }
        })
        .collect()
}
