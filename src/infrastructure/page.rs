//! 页面能力接口
//!
//! 上层只通过这个 trait 读取页面、点击按钮、滚动视口。
//! 生产环境由 `JsExecutor` 实现，测试里用脚本化的假页面。

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppResult;

/// 一个按钮的快照：data-test 属性和其中所有图片地址
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSnapshot {
    pub data_test: Option<String>,
    #[serde(default)]
    pub image_sources: Vec<String>,
}

#[async_trait]
pub trait PageContent: Send + Sync {
    /// 页面可见文本
    async fn body_text(&self) -> AppResult<String>;

    /// 是否存在匹配的元素
    async fn exists(&self, selector: &str) -> AppResult<bool>;

    /// 点击第一个匹配的元素，元素不存在时返回 false
    async fn click(&self, selector: &str) -> AppResult<bool>;

    /// 把第一个匹配的元素滚动到视口中央，元素不存在时返回 false
    async fn scroll_into_view(&self, selector: &str) -> AppResult<bool>;

    /// 找到第一个匹配的元素，再取其最近的祖先 `ancestor` 的属性
    async fn closest_attribute(
        &self,
        selector: &str,
        ancestor: &str,
        attribute: &str,
    ) -> AppResult<Option<String>>;

    /// 列出所有匹配的按钮
    async fn controls(&self, selector: &str) -> AppResult<Vec<ControlSnapshot>>;

    /// 向下滚动视口高度的 `fraction` 倍
    async fn scroll_by_viewport(&self, fraction: f64) -> AppResult<()>;
}
