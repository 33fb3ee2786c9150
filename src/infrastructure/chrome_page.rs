//! 通过 CDP 在真实页面上实现 `PageContent`

use async_trait::async_trait;

use crate::error::AppResult;
use crate::infrastructure::js_executor::JsExecutor;
use crate::infrastructure::page::{ControlSnapshot, PageContent};

const EXISTS_JS: &str = r#"(sel) => document.querySelector(sel) !== null"#;

const CLICK_JS: &str = r#"(sel) => {
    const el = document.querySelector(sel);
    if (!el) return false;
    el.click();
    return true;
}"#;

const SCROLL_INTO_VIEW_JS: &str = r#"(sel) => {
    const el = document.querySelector(sel);
    if (!el) return false;
    el.scrollIntoView({ behavior: 'smooth', block: 'center' });
    return true;
}"#;

const CLOSEST_ATTRIBUTE_JS: &str = r#"(sel, ancestor, attr) => {
    const el = document.querySelector(sel);
    if (!el) return null;
    const parent = el.closest(ancestor);
    return parent ? parent.getAttribute(attr) : null;
}"#;

const CONTROLS_JS: &str = r#"(sel) => Array.from(document.querySelectorAll(sel)).map(btn => ({
    dataTest: btn.getAttribute('data-test'),
    imageSources: Array.from(btn.querySelectorAll('img')).map(img => img.src || '')
}))"#;

const SCROLL_BY_JS: &str = r#"(fraction) => {
    window.scrollBy(0, window.innerHeight * fraction);
    return window.scrollY;
}"#;

#[async_trait]
impl PageContent for JsExecutor {
    async fn body_text(&self) -> AppResult<String> {
        self.eval_as("document.body ? document.body.innerText : ''")
            .await
    }

    async fn exists(&self, selector: &str) -> AppResult<bool> {
        self.call(EXISTS_JS, &(selector,)).await
    }

    async fn click(&self, selector: &str) -> AppResult<bool> {
        self.call(CLICK_JS, &(selector,)).await
    }

    async fn scroll_into_view(&self, selector: &str) -> AppResult<bool> {
        self.call(SCROLL_INTO_VIEW_JS, &(selector,)).await
    }

    async fn closest_attribute(
        &self,
        selector: &str,
        ancestor: &str,
        attribute: &str,
    ) -> AppResult<Option<String>> {
        self.call(CLOSEST_ATTRIBUTE_JS, &(selector, ancestor, attribute))
            .await
    }

    async fn controls(&self, selector: &str) -> AppResult<Vec<ControlSnapshot>> {
        self.call(CONTROLS_JS, &(selector,)).await
    }

    async fn scroll_by_viewport(&self, fraction: f64) -> AppResult<()> {
        let _: f64 = self.call(SCROLL_BY_JS, &(fraction,)).await?;
        Ok(())
    }
}
