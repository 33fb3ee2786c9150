use anyhow::Result;
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::error::AppError;

/// 连接到浏览器并获取页面
///
/// 优先复用标题或地址包含 `target_title` 的已打开页面（用户通常已经登录），
/// 找不到时新建页面并导航到 `target_url`。
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: &str,
    target_title: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}, 目标标题: {:?}", target_url, target_title);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        AppError::browser_connection_failed(port, e)
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    if let Some(keyword) = target_title {
        let keyword_lower = keyword.to_lowercase();
        debug!("正在查找标题或地址包含 '{}' 的页面", keyword);
        for p in pages.iter() {
            let title = p.get_title().await.ok().flatten().unwrap_or_default();
            let url = p.url().await.ok().flatten().unwrap_or_default();
            debug!("检查页面: {} ({})", title, url);
            if title.to_lowercase().contains(&keyword_lower)
                || url.to_lowercase().contains(&keyword_lower)
            {
                info!("✓ 找到目标页面: {}", title);
                return Ok((browser, p.clone()));
            }
        }
        debug!("未找到匹配的页面，将创建新页面");
    }

    debug!("创建新页面并导航到: {}", target_url);
    let new_page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建新页面失败: {}", e);
        e
    })?;
    new_page.goto(target_url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", target_url, e);
        e
    })?;
    info!("已导航到: {}", target_url);

    Ok((browser, new_page))
}
