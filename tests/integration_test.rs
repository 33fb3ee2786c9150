use std::sync::Arc;

use legend_runner::browser::connect_to_browser_and_page;
use legend_runner::config::Config;
use legend_runner::infrastructure::{JsExecutor, PageContent};
use legend_runner::services::{Discovery, SignatureTable};
use legend_runner::utils::logging;

#[tokio::test]
#[ignore] // 默认忽略，需要手动运行：cargo test -- --ignored
async fn test_browser_connection() {
    // 初始化日志
    logging::init(true);

    // 加载配置
    let config = Config::load().expect("加载配置失败");

    // 测试浏览器连接
    let result = connect_to_browser_and_page(
        config.browser_debug_port,
        &config.target_url,
        Some(&config.target_title),
    )
    .await;

    assert!(result.is_ok(), "应该能够成功连接浏览器");
}

#[tokio::test]
#[ignore]
async fn test_discover_current_section() {
    logging::init(true);
    let config = Config::load().expect("加载配置失败");

    // 需要先在浏览器中登录并打开学习地图
    let (_browser, page) = connect_to_browser_and_page(
        config.browser_debug_port,
        &config.target_url,
        Some(&config.target_title),
    )
    .await
    .expect("连接浏览器失败");

    let page: Arc<dyn PageContent> = Arc::new(JsExecutor::new(page));
    let discovery = Discovery::new(page, SignatureTable::builtin().extend(config.signatures));

    let section_id = discovery
        .current_section_id()
        .await
        .expect("读取页面失败")
        .expect("页面上没有单元标题");
    println!("当前单元: {}", section_id);

    let items = discovery.discover(section_id).await.expect("发现课程失败");
    println!("识别出 {} 个课程", items.len());
    for item in items {
        println!("  课程 {}: {:?}", item.number, item.marker);
    }
}
