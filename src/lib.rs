//! # Legend Runner
//!
//! 通过浏览器调试端口，逐个单元自动完成课程地图上的传奇课程
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page、计时器），只暴露能力
//! - `PageContent` - 页面能力接口，`JsExecutor` 是基于 CDP 的实现
//! - `Clock` - 所有等待都经过它，测试里换成虚拟时钟
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `Discovery` - 读取当前单元和单元内的课程
//! - `classify` - 把课程分成待处理和已完成
//! - `SectionScanner` - 向下滚动寻找下一个单元
//! - `store/` - 进度缓存，每次修改立即落盘
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个课程"的完整处理流程
//! - `ItemCtx` - 上下文封装（section_id + item_number）
//! - `ItemFlow` - 状态机（打开 → 进入 → 加载 → 完成 → 确认）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/controller` - 主循环，跨单元推进
//! - `orchestrator/section_processor` - 单元内遍历课程
//! - `orchestrator/app` - 控制台命令与状态输出
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod control;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::{JsExecutor, PageContent};
pub use models::{Outcome, ProgressState, SectionRecord};
pub use orchestrator::{App, Controller, StopHandle};
pub use store::ProgressStore;
pub use workflow::{ItemCtx, ItemFlow};
