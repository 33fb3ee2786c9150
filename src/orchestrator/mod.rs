//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责运行生命周期和流程调度，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `app` - 应用生命周期
//! - 连接浏览器，组装控制器
//! - 读取控制台命令（start / stop / clear / reset / status / quit）
//! - 定时输出状态
//!
//! ### `controller_slot` - 控制器槽位
//! - 保证同一时间只有一个控制器
//! - 运行时把控制器移入后台任务，结束后收回
//!
//! ### `controller` - 主控制器
//! - 主循环：起始单元 → 处理 → 查找下一单元
//! - 协作式停止、计数器、状态推送
//!
//! ### `section_processor` - 单个单元处理器
//! - 读取缓存或发现并分类课程
//! - 按升序驱动每个待处理课程，更新缓存
//!
//! ## 层次关系
//!
//! ```text
//! app (命令 / 状态)
//!     ↓
//! controller (处理多个单元)
//!     ↓
//! section_processor (处理单元内的课程)
//!     ↓
//! workflow::ItemFlow (处理单个课程)
//!     ↓
//! services (能力层：discovery / classifier / scanner)
//!     ↓
//! infrastructure (基础设施：PageContent / Clock)
//! ```

pub mod app;
pub mod controller;
pub mod controller_slot;
pub mod section_processor;

// 重新导出主要类型
pub use app::App;
pub use controller::{Controller, RunCounters, StopHandle};
pub use controller_slot::{ControllerFactory, ControllerSlot};
