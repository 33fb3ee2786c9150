//! 单元 / 课程数据结构
//!
//! 持久化格式：
//!
//! ```json
//! { "currentSectionId": 3,
//!   "sections": { "3": { "lastItemNumber": 4,
//!                        "items": { "1": { "number": 1, "status": "pending" } } } } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// 课程按钮上图标代表的类型
///
/// 无法识别的图标不会出现在这里，发现阶段直接丢弃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// 传奇关卡，尚未完成
    LegendaryIncomplete,
    /// 已完成
    Completed,
}

/// 课程状态，只允许 Pending → Skip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// 需要处理
    Pending,
    /// 跳过（已完成、单元最后一课或已经尝试过）
    Skip,
}

/// 发现阶段读到的课程
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveredItem {
    pub number: u32,
    pub marker: MarkerKind,
}

impl DiscoveredItem {
    pub fn new(number: u32, marker: MarkerKind) -> Self {
        Self { number, marker }
    }
}

/// 缓存中的单个课程
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub number: u32,
    pub status: ItemStatus,
}

/// 缓存中的单元记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionRecord {
    pub last_item_number: Option<u32>,
    #[serde(default)]
    pub items: BTreeMap<u32, ItemRecord>,
}

impl SectionRecord {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// 待处理课程，按编号升序
    pub fn pending_numbers(&self) -> Vec<u32> {
        self.items
            .values()
            .filter(|item| item.status == ItemStatus::Pending)
            .map(|item| item.number)
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.items
            .values()
            .filter(|item| item.status == ItemStatus::Pending)
            .count()
    }
}

/// 整个持久化文档
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub current_section_id: Option<u32>,
    #[serde(default)]
    pub sections: BTreeMap<u32, SectionRecord>,
}
