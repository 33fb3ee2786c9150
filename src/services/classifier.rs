//! 课程分类
//!
//! 规则：
//! 1. 已完成图标 → 跳过
//! 2. 单元最后一课 → 跳过（最后一课走的是单元传奇，流程不同）
//! 3. 其余 → 待处理

use std::collections::BTreeMap;

use tracing::debug;

use crate::models::{DiscoveredItem, ItemRecord, ItemStatus, MarkerKind, SectionRecord};

/// 分类结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub last_item_number: Option<u32>,
    pub items: BTreeMap<u32, ItemRecord>,
}

impl From<Classification> for SectionRecord {
    fn from(c: Classification) -> Self {
        SectionRecord {
            last_item_number: c.last_item_number,
            items: c.items,
        }
    }
}

/// 对一个单元里发现的课程分类，纯函数
pub fn classify(items: &[DiscoveredItem]) -> Classification {
    let Some(last_item_number) = items.iter().map(|item| item.number).max() else {
        return Classification::default();
    };
    debug!("单元最后一课: {}", last_item_number);

    let items = items
        .iter()
        .map(|item| {
            let status = if item.marker == MarkerKind::Completed {
                debug!("课程 {}: 已完成图标 → 跳过", item.number);
                ItemStatus::Skip
            } else if item.number == last_item_number {
                debug!("课程 {}: 最后一课 → 跳过", item.number);
                ItemStatus::Skip
            } else {
                debug!("课程 {}: 需要完成 → 待处理", item.number);
                ItemStatus::Pending
            };
            (
                item.number,
                ItemRecord {
                    number: item.number,
                    status,
                },
            )
        })
        .collect();

    Classification {
        last_item_number: Some(last_item_number),
        items,
    }
}
