//! 课程处理上下文
//!
//! 封装"我正在处理哪个单元的第几课"这一信息

use std::fmt::Display;

use crate::services::page_layout;

/// 课程处理上下文
#[derive(Debug, Clone)]
pub struct ItemCtx {
    /// 单元编号
    pub section_id: u32,

    /// 课程编号
    pub item_number: u32,
}

impl ItemCtx {
    pub fn new(section_id: u32, item_number: u32) -> Self {
        Self {
            section_id,
            item_number,
        }
    }

    /// 单元最后一课的边界按钮
    pub fn boundary_selector(&self) -> String {
        page_layout::boundary_marker(self.section_id)
    }
}

impl Display for ItemCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[单元 {} 课程 {}]", self.section_id, self.item_number)
    }
}
