//! 进度缓存
//!
//! 每次修改都立即写回后端，重启后能从上次的位置继续

use tracing::{debug, warn};

use crate::error::AppResult;
use crate::models::{ItemStatus, ProgressState, SectionRecord};
use crate::store::persistence::Persistence;

/// 进度缓存，唯一的写入者是 Controller
pub struct ProgressStore {
    state: ProgressState,
    backend: Box<dyn Persistence>,
}

impl ProgressStore {
    /// 从后端加载；内容损坏时从空状态开始
    pub fn open(backend: impl Persistence + 'static) -> AppResult<Self> {
        let state = match backend.load()? {
            Some(document) => match serde_json::from_str::<ProgressState>(&document) {
                Ok(state) => state,
                Err(e) => {
                    warn!("⚠️ 进度缓存无法解析，将从空状态开始: {}", e);
                    ProgressState::default()
                }
            },
            None => ProgressState::default(),
        };

        debug!(
            "进度缓存已加载: 当前单元 {:?}, 共 {} 个单元",
            state.current_section_id,
            state.sections.len()
        );

        Ok(Self {
            state,
            backend: Box::new(backend),
        })
    }

    pub fn current_section(&self) -> Option<u32> {
        self.state.current_section_id
    }

    pub fn set_current_section(&mut self, section_id: u32) -> AppResult<()> {
        self.state.current_section_id = Some(section_id);
        self.save()
    }

    pub fn section(&self, section_id: u32) -> Option<&SectionRecord> {
        self.state.sections.get(&section_id)
    }

    /// 整体覆盖一个单元的记录
    pub fn set_section(&mut self, section_id: u32, record: SectionRecord) -> AppResult<()> {
        self.state.sections.insert(section_id, record);
        self.save()
    }

    /// 更新单个课程状态；单元或课程不存在时什么也不做
    pub fn set_item_status(
        &mut self,
        section_id: u32,
        item_number: u32,
        status: ItemStatus,
    ) -> AppResult<()> {
        let Some(item) = self
            .state
            .sections
            .get_mut(&section_id)
            .and_then(|record| record.items.get_mut(&item_number))
        else {
            debug!("单元 {} 课程 {} 不在缓存中，忽略状态更新", section_id, item_number);
            return Ok(());
        };

        if item.status == ItemStatus::Skip && status == ItemStatus::Pending {
            debug!("单元 {} 课程 {} 已跳过，不回退为待处理", section_id, item_number);
            return Ok(());
        }

        item.status = status;
        self.save()
    }

    /// 清空全部状态
    pub fn clear(&mut self) -> AppResult<()> {
        self.state = ProgressState::default();
        self.save()
    }

    pub fn pending_count(&self, section_id: u32) -> usize {
        self.section(section_id)
            .map(SectionRecord::pending_count)
            .unwrap_or(0)
    }

    pub fn total_count(&self, section_id: u32) -> usize {
        self.section(section_id)
            .map(|record| record.items.len())
            .unwrap_or(0)
    }

    pub fn state(&self) -> &ProgressState {
        &self.state
    }

    fn save(&mut self) -> AppResult<()> {
        let document = serde_json::to_string(&self.state)?;
        self.backend.save(&document)
    }
}
