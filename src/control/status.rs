use std::fmt;

/// 运行状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Ready,
    Running,
}

/// 推送给控制面板的状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub state: RunState,
    pub current_section: Option<u32>,
    pub pending_count: usize,
    pub total_count: usize,
    pub completed: u32,
    pub failed: u32,
    pub skipped: u32,
}

impl fmt::Display for StatusReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            RunState::Ready => "就绪",
            RunState::Running => "运行中",
        };
        let section = self
            .current_section
            .map(|id| format!("单元 {}", id))
            .unwrap_or_else(|| "-".to_string());

        write!(
            f,
            "状态: {} | {} | 课程: {}/{} | ✅ {} ❌ {} ⏭ {}",
            state,
            section,
            self.pending_count,
            self.total_count,
            self.completed,
            self.failed,
            self.skipped
        )
    }
}
