use std::fmt;

/// 单个课程流程的阶段，按顺序推进
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveStage {
    /// 已定位到课程按钮
    Located,
    /// 已点开课程弹窗
    Opened,
    /// 已进入传奇模式
    SpecialModeEntered,
    /// 已点击开始
    Started,
    /// 题目已加载
    ContentLoaded,
    /// 已尝试一键完成
    Solved,
    /// 等待结束页
    AwaitingConfirmation,
    /// 已回到地图
    Completed,
}

impl fmt::Display for DriveStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DriveStage::Located => "定位",
            DriveStage::Opened => "打开",
            DriveStage::SpecialModeEntered => "传奇模式",
            DriveStage::Started => "开始",
            DriveStage::ContentLoaded => "加载",
            DriveStage::Solved => "完成题目",
            DriveStage::AwaitingConfirmation => "等待结束页",
            DriveStage::Completed => "完成",
        };
        f.write_str(name)
    }
}

/// 一次课程流程的最终结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 顺利完成并回到地图
    Completed,
    /// 被踢回地图或按钮消失
    Kicked,
    /// 普通失败（加载超时、脚本错误）
    Failed,
    /// 卡在结束页，必须停止
    Critical,
}

impl Outcome {
    pub fn is_success(self) -> bool {
        self == Outcome::Completed
    }

    pub fn is_kicked(self) -> bool {
        self == Outcome::Kicked
    }

    pub fn is_critical(self) -> bool {
        self == Outcome::Critical
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Completed => "完成",
            Outcome::Kicked => "被踢出",
            Outcome::Failed => "失败",
            Outcome::Critical => "严重卡死",
        };
        f.write_str(name)
    }
}
