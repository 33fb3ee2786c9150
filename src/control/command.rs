use std::str::FromStr;

/// 控制台命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    Start,
    Stop,
    ClearCache,
    /// 停止并重建控制器（计数器归零）
    Reset,
    Status,
    Quit,
}

impl FromStr for ControlCommand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" | "s" => Ok(ControlCommand::Start),
            "stop" | "x" => Ok(ControlCommand::Stop),
            "clear" | "clear-cache" | "clearcache" => Ok(ControlCommand::ClearCache),
            "reset" | "restart" => Ok(ControlCommand::Reset),
            "status" | "?" => Ok(ControlCommand::Status),
            "quit" | "exit" | "q" => Ok(ControlCommand::Quit),
            other => Err(format!(
                "未知命令 '{}'，可用命令: start / stop / clear / reset / status / quit",
                other
            )),
        }
    }
}
