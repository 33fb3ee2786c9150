//! 控制面板
//!
//! 命令（start / stop / clear）进来，状态快照和通知出去

pub mod command;
pub mod notifier;
pub mod status;

pub use command::ControlCommand;
pub use notifier::{ConsoleNotifier, Notifier};
pub use status::{RunState, StatusReport};
