//! 基础设施层
//!
//! 持有稀缺资源（Page、计时器），只暴露能力

pub mod chrome_page;
pub mod clock;
pub mod js_executor;
pub mod page;

pub use clock::{Clock, TokioClock, VirtualClock};
pub use js_executor::JsExecutor;
pub use page::{ControlSnapshot, PageContent};
