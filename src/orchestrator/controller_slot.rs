//! 控制器槽位
//!
//! 同一时间只有一个控制器。运行时控制器被移进后台任务，
//! 结束后收回；重建时先停止并等待旧实例结束，再构造新实例。

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::control::StatusReport;
use crate::error::AppResult;
use crate::orchestrator::controller::{Controller, StopHandle};

/// 构造新控制器的工厂
pub type ControllerFactory = Box<dyn Fn() -> AppResult<Controller> + Send + Sync>;

enum SlotState {
    Idle(Controller),
    Running {
        stop: StopHandle,
        status: watch::Receiver<StatusReport>,
        task: JoinHandle<Controller>,
    },
    Vacant,
}

pub struct ControllerSlot {
    factory: ControllerFactory,
    state: SlotState,
}

impl ControllerSlot {
    pub fn new(factory: ControllerFactory) -> AppResult<Self> {
        let controller = factory()?;
        Ok(Self {
            factory,
            state: SlotState::Idle(controller),
        })
    }

    pub fn is_running(&self) -> bool {
        matches!(&self.state, SlotState::Running { task, .. } if !task.is_finished())
    }

    /// 在后台启动；已在运行时什么也不做
    pub async fn start(&mut self) -> AppResult<()> {
        self.reclaim().await;

        let mut controller = match std::mem::replace(&mut self.state, SlotState::Vacant) {
            SlotState::Idle(controller) => controller,
            SlotState::Vacant => (self.factory)()?,
            running @ SlotState::Running { .. } => {
                info!("已经在运行中");
                self.state = running;
                return Ok(());
            }
        };

        if !controller.begin() {
            self.state = SlotState::Idle(controller);
            return Ok(());
        }

        // 先标记运行再移入后台，之后的 stop 不会丢失
        let stop = controller.stop_handle();
        let status = controller.subscribe();
        let task = tokio::spawn(async move {
            controller.run().await;
            controller
        });

        self.state = SlotState::Running { stop, status, task };
        Ok(())
    }

    /// 请求停止，当前课程结束后生效
    pub fn stop(&mut self) {
        match &mut self.state {
            SlotState::Running { stop, .. } => {
                info!("🛑 已请求停止，当前课程结束后生效");
                stop.stop();
            }
            SlotState::Idle(controller) => controller.stop(),
            SlotState::Vacant => {}
        }
    }

    /// 清空缓存；运行中拒绝
    pub async fn clear_cache(&mut self) -> AppResult<bool> {
        self.reclaim().await;
        match &mut self.state {
            SlotState::Idle(controller) => controller.clear_cache(),
            SlotState::Running { .. } => {
                warn!("⚠️ 运行中不能清空缓存，请先 stop");
                Ok(false)
            }
            SlotState::Vacant => Ok(false),
        }
    }

    /// 停止并等待旧实例，再构造新实例
    pub async fn replace(&mut self) -> AppResult<()> {
        self.stop();
        self.join().await;
        self.state = SlotState::Idle((self.factory)()?);
        info!("♻️ 控制器已重建");
        Ok(())
    }

    /// 等待后台任务结束并收回控制器
    pub async fn join(&mut self) {
        if let SlotState::Running { .. } = self.state {
            let SlotState::Running { task, .. } =
                std::mem::replace(&mut self.state, SlotState::Vacant)
            else {
                return;
            };
            match task.await {
                Ok(controller) => self.state = SlotState::Idle(controller),
                Err(e) => error!("❌ 控制器任务异常结束: {}", e),
            }
        }
    }

    /// 当前状态快照
    pub fn status(&self) -> Option<StatusReport> {
        match &self.state {
            SlotState::Idle(controller) => Some(controller.status()),
            SlotState::Running { status, .. } => Some(status.borrow().clone()),
            SlotState::Vacant => None,
        }
    }

    /// 后台任务已经结束时收回控制器
    async fn reclaim(&mut self) {
        let finished =
            matches!(&self.state, SlotState::Running { task, .. } if task.is_finished());
        if finished {
            self.join().await;
        }
    }
}
