//! 测试用的假页面和通知器
//!
//! 假页面模拟学习地图的几个画面：地图、课程弹窗、传奇介绍页、
//! 题目页、结束页。每个课程可以单独指定行为，
//! 也可以让某个页面调用在第 N 次时返回错误。

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use regex::Regex;

use legend_runner::config::Timings;
use legend_runner::control::{Notifier, StatusReport};
use legend_runner::error::{AppError, AppResult};
use legend_runner::infrastructure::{Clock, ControlSnapshot, PageContent, VirtualClock};
use legend_runner::orchestrator::Controller;
use legend_runner::services::page_layout;
use legend_runner::services::SignatureTable;
use legend_runner::store::ProgressStore;

pub const LEGENDARY_ICON: &str =
    "https://d35aaqx5ub95lt.cloudfront.net/images/path/bfa591f6854b4de08e1656b3e8ca084f.svg";
pub const COMPLETED_ICON: &str =
    "https://d35aaqx5ub95lt.cloudfront.net/images/path/53727b0c96103443bc616435bb1f2fbc.svg";
pub const UNKNOWN_ICON: &str = "https://d35aaqx5ub95lt.cloudfront.net/images/path/locked.svg";

/// 当前画面
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Map,
    Popover,
    Intro,
    Loading,
    Lesson,
    EndScreen,
    Hung,
}

/// 某个课程被点开后的表现
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Behavior {
    #[default]
    Succeed,
    /// 弹窗里没有传奇按钮
    NoSpecialMode,
    /// 点击开始后被踢回地图
    KickedDuringLoad,
    /// 题目一直加载不出来
    NeverLoads,
    /// 做完后一直停在题目页
    Hangs,
    /// 没有一键完成按钮，题目自己结束
    NoSolveButton,
    /// 做完后直接回到地图，没有结束页
    ReturnsToMap,
    /// 点击继续后停在别的页面，回不到地图
    StuckAfterContinue,
}

/// 可注入错误的页面调用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageCall {
    BodyText,
    Exists,
}

struct FakeState {
    screen: Screen,
    active: Option<(u32, u32)>,
    sections: BTreeMap<u32, Vec<(u32, &'static str)>>,
    behaviors: HashMap<(u32, u32), Behavior>,
    body_texts: Vec<String>,
    scrolls: usize,
    controls_calls: usize,
    opened: Vec<(u32, u32)>,
    calls: HashMap<PageCall, usize>,
    failures: HashSet<(PageCall, usize)>,
}

/// 脚本化的学习地图
pub struct FakePage {
    state: Mutex<FakeState>,
    unit_pattern: Regex,
    item_pattern: Regex,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FakeState {
                screen: Screen::Map,
                active: None,
                sections: BTreeMap::new(),
                behaviors: HashMap::new(),
                body_texts: Vec::new(),
                scrolls: 0,
                controls_calls: 0,
                opened: Vec::new(),
                calls: HashMap::new(),
                failures: HashSet::new(),
            }),
            unit_pattern: Regex::new(r"Level up Unit (\d+) to Legendary").unwrap(),
            item_pattern: Regex::new(r#"skill-path-unit-(\d+)"\] \[data-test\^="skill-path-level-(\d+)"#)
                .unwrap(),
        }
    }

    /// 添加一个单元及其课程（编号, 图标地址）
    pub fn with_section(self, section_id: u32, items: &[(u32, &'static str)]) -> Self {
        self.lock().sections.insert(section_id, items.to_vec());
        self
    }

    pub fn with_behavior(self, section_id: u32, item_number: u32, behavior: Behavior) -> Self {
        self.lock()
            .behaviors
            .insert((section_id, item_number), behavior);
        self
    }

    /// 页面文本：第 i 个元素是第 i 次滚动之后读到的文本，超出后停在最后一个
    pub fn with_body_texts(self, texts: &[&str]) -> Self {
        self.lock().body_texts = texts.iter().map(|t| t.to_string()).collect();
        self
    }

    /// 第 `nth` 次（从 1 开始）调用 `call` 时返回页面错误
    pub fn with_failure(self, call: PageCall, nth: usize) -> Self {
        self.lock().failures.insert((call, nth));
        self
    }

    pub fn screen(&self) -> Screen {
        self.lock().screen
    }

    /// 被点开过的课程，按顺序
    pub fn opened(&self) -> Vec<(u32, u32)> {
        self.lock().opened.clone()
    }

    pub fn controls_calls(&self) -> usize {
        self.lock().controls_calls
    }

    pub fn scrolls(&self) -> usize {
        self.lock().scrolls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn item_target(&self, selector: &str) -> Option<(u32, u32)> {
        let caps = self.item_pattern.captures(selector)?;
        Some((caps[1].parse().ok()?, caps[2].parse().ok()?))
    }

    fn has_item(state: &FakeState, section_id: u32, item_number: u32) -> bool {
        state
            .sections
            .get(&section_id)
            .is_some_and(|items| items.iter().any(|(n, _)| *n == item_number))
    }
}

impl FakeState {
    /// 弹窗盖在地图上，地图仍然可见
    fn on_map(&self) -> bool {
        matches!(self.screen, Screen::Map | Screen::Popover)
    }

    /// 记一次调用，命中注入的错误时返回 Err
    fn record_call(&mut self, call: PageCall) -> AppResult<()> {
        let count = self.calls.entry(call).or_insert(0);
        *count += 1;
        if self.failures.contains(&(call, *count)) {
            return Err(AppError::page(format!("{:?} 第 {} 次调用失败", call, count)));
        }
        Ok(())
    }

    fn behavior(&self) -> Behavior {
        self.active
            .and_then(|key| self.behaviors.get(&key).copied())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PageContent for FakePage {
    async fn body_text(&self) -> AppResult<String> {
        let mut state = self.lock();
        state.record_call(PageCall::BodyText)?;
        let index = state.scrolls.min(state.body_texts.len().saturating_sub(1));
        Ok(state.body_texts.get(index).cloned().unwrap_or_default())
    }

    async fn exists(&self, selector: &str) -> AppResult<bool> {
        let mut state = self.lock();
        state.record_call(PageCall::Exists)?;
        let behavior = state.behavior();
        let found = match selector {
            page_layout::OVERVIEW_MARKER => state.on_map(),
            page_layout::SPECIAL_MODE_BUTTON => {
                state.screen == Screen::Popover && behavior != Behavior::NoSpecialMode
            }
            page_layout::START_BUTTON => state.screen == Screen::Intro,
            page_layout::SOLVE_BUTTON => {
                state.screen == Screen::Lesson && behavior != Behavior::NoSolveButton
            }
            page_layout::CHALLENGE_CONTENT => state.screen == Screen::Lesson,
            page_layout::CONFIRM_BUTTON => {
                if state.screen == Screen::Lesson && behavior == Behavior::NoSolveButton {
                    state.screen = Screen::EndScreen;
                }
                state.screen == Screen::EndScreen
            }
            _ => false,
        };
        Ok(found)
    }

    async fn click(&self, selector: &str) -> AppResult<bool> {
        let mut state = self.lock();
        let behavior = state.behavior();

        if let Some((section_id, item_number)) = self.item_target(selector) {
            if !state.on_map() || !Self::has_item(&state, section_id, item_number) {
                return Ok(false);
            }
            state.active = Some((section_id, item_number));
            state.opened.push((section_id, item_number));
            state.screen = Screen::Popover;
            return Ok(true);
        }

        let clicked = match (selector, state.screen) {
            (page_layout::SPECIAL_MODE_BUTTON, Screen::Popover)
                if behavior != Behavior::NoSpecialMode =>
            {
                Some(Screen::Intro)
            }
            (page_layout::START_BUTTON, Screen::Intro) => Some(match behavior {
                Behavior::KickedDuringLoad => Screen::Map,
                Behavior::NeverLoads => Screen::Loading,
                _ => Screen::Lesson,
            }),
            (page_layout::SOLVE_BUTTON, Screen::Lesson) if behavior != Behavior::NoSolveButton => {
                Some(match behavior {
                    Behavior::Hangs => Screen::Hung,
                    Behavior::ReturnsToMap => Screen::Map,
                    _ => Screen::EndScreen,
                })
            }
            (page_layout::CONFIRM_BUTTON, Screen::EndScreen) => Some(match behavior {
                Behavior::StuckAfterContinue => Screen::Hung,
                _ => Screen::Map,
            }),
            _ => None,
        };

        match clicked {
            Some(screen) => {
                state.screen = screen;
                if screen == Screen::Map {
                    state.active = None;
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn scroll_into_view(&self, selector: &str) -> AppResult<bool> {
        let state = self.lock();
        Ok(self
            .item_target(selector)
            .is_some_and(|(s, n)| state.on_map() && Self::has_item(&state, s, n)))
    }

    async fn closest_attribute(
        &self,
        selector: &str,
        _ancestor: &str,
        _attribute: &str,
    ) -> AppResult<Option<String>> {
        let state = self.lock();
        if !state.on_map() {
            return Ok(None);
        }
        let section_id = self
            .unit_pattern
            .captures(selector)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        Ok(section_id
            .filter(|id| state.sections.contains_key(id))
            .map(|id| format!("skill-path-unit-{}", id)))
    }

    async fn controls(&self, selector: &str) -> AppResult<Vec<ControlSnapshot>> {
        let mut state = self.lock();
        state.controls_calls += 1;

        let section_id = Regex::new(r"skill-path-unit-(\d+)")
            .unwrap()
            .captures(selector)
            .and_then(|caps| caps[1].parse::<u32>().ok());
        let items = section_id
            .and_then(|id| state.sections.get(&id))
            .cloned()
            .unwrap_or_default();

        Ok(items
            .into_iter()
            .map(|(number, icon)| ControlSnapshot {
                data_test: Some(format!("skill-path-level-{}", number)),
                image_sources: vec![icon.to_string()],
            })
            .collect())
    }

    async fn scroll_by_viewport(&self, _fraction: f64) -> AppResult<()> {
        self.lock().scrolls += 1;
        Ok(())
    }
}

/// 记录所有通知
#[derive(Default)]
pub struct RecordingNotifier {
    pub statuses: Mutex<Vec<StatusReport>>,
    pub fatals: Mutex<Vec<String>>,
    pub summaries: Mutex<Vec<(u32, u32, u32)>>,
}

impl RecordingNotifier {
    pub fn fatals(&self) -> Vec<String> {
        self.fatals.lock().unwrap().clone()
    }

    pub fn summaries(&self) -> Vec<(u32, u32, u32)> {
        self.summaries.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn status(&self, report: &StatusReport) {
        self.statuses.lock().unwrap().push(report.clone());
    }

    fn fatal(&self, message: &str) {
        self.fatals.lock().unwrap().push(message.to_string());
    }

    fn summary(&self, completed: u32, failed: u32, skipped: u32) {
        self.summaries
            .lock()
            .unwrap()
            .push((completed, failed, skipped));
    }
}

/// 地图顶部的单元标题
pub fn section_heading(section_id: u32) -> String {
    format!("SECTION 1, UNIT {}\nGuidebook", section_id)
}

/// 用虚拟时钟组装控制器
pub fn build_controller(
    page: Arc<FakePage>,
    store: ProgressStore,
    notifier: Arc<RecordingNotifier>,
) -> Controller {
    build_controller_with_clock(page, store, notifier, Arc::new(VirtualClock::new()))
}

/// 同上，由调用方持有时钟以检查耗时
pub fn build_controller_with_clock(
    page: Arc<FakePage>,
    store: ProgressStore,
    notifier: Arc<RecordingNotifier>,
    clock: Arc<VirtualClock>,
) -> Controller {
    let clock: Arc<dyn Clock> = clock;
    Controller::new(
        page,
        clock,
        notifier,
        store,
        SignatureTable::builtin(),
        Timings::default(),
    )
}
