//! 学习地图页面的固定结构
//!
//! 页面结构一变，只需要改这里

use std::sync::OnceLock;

use regex::Regex;

/// 单元容器
pub const SECTION_CONTAINER: &str = r#"section[data-test^="skill-path-unit-"]"#;

/// 课程按钮
pub const ITEM_CONTROL: &str = r#"button[data-test^="skill-path-level-"]"#;

/// 地图上的任意单元边界，用来判断是否回到了地图
pub const OVERVIEW_MARKER: &str = r#"[aria-label^="Level up Unit"]"#;

/// 课程弹窗里的传奇按钮
pub const SPECIAL_MODE_BUTTON: &str = r#"[data-test="legendary-node-button"]"#;

/// 传奇介绍页的开始按钮
pub const START_BUTTON: &str = r#"[data-test="legendary-start-button"]"#;

/// 一键完成按钮（由辅助脚本注入）
pub const SOLVE_BUTTON: &str = "#nw-solve-all";

/// 题目内容
pub const CHALLENGE_CONTENT: &str = r#"[data-test="challenge"]"#;

/// 结束页的继续按钮
pub const CONFIRM_BUTTON: &str = r#"[data-test="legendary-session-end-continue"]"#;

/// 某个单元最后一课的边界按钮
pub fn boundary_marker(section_id: u32) -> String {
    format!(r#"[aria-label="Level up Unit {} to Legendary"]"#, section_id)
}

/// 由容器的 data-test 属性还原出容器选择器
pub fn container_selector(container_key: &str) -> String {
    format!(r#"section[data-test="{}"]"#, container_key)
}

/// 容器内某个课程的按钮（前缀匹配，取第一个）
pub fn item_control(container_key: &str, item_number: u32) -> String {
    format!(
        r#"{} [data-test^="skill-path-level-{}"]"#,
        container_selector(container_key),
        item_number
    )
}

/// 容器内所有课程按钮
pub fn item_controls(container_key: &str) -> String {
    format!("{} {}", container_selector(container_key), ITEM_CONTROL)
}

/// 从 data-test 中提取课程编号
pub fn item_number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"skill-path-level-(\d+)").expect("课程编号正则无效")
    })
}

/// 从页面文本中提取当前单元，如 "SECTION 2, UNIT 14"
pub fn current_section_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)SECTION\s+\d+,\s*UNIT\s+(\d+)").expect("单元正则无效")
    })
}
