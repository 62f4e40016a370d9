//! 接触场景
//!
//! 每个场景由距离和居留因子 (一天中处于该距离的时间比例) 定义。

use serde::Serialize;

pub const HUG_SCENARIO_ID: &str = "hug";
pub const SAME_ROOM_SCENARIO_ID: &str = "same-room";
pub const SAME_HOUSE_SCENARIO_ID: &str = "same-house";

/// 接触场景
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct ContactScenario {
    pub id: &'static str,
    pub label: &'static str,
    /// 距离 (m)
    pub distance_m: f64,
    /// 居留因子 (0~1)
    pub occupancy_factor: f64,
    pub description: &'static str,
}

/// 三个标准接触场景
pub static CONTACT_SCENARIOS: [ContactScenario; 3] = [
    ContactScenario {
        id: HUG_SCENARIO_ID,
        label: "拥抱/紧密接触",
        distance_m: 0.3,
        occupancy_factor: 0.05,
        description: "每天约1.2小时紧密接触",
    },
    ContactScenario {
        id: SAME_ROOM_SCENARIO_ID,
        label: "同一房间",
        distance_m: 1.0,
        occupancy_factor: 0.25,
        description: "每天约6小时同处一室",
    },
    ContactScenario {
        id: SAME_HOUSE_SCENARIO_ID,
        label: "同一住所",
        distance_m: 2.0,
        occupancy_factor: 0.25,
        description: "保持日常距离",
    },
];

pub fn all_scenarios() -> &'static [ContactScenario] {
    &CONTACT_SCENARIOS
}

/// 按ID查找场景
pub fn scenario(id: &str) -> Option<&'static ContactScenario> {
    CONTACT_SCENARIOS.iter().find(|s| s.id == id)
}
