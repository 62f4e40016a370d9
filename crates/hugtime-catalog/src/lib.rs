//! # HugTime 参考数据目录
//!
//! 静态参考数据与分类规则：
//! - 核素目录：物理常数、诊疗项目的有效半衰期和常用给药量
//! - 剂量限值表：各标准体系下各类别的限值，以及年龄分类器
//! - 接触场景：距离与居留因子
//! - 家属名单：类别与限值随年龄、怀孕状态和标准自动推导

pub mod dose_limits;
pub mod family;
pub mod nuclides;
pub mod scenarios;

// 重新导出主要类型
pub use dose_limits::{
    categorize, category_label, dose_limits, limit_for, DoseLimitEntry, FALLBACK_LIMIT_MSV,
};
pub use family::{FamilyMember, FamilyMemberInput, FamilyRoster};
pub use nuclides::{all_nuclides, find_procedure, nuclide, procedure, Nuclide, Procedure};
pub use scenarios::{
    all_scenarios, scenario, ContactScenario, CONTACT_SCENARIOS, HUG_SCENARIO_ID,
    SAME_HOUSE_SCENARIO_ID, SAME_ROOM_SCENARIO_ID,
};
