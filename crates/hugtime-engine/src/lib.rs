//! # HugTime 计算引擎
//!
//! - 放射计算：衰变、平方反比剂量率、累积剂量积分及其反解 (安全时刻)
//! - 暴露评估：按家属和接触场景组合出倒计时与当前安全距离
//! - 录入验证：患者、给药和家属信息的校验

pub mod evaluator;
pub mod radiation;
pub mod validation;

// 重新导出主要类型
pub use evaluator::{ExposureEvaluator, DEFAULT_CASUAL_OCCUPANCY_FACTOR};
pub use validation::{IntakeValidator, ValidationIssue, ValidationResult};
