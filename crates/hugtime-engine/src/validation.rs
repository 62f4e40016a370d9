//! 录入数据验证模块
//!
//! 对患者信息、给药信息和家属名单做录入阶段的校验。错误会阻止进入计算，
//! 警告 (例如给药量超出常用范围) 只做提示。

use chrono::{DateTime, Utc};
use hugtime_catalog::{procedure, FamilyMemberInput};
use hugtime_core::{PatientDose, PatientProfile};
use serde::Serialize;
use tracing::{debug, info};

/// 单条验证问题
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

/// 验证结果
#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
    pub is_valid: bool,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            errors: Vec::new(),
            warnings: Vec::new(),
            is_valid: true,
        }
    }

    /// 添加错误
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// 添加警告
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    /// 合并另一个结果
    pub fn merge(&mut self, other: ValidationResult) {
        self.is_valid &= other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// 是否存在指定字段的错误
    pub fn has_error_for(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// 获取验证报告摘要
    pub fn get_summary(&self) -> String {
        if self.is_valid {
            if self.has_warnings() {
                format!("验证通过，但有 {} 个警告", self.warning_count())
            } else {
                "验证完全通过".to_string()
            }
        } else {
            format!(
                "验证失败：{} 个错误，{} 个警告",
                self.error_count(),
                self.warning_count()
            )
        }
    }
}

/// 录入验证器
#[derive(Debug, Clone)]
pub struct IntakeValidator {
    max_age: u32,
    min_weight_kg: f64,
    max_weight_kg: f64,
}

impl Default for IntakeValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl IntakeValidator {
    pub fn new() -> Self {
        Self {
            max_age: 120,
            min_weight_kg: 1.0,
            max_weight_kg: 300.0,
        }
    }

    /// 验证患者信息和给药信息
    pub fn validate_patient(
        &self,
        profile: &PatientProfile,
        dose: &PatientDose,
        now: DateTime<Utc>,
    ) -> ValidationResult {
        let mut result = self.validate_profile(profile);
        result.merge(self.validate_dose(dose, now));

        info!(
            "Patient validation finished: {} errors, {} warnings",
            result.error_count(),
            result.warning_count()
        );
        result
    }

    /// 验证患者基本信息
    pub fn validate_profile(&self, profile: &PatientProfile) -> ValidationResult {
        let mut result = ValidationResult::new();

        match profile.age {
            Some(age) if age <= self.max_age => {}
            _ => result.add_error("age", format!("请正确填写年龄 (0~{}岁)", self.max_age)),
        }

        match profile.weight_kg {
            Some(w) if w >= self.min_weight_kg && w <= self.max_weight_kg => {}
            _ => result.add_error(
                "weight",
                format!(
                    "请正确填写体重 ({}~{}kg)",
                    self.min_weight_kg, self.max_weight_kg
                ),
            ),
        }

        result
    }

    /// 验证给药信息
    pub fn validate_dose(&self, dose: &PatientDose, now: DateTime<Utc>) -> ValidationResult {
        let mut result = ValidationResult::new();

        if dose.nuclide_id.is_none() {
            result.add_error("nuclide_id", "请选择放射性药物");
        }

        let procedure_id = dose.procedure_id.as_deref().map(str::trim).unwrap_or("");
        if procedure_id.is_empty() {
            result.add_error("procedure_id", "请选择诊疗项目");
        } else if let Some(nuclide_id) = dose.nuclide_id {
            if procedure(nuclide_id, procedure_id).is_none() {
                result.add_error(
                    "procedure_id",
                    format!("{} 不是 {} 的诊疗项目", procedure_id, nuclide_id),
                );
            }
        }

        match dose.dose_mbq {
            Some(d) if d.is_finite() && d > 0.0 => {}
            _ => result.add_error("dose_mbq", "请填写给药量"),
        }

        match dose.injection_time {
            None => result.add_error("injection_time", "请填写注射时间"),
            Some(t) if t > now => {
                result.add_error("injection_time", "注射时间在未来，请填写过去的时间")
            }
            Some(_) => {}
        }

        if let Some(message) = self.check_dose_range(dose) {
            result.add_warning("dose_mbq", message);
        }

        result
    }

    /// 给药量超出常用范围时返回提示
    pub fn check_dose_range(&self, dose: &PatientDose) -> Option<String> {
        let nuclide_id = dose.nuclide_id?;
        let procedure = procedure(nuclide_id, dose.procedure_id.as_deref()?)?;
        let dose_mbq = dose.dose_mbq?;

        if procedure.is_typical_dose(dose_mbq) {
            return None;
        }

        debug!(
            "Dose {} MBq outside typical range for {}",
            dose_mbq, procedure.id
        );
        Some(format!(
            "常用给药量范围: {}~{} MBq",
            procedure.dose_range_min_mbq, procedure.dose_range_max_mbq
        ))
    }

    /// 验证家属名单
    pub fn validate_family(&self, family: &[FamilyMemberInput]) -> ValidationResult {
        let mut result = ValidationResult::new();

        if family.is_empty() {
            result.add_error("family", "请至少添加一名家属");
        }

        for (i, member) in family.iter().enumerate() {
            if member.name.trim().is_empty() {
                result.add_error(
                    format!("family-{}-name", i),
                    format!("请填写第 {} 位家属的称呼", i + 1),
                );
            }
            if member.age > self.max_age {
                result.add_error(
                    format!("family-{}-age", i),
                    format!("请正确填写第 {} 位家属的年龄", i + 1),
                );
            }
        }

        result
    }
}
