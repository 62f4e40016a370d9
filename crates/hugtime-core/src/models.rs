//! 核心数据模型定义

use crate::error::HugTimeError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 放射性核素标识
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum NuclideId {
    #[serde(rename = "I-131")]
    I131, // 碘
    #[serde(rename = "Tc-99m")]
    Tc99m, // 锝
    #[serde(rename = "F-18")]
    F18, // 氟
    #[serde(rename = "Lu-177")]
    Lu177, // 镥
    #[serde(rename = "Ga-68")]
    Ga68, // 镓
}

impl NuclideId {
    pub const ALL: [NuclideId; 5] = [
        NuclideId::I131,
        NuclideId::Tc99m,
        NuclideId::F18,
        NuclideId::Lu177,
        NuclideId::Ga68,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NuclideId::I131 => "I-131",
            NuclideId::Tc99m => "Tc-99m",
            NuclideId::F18 => "F-18",
            NuclideId::Lu177 => "Lu-177",
            NuclideId::Ga68 => "Ga-68",
        }
    }
}

impl fmt::Display for NuclideId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NuclideId {
    type Err = HugTimeError;

    /// 接受 "I-131"、"i131"、"TC-99M" 等写法
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        NuclideId::ALL
            .into_iter()
            .find(|id| {
                id.as_str()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .eq(normalized.chars())
            })
            .ok_or_else(|| HugTimeError::NotFound(format!("未知核素: {}", s)))
    }
}

/// 剂量限值标准体系
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DoseStandard {
    #[default]
    Icrp, // ICRP 国际标准
    Korean, // 韩国原子力安全委员会告示
}

impl DoseStandard {
    pub const ALL: [DoseStandard; 2] = [DoseStandard::Icrp, DoseStandard::Korean];

    pub fn as_str(&self) -> &'static str {
        match self {
            DoseStandard::Icrp => "icrp",
            DoseStandard::Korean => "korean",
        }
    }
}

impl fmt::Display for DoseStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DoseStandard {
    type Err = HugTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "icrp" => Ok(DoseStandard::Icrp),
            "korean" | "kr" => Ok(DoseStandard::Korean),
            other => Err(HugTimeError::NotFound(format!("未知剂量标准: {}", other))),
        }
    }
}

/// 年龄/角色类别
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum AgeCategory {
    Adult,     // 成人
    Caregiver, // 护理者 (仅作为限值表中的可选行)
    Teenager,  // 青少年
    Child,     // 儿童
    Infant,    // 婴幼儿
    Pregnant,  // 孕妇
}

impl AgeCategory {
    pub const ALL: [AgeCategory; 6] = [
        AgeCategory::Adult,
        AgeCategory::Caregiver,
        AgeCategory::Teenager,
        AgeCategory::Child,
        AgeCategory::Infant,
        AgeCategory::Pregnant,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeCategory::Adult => "adult",
            AgeCategory::Caregiver => "caregiver",
            AgeCategory::Teenager => "teenager",
            AgeCategory::Child => "child",
            AgeCategory::Infant => "infant",
            AgeCategory::Pregnant => "pregnant",
        }
    }
}

impl fmt::Display for AgeCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 性别枚举
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
    Other,
}

/// 患者基本信息
///
/// 仅在录入阶段做合理性校验，不参与剂量计算。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientProfile {
    pub sex: Option<Sex>,
    pub age: Option<u32>,
    pub weight_kg: Option<f64>,
}

/// 患者给药信息
///
/// 每个字段都可能尚未填写；评估器在任一字段缺失时返回 `NotReady`。
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PatientDose {
    pub nuclide_id: Option<NuclideId>,
    pub procedure_id: Option<String>,
    /// 给药活度 (MBq)
    pub dose_mbq: Option<f64>,
    pub injection_time: Option<DateTime<Utc>>,
}

impl PatientDose {
    /// 创建字段齐全的给药信息
    pub fn new(
        nuclide_id: NuclideId,
        procedure_id: impl Into<String>,
        dose_mbq: f64,
        injection_time: DateTime<Utc>,
    ) -> Self {
        Self {
            nuclide_id: Some(nuclide_id),
            procedure_id: Some(procedure_id.into()),
            dose_mbq: Some(dose_mbq),
            injection_time: Some(injection_time),
        }
    }
}

/// 某一接触场景当前的安全状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ContactStatus {
    /// 安全时刻已过
    SafeNow,
    /// 距离安全时刻还剩的秒数
    Countdown { remaining_seconds: u64 },
    /// 在当前模型下无法达到安全
    Unreachable,
}

impl ContactStatus {
    pub fn is_safe_now(&self) -> bool {
        matches!(self, ContactStatus::SafeNow)
    }

    /// 剩余秒数；已安全为 `Some(0)`，不可达为 `None`
    pub fn remaining_seconds(&self) -> Option<u64> {
        match self {
            ContactStatus::SafeNow => Some(0),
            ContactStatus::Countdown { remaining_seconds } => Some(*remaining_seconds),
            ContactStatus::Unreachable => None,
        }
    }
}

/// 单个 (家属, 场景) 的计算结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScenarioResult {
    pub scenario_id: String,
    /// 自注射时刻起到累积剂量降至限值的时间 (h)，不可达时为 +∞ (JSON 中为 null)
    #[serde(with = "hours_or_never")]
    pub hug_time_hours: f64,
    pub status: ContactStatus,
}

/// 非有限的小时数以 null 表示，读回时还原为 +∞
mod hours_or_never {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(hours: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if hours.is_finite() {
            serializer.serialize_some(hours)
        } else {
            serializer.serialize_none()
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::INFINITY))
    }
}

impl ScenarioResult {
    pub fn is_safe_now(&self) -> bool {
        self.status.is_safe_now()
    }
}

/// 单个家属的暴露快照
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureSnapshot {
    pub member_id: Uuid,
    pub scenarios: Vec<ScenarioResult>,
    /// 以当前活度计算的安全距离 (m)
    pub current_safe_distance_m: f64,
}

impl ExposureSnapshot {
    /// 按场景ID查找结果
    pub fn scenario(&self, scenario_id: &str) -> Option<&ScenarioResult> {
        self.scenarios.iter().find(|s| s.scenario_id == scenario_id)
    }

    /// 所有场景是否都已安全
    pub fn all_safe(&self) -> bool {
        self.scenarios.iter().all(ScenarioResult::is_safe_now)
    }
}

/// 等待时间最长的家属
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LongestWait {
    pub member_id: Uuid,
    pub status: ContactStatus,
}

/// 一次完整评估的输出
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExposureReport {
    pub evaluated_at: DateTime<Utc>,
    pub elapsed_hours: f64,
    pub current_activity_mbq: f64,
    pub remaining_activity_percent: f64,
    pub members: Vec<ExposureSnapshot>,
}

impl ExposureReport {
    /// 按家属ID查找快照
    pub fn member(&self, member_id: Uuid) -> Option<&ExposureSnapshot> {
        self.members.iter().find(|m| m.member_id == member_id)
    }

    /// 指定场景下仍需等待最久的家属
    ///
    /// 不可达优先于任何倒计时；剩余秒数相同时取列表中靠前者。所有人都已安全时返回 `None`。
    pub fn longest_wait(&self, scenario_id: &str) -> Option<LongestWait> {
        let mut longest: Option<LongestWait> = None;

        for member in &self.members {
            let Some(result) = member.scenario(scenario_id) else {
                continue;
            };

            let rank = wait_rank(&result.status);
            if rank == 0 {
                continue;
            }

            let is_longer = match &longest {
                Some(current) => rank > wait_rank(&current.status),
                None => true,
            };

            if is_longer {
                longest = Some(LongestWait {
                    member_id: member.member_id,
                    status: result.status,
                });
            }
        }

        longest
    }

    /// 指定场景下是否所有家属都已安全
    pub fn all_members_safe(&self, scenario_id: &str) -> bool {
        self.longest_wait(scenario_id).is_none()
    }
}

fn wait_rank(status: &ContactStatus) -> u128 {
    match status {
        ContactStatus::SafeNow => 0,
        ContactStatus::Countdown { remaining_seconds } => *remaining_seconds as u128,
        ContactStatus::Unreachable => u128::MAX,
    }
}
