//! 剂量限值表与年龄分类
//!
//! 每个标准体系都为六个类别给出限值 (mSv)。护理者只作为表中的一行存在，
//! 不会由年龄推导得出。

use hugtime_core::{AgeCategory, DoseStandard};
use serde::Serialize;

/// 类别不在表中时使用的限值 (与成人公众相同)
pub const FALLBACK_LIMIT_MSV: f64 = 1.0;

/// 剂量限值表项
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DoseLimitEntry {
    pub category: AgeCategory,
    pub label: &'static str,
    pub age_range: &'static str,
    pub limit_msv: f64,
    pub description: &'static str,
}

static ICRP_LIMITS: [DoseLimitEntry; 6] = [
    DoseLimitEntry {
        category: AgeCategory::Adult,
        label: "成人公众",
        age_range: "18岁以上",
        limit_msv: 1.0,
        description: "ICRP 103 公众年剂量限值",
    },
    DoseLimitEntry {
        category: AgeCategory::Caregiver,
        label: "成人护理者",
        age_range: "18岁以上",
        limit_msv: 5.0,
        description: "NCRP 155 患者护理者",
    },
    DoseLimitEntry {
        category: AgeCategory::Teenager,
        label: "青少年",
        age_range: "13~17岁",
        limit_msv: 1.0,
        description: "ICRP 103",
    },
    DoseLimitEntry {
        category: AgeCategory::Child,
        label: "儿童",
        age_range: "3~12岁",
        limit_msv: 0.5,
        description: "保守取值 (体型差异)",
    },
    DoseLimitEntry {
        category: AgeCategory::Infant,
        label: "婴幼儿",
        age_range: "0~2岁",
        limit_msv: 0.3,
        description: "最保守取值",
    },
    DoseLimitEntry {
        category: AgeCategory::Pregnant,
        label: "孕妇",
        age_range: "-",
        limit_msv: 1.0,
        description: "ICRP 84 胎儿保护",
    },
];

static KOREAN_LIMITS: [DoseLimitEntry; 6] = [
    DoseLimitEntry {
        category: AgeCategory::Adult,
        label: "公众",
        age_range: "18岁以上",
        limit_msv: 1.0,
        description: "原子力安全委员会告示 公众",
    },
    DoseLimitEntry {
        category: AgeCategory::Caregiver,
        label: "随时出入者",
        age_range: "18岁以上",
        limit_msv: 6.0,
        description: "放射线管理区域随时出入者",
    },
    DoseLimitEntry {
        category: AgeCategory::Teenager,
        label: "青少年",
        age_range: "13~17岁",
        limit_msv: 1.0,
        description: "原子力安全委员会告示",
    },
    DoseLimitEntry {
        category: AgeCategory::Child,
        label: "儿童",
        age_range: "3~12岁",
        limit_msv: 0.5,
        description: "保守取值",
    },
    DoseLimitEntry {
        category: AgeCategory::Infant,
        label: "婴幼儿",
        age_range: "0~2岁",
        limit_msv: 0.3,
        description: "保守取值",
    },
    DoseLimitEntry {
        category: AgeCategory::Pregnant,
        label: "孕妇",
        age_range: "-",
        limit_msv: 1.0,
        description: "剩余孕期",
    },
];

/// 获取某一标准的完整限值表
pub fn dose_limits(standard: DoseStandard) -> &'static [DoseLimitEntry] {
    match standard {
        DoseStandard::Icrp => &ICRP_LIMITS,
        DoseStandard::Korean => &KOREAN_LIMITS,
    }
}

/// 查询限值 (mSv)
pub fn limit_for(standard: DoseStandard, category: AgeCategory) -> f64 {
    limit_for_table(dose_limits(standard), standard, category)
}

/// 在给定表中查询限值，缺失时回退到 [`FALLBACK_LIMIT_MSV`]
fn limit_for_table(table: &[DoseLimitEntry], standard: DoseStandard, category: AgeCategory) -> f64 {
    match limit_in(table, category) {
        Some(limit) => limit,
        None => {
            tracing::warn!(
                "No {} dose limit for category {}, falling back to {} mSv",
                standard,
                category,
                FALLBACK_LIMIT_MSV
            );
            FALLBACK_LIMIT_MSV
        }
    }
}

fn limit_in(table: &[DoseLimitEntry], category: AgeCategory) -> Option<f64> {
    table
        .iter()
        .find(|e| e.category == category)
        .map(|e| e.limit_msv)
}

/// 按年龄和怀孕状态分类
///
/// 怀孕优先于年龄；永远不会返回 [`AgeCategory::Caregiver`]。
pub fn categorize(age: u32, is_pregnant: bool) -> AgeCategory {
    if is_pregnant {
        return AgeCategory::Pregnant;
    }

    match age {
        0..=2 => AgeCategory::Infant,
        3..=12 => AgeCategory::Child,
        13..=17 => AgeCategory::Teenager,
        _ => AgeCategory::Adult,
    }
}

/// 类别显示名称
pub fn category_label(category: AgeCategory) -> &'static str {
    match category {
        AgeCategory::Adult => "成人",
        AgeCategory::Caregiver => "护理者",
        AgeCategory::Teenager => "青少年",
        AgeCategory::Child => "儿童",
        AgeCategory::Infant => "婴幼儿",
        AgeCategory::Pregnant => "孕妇",
    }
}
