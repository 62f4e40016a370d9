//! 放射性核素与诊疗项目目录
//!
//! 物理半衰期、γ剂量率常数 Γ (μSv·m²/(MBq·h)) 以及各诊疗项目的有效半衰期和常用给药量。

use hugtime_core::NuclideId;
use serde::Serialize;

/// 诊疗项目
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Procedure {
    pub id: &'static str,
    pub label: &'static str,
    pub nuclide_id: NuclideId,
    /// 有效半衰期 (h)，即考虑生物排泄后体内实际观察到的衰减
    pub effective_half_life_hours: f64,
    /// 常用给药量下限 (MBq)
    pub dose_range_min_mbq: f64,
    /// 常用给药量上限 (MBq)
    pub dose_range_max_mbq: f64,
}

impl Procedure {
    /// 给药量是否在常用范围内 (含边界)
    pub fn is_typical_dose(&self, dose_mbq: f64) -> bool {
        dose_mbq >= self.dose_range_min_mbq && dose_mbq <= self.dose_range_max_mbq
    }
}

/// 放射性核素
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Nuclide {
    pub id: NuclideId,
    pub label: &'static str,
    /// 物理半衰期 (h)
    pub physical_half_life_hours: f64,
    /// γ剂量率常数 Γ
    pub gamma: f64,
    pub procedures: &'static [Procedure],
}

impl Nuclide {
    /// 按ID查找本核素下的诊疗项目
    pub fn procedure(&self, procedure_id: &str) -> Option<&'static Procedure> {
        self.procedures.iter().find(|p| p.id == procedure_id)
    }
}

static I131_PROCEDURES: [Procedure; 3] = [
    Procedure {
        id: "i131-ablation",
        label: "甲状腺切除术后残余组织消融",
        nuclide_id: NuclideId::I131,
        effective_half_life_hours: 16.0, // 约0.67天
        dose_range_min_mbq: 1110.0,
        dose_range_max_mbq: 3700.0,
    },
    Procedure {
        id: "i131-cancer-high",
        label: "甲状腺癌治疗 (高剂量)",
        nuclide_id: NuclideId::I131,
        effective_half_life_hours: 16.0,
        dose_range_min_mbq: 3700.0,
        dose_range_max_mbq: 7400.0,
    },
    Procedure {
        id: "i131-hyperthyroid",
        label: "甲状腺功能亢进",
        nuclide_id: NuclideId::I131,
        effective_half_life_hours: 5.5 * 24.0, // 132h, 5~6天取中值
        dose_range_min_mbq: 185.0,
        dose_range_max_mbq: 740.0,
    },
];

static TC99M_PROCEDURES: [Procedure; 2] = [
    Procedure {
        id: "tc99m-bone",
        label: "骨扫描",
        nuclide_id: NuclideId::Tc99m,
        effective_half_life_hours: 3.5, // 3~4小时取中值
        dose_range_min_mbq: 555.0,
        dose_range_max_mbq: 1110.0,
    },
    Procedure {
        id: "tc99m-cardiac",
        label: "心肌灌注扫描",
        nuclide_id: NuclideId::Tc99m,
        effective_half_life_hours: 5.0, // 4~6小时取中值
        dose_range_min_mbq: 370.0,
        dose_range_max_mbq: 1110.0,
    },
];

static F18_PROCEDURES: [Procedure; 1] = [Procedure {
    id: "f18-fdg",
    label: "FDG PET",
    nuclide_id: NuclideId::F18,
    effective_half_life_hours: 110.0 / 60.0,
    dose_range_min_mbq: 185.0,
    dose_range_max_mbq: 370.0,
}];

static LU177_PROCEDURES: [Procedure; 1] = [Procedure {
    id: "lu177-dotatate",
    label: "DOTATATE 治疗",
    nuclide_id: NuclideId::Lu177,
    effective_half_life_hours: 3.5 * 24.0, // 84h
    dose_range_min_mbq: 7400.0,
    dose_range_max_mbq: 7400.0,
}];

static GA68_PROCEDURES: [Procedure; 1] = [Procedure {
    id: "ga68-pet",
    label: "DOTATATE/PSMA PET",
    nuclide_id: NuclideId::Ga68,
    effective_half_life_hours: 68.0 / 60.0,
    dose_range_min_mbq: 100.0,
    dose_range_max_mbq: 200.0,
}];

/// 核素目录，顺序与 [`NuclideId::ALL`] 一致
pub static NUCLIDES: [Nuclide; 5] = [
    Nuclide {
        id: NuclideId::I131,
        label: "I-131 (碘)",
        physical_half_life_hours: 8.02 * 24.0, // 192.48h
        gamma: 0.066,
        procedures: &I131_PROCEDURES,
    },
    Nuclide {
        id: NuclideId::Tc99m,
        label: "Tc-99m (锝)",
        physical_half_life_hours: 6.01,
        gamma: 0.015,
        procedures: &TC99M_PROCEDURES,
    },
    Nuclide {
        id: NuclideId::F18,
        label: "F-18 (氟)",
        physical_half_life_hours: 109.77 / 60.0,
        gamma: 0.143,
        procedures: &F18_PROCEDURES,
    },
    Nuclide {
        id: NuclideId::Lu177,
        label: "Lu-177 (镥)",
        physical_half_life_hours: 6.65 * 24.0, // 159.6h
        gamma: 0.005,
        procedures: &LU177_PROCEDURES,
    },
    Nuclide {
        id: NuclideId::Ga68,
        label: "Ga-68 (镓)",
        physical_half_life_hours: 67.71 / 60.0,
        gamma: 0.13,
        procedures: &GA68_PROCEDURES,
    },
];

/// 获取全部核素
pub fn all_nuclides() -> &'static [Nuclide] {
    &NUCLIDES
}

/// 获取核素数据
pub fn nuclide(id: NuclideId) -> &'static Nuclide {
    match id {
        NuclideId::I131 => &NUCLIDES[0],
        NuclideId::Tc99m => &NUCLIDES[1],
        NuclideId::F18 => &NUCLIDES[2],
        NuclideId::Lu177 => &NUCLIDES[3],
        NuclideId::Ga68 => &NUCLIDES[4],
    }
}

/// 获取指定核素下的诊疗项目
pub fn procedure(nuclide_id: NuclideId, procedure_id: &str) -> Option<&'static Procedure> {
    nuclide(nuclide_id).procedure(procedure_id)
}

/// 在全部核素中按ID查找诊疗项目
pub fn find_procedure(procedure_id: &str) -> Option<&'static Procedure> {
    NUCLIDES
        .iter()
        .flat_map(|n| n.procedures.iter())
        .find(|p| p.id == procedure_id)
}
