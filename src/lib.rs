//! # HugTime
//!
//! 核医学检查后，患者与家属在拥抱、同室、同屋三种场景下何时可以安全接触的估算。
//!
//! - [`catalog`]：核素、诊疗项目、剂量限值、接触场景和家属名单
//! - [`engine`]：放射计算、暴露评估和录入验证

pub use hugtime_catalog as catalog;
pub use hugtime_engine as engine;

pub use hugtime_core::{
    utils, AgeCategory, ContactStatus, DoseStandard, ExposureReport, ExposureSnapshot,
    HugTimeError, NuclideId, PatientDose, PatientProfile, Result, Sex,
};
