//! 通用工具函数

use uuid::Uuid;

/// 每小时毫秒数
pub const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// mSv 到 μSv 的换算系数
pub const USV_PER_MSV: f64 = 1000.0;

/// 生成家属成员标识
pub fn generate_member_id() -> Uuid {
    Uuid::new_v4()
}

/// 剂量单位换算: mSv -> μSv
pub fn msv_to_usv(msv: f64) -> f64 {
    msv * USV_PER_MSV
}

/// 将正的毫秒数向上取整为秒
pub fn millis_to_ceil_seconds(millis: f64) -> u64 {
    if millis <= 0.0 {
        return 0;
    }
    (millis / 1000.0).ceil() as u64
}
