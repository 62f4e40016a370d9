//! 错误定义模块

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Hug Time 统一错误类型
#[derive(Error, Debug)]
pub enum HugTimeError {
    /// 给药信息不完整，评估器不产出结果
    #[error("数据未就绪: 缺少 {0}")]
    NotReady(String),

    /// 注射时间晚于当前时间，拒绝向过去外推
    #[error("无效时间: 注射时间 {injection_time} 晚于当前时间 {now}")]
    InvalidTime {
        injection_time: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    #[error("资源未找到: {0}")]
    NotFound(String),
}

impl HugTimeError {
    /// 是否属于"尚不能计算"一类的可恢复状态
    pub fn is_not_ready(&self) -> bool {
        matches!(self, HugTimeError::NotReady(_))
    }
}

/// Hug Time 统一结果类型
pub type Result<T> = std::result::Result<T, HugTimeError>;
