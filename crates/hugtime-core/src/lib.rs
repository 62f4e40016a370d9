//! # HugTime Core
//!
//! 核心模块，提供放射性核素暴露计算所共用的数据结构、错误定义和通用工具。

pub mod error;
pub mod models;
pub mod utils;

pub use error::{HugTimeError, Result};
pub use models::*;
