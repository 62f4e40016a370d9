//! 配置管理
//!
//! 配置来源依次叠加: 内置默认值、TOML 配置文件、`HUGTIME_` 前缀的环境变量
//! (嵌套字段用 `__` 分隔，如 `HUGTIME_LOGGING__LEVEL=debug`)。

use anyhow::{Context, Result};
use config::{Config, ConfigBuilder, Environment, File};
use config::builder::DefaultState;
use hugtime_catalog::FamilyMemberInput;
use hugtime_core::{DoseStandard, PatientDose, PatientProfile};
use hugtime_engine::DEFAULT_CASUAL_OCCUPANCY_FACTOR;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// 完整配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HugTimeConfig {
    /// 评估器配置
    pub evaluator: EvaluatorConfig,
    /// 定时刷新配置
    pub watch: WatchConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 患者信息 (可选，命令行参数优先)
    pub patient: PatientConfig,
    /// 家属名单 (可选，命令行参数优先)
    pub family: Vec<FamilyMemberInput>,
}

/// 评估器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// 默认剂量标准
    pub default_standard: DoseStandard,
    /// 计算当前安全距离的居留因子
    pub casual_occupancy_factor: f64,
}

/// 定时刷新配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// 刷新间隔 (秒)
    pub tick_interval_secs: u64,
    /// 最多刷新次数，未设置时一直运行到全部安全
    pub max_ticks: Option<u64>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或 EnvFilter 指令
    pub level: String,
}

/// 患者配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientConfig {
    pub profile: Option<PatientProfile>,
    pub dose: PatientDose,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            default_standard: DoseStandard::Icrp,
            casual_occupancy_factor: DEFAULT_CASUAL_OCCUPANCY_FACTOR,
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1,
            max_ticks: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// 加载配置
pub fn load_config(config_path: Option<&str>) -> Result<HugTimeConfig> {
    let mut builder = Config::builder();
    if let Some(path) = config_path {
        builder = builder.add_source(File::with_name(path).required(true));
    }

    let config = finish(builder).with_context(|| match config_path {
        Some(path) => format!("Failed to load configuration from {}", path),
        None => "Failed to load configuration".to_string(),
    })?;

    info!("Configuration loaded");
    Ok(config)
}

/// 从 TOML 文本加载配置
#[cfg(test)]
pub fn load_config_from_str(toml: &str) -> Result<HugTimeConfig> {
    let builder = Config::builder().add_source(File::from_str(toml, config::FileFormat::Toml));
    finish(builder)
}

fn finish(builder: ConfigBuilder<DefaultState>) -> Result<HugTimeConfig> {
    let config: HugTimeConfig = builder
        .add_source(
            Environment::with_prefix("HUGTIME")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    ConfigValidator::new().validate(&config)?;
    Ok(config)
}

/// 配置验证规则
struct ValidationRule {
    field_path: String,
    validator: fn(&HugTimeConfig) -> Result<()>,
    error_message: String,
}

/// 配置验证器
pub struct ConfigValidator {
    validation_rules: Vec<ValidationRule>,
}

impl ConfigValidator {
    /// 创建新的配置验证器
    pub fn new() -> Self {
        let validation_rules = vec![
            ValidationRule {
                field_path: "evaluator.casual_occupancy_factor".to_string(),
                validator: |config| {
                    let of = config.evaluator.casual_occupancy_factor;
                    if of > 0.0 && of <= 1.0 {
                        Ok(())
                    } else {
                        Err(anyhow::anyhow!("Occupancy factor {} is outside (0, 1]", of))
                    }
                },
                error_message: "Invalid casual occupancy factor".to_string(),
            },
            ValidationRule {
                field_path: "watch.tick_interval_secs".to_string(),
                validator: |config| {
                    if config.watch.tick_interval_secs == 0 {
                        Err(anyhow::anyhow!("Tick interval cannot be 0"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid tick interval".to_string(),
            },
            ValidationRule {
                field_path: "logging.level".to_string(),
                validator: |config| {
                    if config.logging.level.trim().is_empty() {
                        Err(anyhow::anyhow!("Log level cannot be empty"))
                    } else {
                        Ok(())
                    }
                },
                error_message: "Invalid log level".to_string(),
            },
        ];

        Self { validation_rules }
    }

    /// 验证配置
    pub fn validate(&self, config: &HugTimeConfig) -> Result<()> {
        for rule in &self.validation_rules {
            if let Err(e) = (rule.validator)(config) {
                error!("Configuration validation failed for {}: {}", rule.field_path, e);
                return Err(anyhow::anyhow!("{}: {}", rule.error_message, e));
            }
        }
        Ok(())
    }
}

impl Default for ConfigValidator {
    fn default() -> Self {
        Self::new()
    }
}
