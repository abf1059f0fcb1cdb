//! 应用配置，从环境变量读取
//!
//! - `RUST_LOG`：日志过滤指令（默认 `"info"`）
//! - `LOG_FORMAT`：`pretty` | `json`（默认 `pretty`）
//! - `DIRECTORY_SYNC_ENABLED` / `MAIL_ENABLED` / `GROUPWARE_ENABLED` /
//!   `LEARNING_PLATFORM_ENABLED` / `AUDIT_LOG_ENABLED`：是否构造对应的事件消费者（默认 `true`）
//!
//! 布尔值格式不合法时返回 `AppError::Config`，不会静默回退到默认值。
use crate::error::{AppError, AppResult};
use bon::Builder;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(AppError::Config {
                key: "LOG_FORMAT",
                reason: format!("expected `pretty` or `json`, got `{other}`"),
            }),
        }
    }
}

#[derive(Builder, Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    #[builder(default = "info".to_string(), into)]
    pub log_filter: String,
    #[builder(default)]
    pub log_format: LogFormat,
    #[builder(default = true)]
    pub directory_sync: bool,
    #[builder(default = true)]
    pub mail: bool,
    #[builder(default = true)]
    pub groupware: bool,
    #[builder(default = true)]
    pub learning_platform: bool,
    #[builder(default = true)]
    pub audit_log: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl AppConfig {
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 以任意键值来源构造；缺失的键取默认值
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &'static str| -> AppResult<bool> {
            lookup(key).map_or(Ok(true), |v| parse_bool(key, &v))
        };

        Ok(Self {
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            log_format: lookup("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
            directory_sync: flag("DIRECTORY_SYNC_ENABLED")?,
            mail: flag("MAIL_ENABLED")?,
            groupware: flag("GROUPWARE_ENABLED")?,
            learning_platform: flag("LEARNING_PLATFORM_ENABLED")?,
            audit_log: flag("AUDIT_LOG_ENABLED")?,
        })
    }
}

fn parse_bool(key: &'static str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(AppError::Config {
            key,
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_enable_every_consumer() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.directory_sync && config.mail && config.audit_log);
    }

    #[test]
    fn reads_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("RUST_LOG", "schulportal_domain=debug"),
            ("LOG_FORMAT", "JSON"),
            ("GROUPWARE_ENABLED", "false"),
            ("MAIL_ENABLED", "0"),
        ]))
        .unwrap();

        assert_eq!(config.log_filter, "schulportal_domain=debug");
        assert_eq!(config.log_format, LogFormat::Json);
        assert!(!config.groupware);
        assert!(!config.mail);
        assert!(config.learning_platform);
    }

    #[test]
    fn malformed_values_are_config_errors() {
        let err = AppConfig::from_lookup(lookup(&[("AUDIT_LOG_ENABLED", "maybe")])).unwrap_err();
        assert!(matches!(err, AppError::Config { key: "AUDIT_LOG_ENABLED", .. }));

        let err = AppConfig::from_lookup(lookup(&[("LOG_FORMAT", "xml")])).unwrap_err();
        assert!(matches!(err, AppError::Config { key: "LOG_FORMAT", .. }));
    }

    #[test]
    fn builder_overrides_single_fields() {
        let config = AppConfig::builder().mail(false).log_filter("debug").build();
        assert!(!config.mail);
        assert!(config.groupware);
        assert_eq!(config.log_filter, "debug");
    }
}
