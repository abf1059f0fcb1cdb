//! tracing 初始化
//!
//! `RUST_LOG` 优先于配置中的过滤指令；可重复调用，之后的调用不生效。
use crate::config::{AppConfig, LogFormat};
use tracing_subscriber::EnvFilter;

/// 安装全局 subscriber；已有 subscriber 时返回 `false`
pub fn init(config: &AppConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let installed = match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .with_target(false)
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
    };
    installed.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_harmless() {
        let config = AppConfig::builder().log_format(LogFormat::Json).build();
        init(&config);
        assert!(!init(&config));
    }
}
