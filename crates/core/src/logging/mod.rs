//! 日志初始化
//!
//! `RUST_LOG` 存在时优先使用其中的过滤指令，否则使用配置中的级别。

pub mod log_level;

pub use log_level::{LogFormat, LogLevel};

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;
use crate::errors::{DispatchError, DispatchResult};

/// 安装全局 tracing subscriber
///
/// 重复调用时返回配置错误，不会覆盖已安装的 subscriber。
pub fn init_logging(config: &ObservabilityConfig) -> DispatchResult<()> {
    let level: LogLevel = config.log_level.parse()?;
    let format: LogFormat = config.log_format.parse()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_directive()));
    let registry = tracing_subscriber::registry().with(env_filter);

    let result = match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
    };
    result.map_err(|e| DispatchError::config_error(format!("日志初始化失败: {e}")))?;

    info!(
        logging.level = level.as_directive(),
        logging.format = ?format,
        "日志系统已初始化"
    );
    Ok(())
}
