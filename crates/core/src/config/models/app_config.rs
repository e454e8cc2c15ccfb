use anyhow::{Context, Result};
use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{
    api_observability::{ApiConfig, ObservabilityConfig},
    emulator::{EmulatorConfig, IdentityConfig},
};

/// 模拟服务整体配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub emulator: EmulatorConfig,
    pub identity: IdentityConfig,
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序：
    /// 1. 内置默认值
    /// 2. 配置文件（TOML），未指定路径时依次尝试默认位置
    /// 3. 环境变量覆盖（前缀 `DISPATCH_`，层级分隔符 `__`），优先级最高
    ///
    /// 例如 `DISPATCH_API__BIND_ADDRESS=0.0.0.0:8080`。
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let defaults = AppConfig::default();
        let mut builder = ConfigBuilder::builder()
            .set_default("api.bind_address", defaults.api.bind_address.as_str())?
            .set_default("api.cors_enabled", defaults.api.cors_enabled)?
            .set_default("api.cors_origins", defaults.api.cors_origins.clone())?
            .set_default("emulator.seed_fixtures", defaults.emulator.seed_fixtures)?
            .set_default("emulator.latency.auth_ms", 0i64)?
            .set_default("emulator.latency.refresh_ms", 0i64)?
            .set_default("emulator.latency.mutation_ms", 0i64)?
            .set_default("emulator.latency.read_ms", 0i64)?
            .set_default("identity.user_id", defaults.identity.user_id.as_str())?
            .set_default("identity.email", defaults.identity.email.as_str())?
            .set_default("identity.display_name", defaults.identity.display_name.as_str())?
            .set_default(
                "identity.token_ttl_seconds",
                defaults.identity.token_ttl_seconds as i64,
            )?
            .set_default("observability.log_level", defaults.observability.log_level.as_str())?
            .set_default(
                "observability.log_format",
                defaults.observability.log_format.as_str(),
            )?;

        if let Some(path) = config_path {
            if !Path::new(path).exists() {
                return Err(anyhow::anyhow!("配置文件不存在: {}", path));
            }
            builder = builder.add_source(File::new(path, FileFormat::Toml));
        } else {
            let default_paths = ["config/emulator.toml", "emulator.toml"];
            if let Some(path) = default_paths.iter().find(|path| Path::new(path).exists()) {
                builder = builder.add_source(File::new(path, FileFormat::Toml));
            }
        }

        builder = builder.add_source(
            Environment::with_prefix("DISPATCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder
            .build()
            .context("构建配置失败")?
            .try_deserialize()
            .context("反序列化配置失败")?;

        config.validate()?;

        Ok(config)
    }

    /// 从TOML字符串加载配置
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(toml_str).context("解析TOML配置失败")?;
        config.validate()?;
        Ok(config)
    }

    /// 序列化为TOML字符串
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("序列化配置为TOML失败")
    }

    pub fn validate(&self) -> Result<()> {
        self.api.validate().context("API配置验证失败")?;
        self.identity.validate().context("合成身份配置验证失败")?;
        self.observability
            .validate()
            .context("可观测性配置验证失败")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.emulator.seed_fixtures);
        assert_eq!(config.emulator.latency.mutation_ms, 0);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = AppConfig::default();
        config.api.bind_address = "0.0.0.0:9000".to_string();
        config.emulator.latency.auth_ms = 300;

        let toml_str = config.to_toml().unwrap();
        let parsed = AppConfig::from_toml(&toml_str).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[api]
bind_address = "127.0.0.1:7000"
cors_enabled = false
cors_origins = []

[emulator]
seed_fixtures = false

[emulator.latency]
auth_ms = 300
refresh_ms = 100
mutation_ms = 200
read_ms = 0

[identity]
user_id = "user-42"
email = "qa@example.com"
display_name = "QA"
token_ttl_seconds = 60
"#
        )
        .unwrap();

        let config = AppConfig::load(Some(file.path().to_str().unwrap())).unwrap();
        assert_eq!(config.api.bind_address, "127.0.0.1:7000");
        assert!(!config.api.cors_enabled);
        assert!(!config.emulator.seed_fixtures);
        assert_eq!(config.emulator.latency.refresh_ms, 100);
        assert_eq!(config.identity.user_id, "user-42");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = AppConfig::load(Some("/definitely/not/here/emulator.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_bind_address_rejected() {
        let toml_str = r#"
[api]
bind_address = "no-port"
cors_enabled = true
cors_origins = ["*"]

[emulator]
seed_fixtures = true

[emulator.latency]
auth_ms = 0
refresh_ms = 0
mutation_ms = 0
read_ms = 0

[identity]
user_id = "u"
email = "u@example.com"
display_name = "U"
token_ttl_seconds = 10

[observability]
log_level = "info"
log_format = "pretty"
"#;
        assert!(AppConfig::from_toml(toml_str).is_err());
    }
}
