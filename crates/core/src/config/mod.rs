//! 配置管理
//!
//! 配置按"默认值 → TOML 文件 → 环境变量"的顺序叠加，详见 [`AppConfig::load`]。

pub mod models;

pub use models::*;
