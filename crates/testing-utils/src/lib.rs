//! # Dispatch Testing Utils
//!
//! 各 crate 共用的测试工具：实体构建器，以及固定时钟下的夹具存储。
//!
//! ```toml
//! [dev-dependencies]
//! dispatch-testing-utils = { path = "../testing-utils" }
//! ```

pub mod builders;
pub mod helpers;

pub use builders::*;
pub use helpers::*;
