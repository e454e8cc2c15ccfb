//! 测试环境工具

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use dispatch_core::{FixedClock, IdentityConfig};
use dispatch_infrastructure::FixtureStore;

/// 测试环境：固定时钟加上共享该时钟的夹具存储
pub struct TestEnv {
    pub clock: Arc<FixedClock>,
    pub store: FixtureStore,
}

impl TestEnv {
    /// 测试使用的"现在"：2025-06-10 12:00 UTC
    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    /// 载入演示数据
    pub fn seeded() -> Self {
        let clock = Arc::new(FixedClock::new(Self::now()));
        let store = FixtureStore::seeded(IdentityConfig::default(), clock.clone());
        Self { clock, store }
    }

    /// 空集合
    pub fn empty() -> Self {
        let clock = Arc::new(FixedClock::new(Self::now()));
        let store = FixtureStore::empty(IdentityConfig::default(), clock.clone());
        Self { clock, store }
    }
}
