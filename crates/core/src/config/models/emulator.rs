use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 模拟后端配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmulatorConfig {
    /// 启动时是否载入演示数据
    pub seed_fixtures: bool,
    pub latency: LatencyConfig,
}

impl Default for EmulatorConfig {
    fn default() -> Self {
        Self {
            seed_fixtures: true,
            latency: LatencyConfig::default(),
        }
    }
}

/// 各类请求的人为延迟（毫秒），模拟网络往返
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencyConfig {
    pub auth_ms: u64,
    pub refresh_ms: u64,
    pub mutation_ms: u64,
    pub read_ms: u64,
}

/// 延迟类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LatencyClass {
    Auth,
    Refresh,
    Mutation,
    Read,
}

impl LatencyConfig {
    /// 与线上演示环境相近的延迟
    pub fn realistic() -> Self {
        Self {
            auth_ms: 300,
            refresh_ms: 100,
            mutation_ms: 200,
            read_ms: 0,
        }
    }

    pub fn delay_for(&self, class: LatencyClass) -> Duration {
        let millis = match class {
            LatencyClass::Auth => self.auth_ms,
            LatencyClass::Refresh => self.refresh_ms,
            LatencyClass::Mutation => self.mutation_ms,
            LatencyClass::Read => self.read_ms,
        };
        Duration::from_millis(millis)
    }
}

/// 合成身份配置，所有登录请求都返回这个身份
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub token_ttl_seconds: u64,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            user_id: "00000000-0000-0000-0000-000000000001".to_string(),
            email: "demo@example.com".to_string(),
            display_name: "Demo User".to_string(),
            token_ttl_seconds: 3600,
        }
    }
}

impl IdentityConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.user_id.trim().is_empty() {
            return Err(anyhow::anyhow!("合成身份的用户ID不能为空"));
        }
        if !self.email.contains('@') {
            return Err(anyhow::anyhow!("合成身份的邮箱格式无效: {}", self.email));
        }
        if self.token_ttl_seconds == 0 {
            return Err(anyhow::anyhow!("令牌有效期必须大于0"));
        }
        Ok(())
    }
}
