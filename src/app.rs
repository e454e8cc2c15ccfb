use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use dispatch_api::{create_app, AppState};
use dispatch_core::{AppConfig, SystemClock};
use dispatch_infrastructure::FixtureStore;

/// 模拟服务应用
pub struct Application {
    config: AppConfig,
    store: FixtureStore,
}

impl Application {
    pub fn new(config: AppConfig) -> Self {
        let clock = Arc::new(SystemClock);
        let identity = config.identity.clone();
        let store = if config.emulator.seed_fixtures {
            FixtureStore::seeded(identity, clock)
        } else {
            FixtureStore::empty(identity, clock)
        };
        Self { config, store }
    }

    /// 监听并处理请求，直到收到关闭信号
    pub async fn run(&self, mut shutdown_rx: broadcast::Receiver<()>) -> Result<()> {
        let state = AppState::from_store(self.store.clone(), self.config.emulator.latency);
        let router = create_app(state, &self.config.api);

        let bind_address = &self.config.api.bind_address;
        let listener = TcpListener::bind(bind_address)
            .await
            .with_context(|| format!("绑定地址失败: {bind_address}"))?;

        let public_url = self
            .config
            .api
            .public_url
            .clone()
            .unwrap_or_else(|| format!("http://{bind_address}"));
        info!(
            %public_url,
            seeded = self.config.emulator.seed_fixtures,
            latency = ?self.config.emulator.latency,
            "Emulator listening"
        );

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
            })
            .await
            .context("HTTP服务异常退出")?;

        info!("Emulator stopped");
        Ok(())
    }
}
