use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use dispatch_core::{LatencyClass, LatencyConfig};
use dispatch_domain::repositories::{
    ProfileRepository, ProjectRepository, StatsRepository, TaskLogRepository, TaskRepository,
};
use dispatch_infrastructure::FixtureStore;

use crate::error::ApiError;
use crate::handlers::{
    auth::{current_user, logout, sign_up, token},
    health::health_check,
    profiles::list_profiles,
    projects::{create_project, delete_project, list_projects, update_project},
    stats::{dashboard_stats_rpc, dashboard_stats_view},
    task_logs::list_task_logs,
    tasks::{create_task, delete_task, list_tasks, update_task},
};
use crate::session::SessionHub;

/// API应用状态
#[derive(Clone)]
pub struct AppState {
    pub task_repo: Arc<dyn TaskRepository>,
    pub project_repo: Arc<dyn ProjectRepository>,
    pub task_log_repo: Arc<dyn TaskLogRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub stats_repo: Arc<dyn StatsRepository>,
    pub sessions: SessionHub,
    pub latency: LatencyConfig,
}

impl AppState {
    /// 所有仓储都由同一个夹具存储提供
    pub fn from_store(store: FixtureStore, latency: LatencyConfig) -> Self {
        let sessions = SessionHub::new(store.identity().clone());
        let store = Arc::new(store);
        Self {
            task_repo: store.clone(),
            project_repo: store.clone(),
            task_log_repo: store.clone(),
            profile_repo: store.clone(),
            stats_repo: store,
            sessions,
            latency,
        }
    }

    /// 模拟网络往返延迟
    pub async fn pause(&self, class: LatencyClass) {
        let delay = self.latency.delay_for(class);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

/// 创建API路由
pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        // 数据资源
        .route(
            "/rest/v1/tasks",
            get(list_tasks)
                .post(create_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .route(
            "/rest/v1/projects",
            get(list_projects)
                .post(create_project)
                .patch(update_project)
                .delete(delete_project),
        )
        .route("/rest/v1/task_logs", get(list_task_logs))
        .route("/rest/v1/profiles", get(list_profiles))
        .route("/rest/v1/dashboard_stats", get(dashboard_stats_view))
        .route("/rest/v1/rpc/get_dashboard_stats", post(dashboard_stats_rpc))
        // 认证
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(sign_up))
        .route("/auth/v1/logout", post(logout))
        .route("/auth/v1/user", get(current_user))
        .fallback(|uri: axum::http::Uri| async move {
            ApiError::RouteNotFound(uri.path().to_string())
        })
        .with_state(state)
}
