//! # Dispatch API
//!
//! 任务派发看板后端的内存模拟服务。对外暴露与线上后端相同的 REST 方言：
//! 资源路径 `/rest/v1/<resource>`，过滤条件写在查询参数里，分页通过 `Range`
//! 请求头，总条数通过 `Content-Range` 响应头返回。调用方切换到模拟服务时
//! 不需要任何改动。
//!
//! ## API 端点
//!
//! ### 数据资源
//! - `GET|POST|PATCH|DELETE /rest/v1/tasks` - 任务，更新和删除需带 `id=eq.<id>`
//! - `GET|POST|PATCH|DELETE /rest/v1/projects` - 项目，删除不级联
//! - `GET /rest/v1/task_logs` - 任务日志，默认按创建时间升序
//! - `GET /rest/v1/profiles` - 当前用户资料
//! - `GET /rest/v1/dashboard_stats` - 看板统计（视图形式）
//! - `POST /rest/v1/rpc/get_dashboard_stats` - 看板统计（RPC 形式）
//!
//! ### 认证
//! - `POST /auth/v1/token?grant_type=password|refresh_token`
//! - `POST /auth/v1/signup`
//! - `POST /auth/v1/logout`
//! - `GET /auth/v1/user`
//!
//! ### 其他
//! - `GET /health` - 健康检查
//!
//! ## 查询示例
//!
//! ```bash
//! # 第二页的待处理任务，按优先级和创建时间排序
//! curl 'http://localhost:54321/rest/v1/tasks?status=in.(pending,ready)&order=priority.desc,created_at.desc' \
//!   -H 'Range: 10-19'
//!
//! # 标题模糊搜索
//! curl 'http://localhost:54321/rest/v1/tasks?title=ilike.*plan*&select=id,title'
//!
//! # 更新任务状态
//! curl -X PATCH 'http://localhost:54321/rest/v1/tasks?id=eq.task-003' \
//!   -H 'Content-Type: application/json' \
//!   -d '{"status":"completed"}'
//! ```
//!
//! ## 错误响应
//!
//! ```json
//! {
//!   "code": "PGRST100",
//!   "message": "Missing required filter on \"id\"",
//!   "details": "缺少 id=eq.<value> 过滤条件",
//!   "hint": "变更和删除请求必须用 id=eq.<id> 指定目标记录",
//!   "error": "请求缺少必需的过滤条件"
//! }
//! ```

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod request;
pub mod response;
pub mod routes;
pub mod session;

use axum::Router;
use tower::ServiceBuilder;

use dispatch_core::ApiConfig;
use middleware::{cors_layer, request_logging, trace_layer};

pub use routes::{create_routes, AppState};
pub use session::{AuthEvent, SessionHub};

/// 创建完整的API应用
pub fn create_app(state: AppState, config: &ApiConfig) -> Router {
    let router = create_routes(state).layer(axum::middleware::from_fn(request_logging));
    let router = match cors_layer(config) {
        Some(cors) => router.layer(cors),
        None => router,
    };
    router.layer(ServiceBuilder::new().layer(trace_layer()))
}
