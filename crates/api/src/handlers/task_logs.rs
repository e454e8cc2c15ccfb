use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};

use dispatch_core::models::TaskLog;
use dispatch_core::LatencyClass;

use crate::error::ApiResult;
use crate::request::{plan_for, Preferences, QueryPairs};
use crate::response;
use crate::routes::AppState;

/// 任务日志只读，通常带 `task_id=eq.<id>`，默认按创建时间升序
pub async fn list_task_logs(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<TaskLog>(&params, &headers)?;
    state.pause(LatencyClass::Read).await;

    let page = state.task_log_repo.list(&plan).await?;
    response::rows(page, &plan.select, Preferences::from_headers(&headers))
}
