use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
    Json,
};

use dispatch_core::models::DashboardStats;
use dispatch_core::LatencyClass;
use dispatch_domain::query::pipeline;

use crate::error::ApiResult;
use crate::request::{plan_for, Preferences, QueryPairs};
use crate::response;
use crate::routes::AppState;

/// `POST /rest/v1/rpc/get_dashboard_stats`，返回单个统计对象
pub async fn dashboard_stats_rpc(State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    state.pause(LatencyClass::Read).await;
    Ok(Json(state.stats_repo.compute().await?))
}

/// 视图形式，返回只有一行的数组，同样每次重新计算
pub async fn dashboard_stats_view(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<DashboardStats>(&params, &headers)?;
    state.pause(LatencyClass::Read).await;

    let stats = state.stats_repo.compute().await?;
    let page = pipeline::run(vec![stats], &plan, |_| {});
    response::rows(page, &plan.select, Preferences::from_headers(&headers))
}
