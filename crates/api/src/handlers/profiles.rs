use axum::{
    extract::{Query, State},
    http::HeaderMap,
    response::Response,
};

use dispatch_core::models::Profile;
use dispatch_core::LatencyClass;

use crate::error::ApiResult;
use crate::request::{plan_for, Preferences, QueryPairs};
use crate::response;
use crate::routes::AppState;

pub async fn list_profiles(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<Profile>(&params, &headers)?;
    state.pause(LatencyClass::Read).await;

    let page = state.profile_repo.list(&plan).await?;
    response::rows(page, &plan.select, Preferences::from_headers(&headers))
}
