use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};

use dispatch_core::models::{NewProject, Project, ProjectPatch};
use dispatch_core::LatencyClass;

use crate::error::ApiResult;
use crate::request::{decode, decode_one_or_many, json_body, plan_for, Preferences, QueryPairs};
use crate::response;
use crate::routes::AppState;

pub async fn list_projects(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<Project>(&params, &headers)?;
    state.pause(LatencyClass::Read).await;

    let page = state.project_repo.list(&plan).await?;
    response::rows(page, &plan.select, Preferences::from_headers(&headers))
}

pub async fn create_project(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let plan = plan_for::<Project>(&params, &headers)?;
    let (inputs, many) = decode_one_or_many::<NewProject>(&body)?;
    state.pause(LatencyClass::Mutation).await;

    let mut created = Vec::with_capacity(inputs.len());
    for input in inputs {
        created.push(state.project_repo.create(input).await?);
    }

    response::mutation(
        created,
        many,
        &plan.select,
        Preferences::from_headers(&headers),
        StatusCode::CREATED,
    )
}

pub async fn update_project(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let plan = plan_for::<Project>(&params, &headers)?;
    let id = plan.target_id()?;
    let patch: ProjectPatch = decode(json_body(&body)?)?;
    state.pause(LatencyClass::Mutation).await;

    let project = state.project_repo.update(id, patch).await?;
    response::mutation(
        vec![project],
        false,
        &plan.select,
        Preferences::from_headers(&headers),
        StatusCode::OK,
    )
}

/// 删除项目，不影响引用它的任务
pub async fn delete_project(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<Project>(&params, &headers)?;
    let id = plan.target_id()?;
    state.pause(LatencyClass::Mutation).await;

    state.project_repo.delete(id).await?;
    Ok(response::no_content())
}
