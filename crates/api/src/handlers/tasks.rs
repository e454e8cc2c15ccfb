use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::debug;

use dispatch_core::models::{NewTask, Task, TaskPatch};
use dispatch_core::LatencyClass;

use crate::error::ApiResult;
use crate::request::{decode, decode_one_or_many, json_body, plan_for, Preferences, QueryPairs};
use crate::response;
use crate::routes::AppState;

/// 获取任务列表
///
/// 未指定排序时保持集合顺序（新建任务在最前）；未指定 `select` 时嵌入项目快照。
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<Task>(&params, &headers)?;
    state.pause(LatencyClass::Read).await;

    let page = state.task_repo.list(&plan).await?;
    debug!(total = page.total(), "Tasks read");
    response::rows(page, &plan.select, Preferences::from_headers(&headers))
}

/// 创建任务，请求体为单个对象或对象数组
pub async fn create_task(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let plan = plan_for::<Task>(&params, &headers)?;
    let (inputs, many) = decode_one_or_many::<NewTask>(&body)?;
    state.pause(LatencyClass::Mutation).await;

    let mut created = Vec::with_capacity(inputs.len());
    for input in inputs {
        created.push(state.task_repo.create(input).await?);
    }

    response::mutation(
        created,
        many,
        &plan.select,
        Preferences::from_headers(&headers),
        StatusCode::CREATED,
    )
}

/// 更新任务，目标由 `id=eq.<id>` 指定
pub async fn update_task(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let plan = plan_for::<Task>(&params, &headers)?;
    let id = plan.target_id()?;
    let patch: TaskPatch = decode(json_body(&body)?)?;
    state.pause(LatencyClass::Mutation).await;

    let task = state.task_repo.update(id, patch).await?;
    response::mutation(
        vec![task],
        false,
        &plan.select,
        Preferences::from_headers(&headers),
        StatusCode::OK,
    )
}

/// 删除任务，目标不存在时同样返回 204
pub async fn delete_task(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let plan = plan_for::<Task>(&params, &headers)?;
    let id = plan.target_id()?;
    state.pause(LatencyClass::Mutation).await;

    state.task_repo.delete(id).await?;
    Ok(response::no_content())
}
