//! 认证形状的端点
//!
//! 任何格式正确的凭据都会成功，返回配置好的合成身份。

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use tracing::info;

use dispatch_core::models::{AuthUser, Credentials, RefreshRequest, Session};
use dispatch_core::LatencyClass;

use crate::error::{ApiError, ApiResult};
use crate::request::{decode, json_body};
use crate::routes::AppState;
use crate::session::Grant;

#[derive(Debug, Deserialize)]
pub struct TokenParams {
    pub grant_type: Option<String>,
}

/// `POST /auth/v1/token?grant_type=password|refresh_token`
pub async fn token(
    State(state): State<AppState>,
    Query(params): Query<TokenParams>,
    body: Bytes,
) -> ApiResult<Json<Session>> {
    let raw = params
        .grant_type
        .ok_or_else(|| ApiError::bad_request("缺少 grant_type 参数"))?;
    let grant = Grant::parse(&raw)
        .ok_or_else(|| ApiError::bad_request(format!("不支持的 grant_type: {raw}")))?;

    let body = json_body(&body)?;
    match grant {
        Grant::Password => {
            let credentials: Credentials = decode(body)?;
            state.pause(LatencyClass::Auth).await;
            info!(email = %credentials.email, "Signed in");
        }
        Grant::RefreshToken => {
            let _: RefreshRequest = decode(body)?;
            state.pause(LatencyClass::Refresh).await;
        }
    }

    Ok(Json(state.sessions.issue(grant)))
}

/// 注册只返回用户信息，不建立会话
pub async fn sign_up(State(state): State<AppState>, body: Bytes) -> ApiResult<Json<AuthUser>> {
    let credentials: Credentials = decode(json_body(&body)?)?;
    state.pause(LatencyClass::Auth).await;
    info!(email = %credentials.email, "Signed up");
    Ok(Json(state.sessions.user()))
}

pub async fn logout(State(state): State<AppState>) -> Response {
    state.sessions.sign_out();
    info!("Signed out");
    StatusCode::NO_CONTENT.into_response()
}

pub async fn current_user(State(state): State<AppState>) -> Json<AuthUser> {
    Json(state.sessions.user())
}
