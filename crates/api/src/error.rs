use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dispatch_core::DispatchError;
use serde_json::json;
use tracing::{error, warn};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Dispatch(#[from] DispatchError),

    /// 请求单个对象（`Accept: application/vnd.pgrst.object+json`）但结果不是恰好一行
    #[error("请求单个对象，但结果有 {rows} 行")]
    NotAcceptable { rows: usize },

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("路由不存在: {0}")]
    RouteNotFound(String),
}

impl ApiError {
    pub fn bad_request<S: Into<String>>(msg: S) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Dispatch(DispatchError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Dispatch(err) if err.is_client_error() => StatusCode::BAD_REQUEST,
            ApiError::Dispatch(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotAcceptable { .. } => StatusCode::NOT_ACCEPTABLE,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RouteNotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, details, hint) = match &self {
            ApiError::Dispatch(DispatchError::MissingFilter { field }) => (
                "PGRST100",
                format!("Missing required filter on \"{field}\""),
                Some(format!("缺少 {field}=eq.<value> 过滤条件")),
                Some("变更和删除请求必须用 id=eq.<id> 指定目标记录".to_string()),
            ),
            ApiError::Dispatch(DispatchError::InvalidFilter { field, raw, reason }) => (
                "PGRST100",
                format!("\"failed to parse filter ({field}={raw})\""),
                Some(reason.clone()),
                Some("过滤条件格式为 <column>=<operator>.<value>，例如 status=eq.ready".to_string()),
            ),
            ApiError::Dispatch(DispatchError::UnknownColumn { resource, column }) => (
                "42703",
                format!("column {resource}.{column} does not exist"),
                None,
                None,
            ),
            ApiError::Dispatch(DispatchError::InvalidOrder(detail)) => (
                "PGRST100",
                "\"failed to parse order\"".to_string(),
                Some(detail.clone()),
                Some("排序格式为 order=<column>.asc 或 order=<column>.desc".to_string()),
            ),
            ApiError::Dispatch(DispatchError::InvalidRange(detail)) => (
                "PGRST103",
                "Requested range not satisfiable".to_string(),
                Some(detail.clone()),
                Some("Range 请求头格式为 <start>-<end>，例如 0-24".to_string()),
            ),
            ApiError::Dispatch(DispatchError::InvalidBody(detail)) => (
                "PGRST102",
                "Invalid request body".to_string(),
                Some(detail.clone()),
                None,
            ),
            ApiError::Dispatch(DispatchError::NotFound { resource, id }) => (
                "PGRST116",
                format!("No {resource} row matches id {id}"),
                Some("The result contains 0 rows".to_string()),
                None,
            ),
            ApiError::Dispatch(internal) => (
                "XX000",
                "Internal server error".to_string(),
                Some(internal.to_string()),
                None,
            ),
            ApiError::NotAcceptable { rows } => (
                "PGRST116",
                "JSON object requested, multiple (or no) rows returned".to_string(),
                Some(format!("The result contains {rows} rows")),
                None,
            ),
            ApiError::BadRequest(msg) => ("PGRST100", msg.clone(), None, None),
            ApiError::RouteNotFound(path) => (
                "PGRST125",
                format!("Invalid path specified in request URL: {path}"),
                None,
                None,
            ),
        };

        if status.is_server_error() {
            error!(code, %message, "Request failed");
        } else {
            warn!(code, status = status.as_u16(), %message, "Request rejected");
        }

        let short = match &self {
            ApiError::Dispatch(err) => err.user_message().to_string(),
            ApiError::NotAcceptable { .. } => "结果行数与请求不符".to_string(),
            ApiError::BadRequest(_) => "请求格式有误".to_string(),
            ApiError::RouteNotFound(_) => "请求的资源不存在".to_string(),
        };

        let body = Json(json!({
            "code": code,
            "message": message,
            "details": details,
            "hint": hint,
            "error": short,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
