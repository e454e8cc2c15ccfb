//! 请求解析：查询计划、偏好头、请求体

use axum::body::Bytes;
use axum::http::{header, HeaderMap};
use serde::de::DeserializeOwned;
use serde_json::Value;

use dispatch_core::DispatchError;
use dispatch_domain::query::{QueryPlan, Record};

use crate::error::ApiResult;

/// 单对象响应的媒体类型
pub const OBJECT_MEDIA_TYPE: &str = "application/vnd.pgrst.object+json";

/// 查询参数，保留顺序与重复项
pub type QueryPairs = Vec<(String, String)>;

/// 由 `Accept` / `Prefer` 请求头决定的响应形式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    /// 返回单个对象而不是数组
    pub single_object: bool,
    /// `Prefer: return=minimal`，变更请求不返回记录
    pub return_minimal: bool,
}

impl Preferences {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let single_object = headers
            .get_all(header::ACCEPT)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .any(|value| value.contains(OBJECT_MEDIA_TYPE));

        let return_minimal = headers
            .get_all("prefer")
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(|value| value.split(','))
            .any(|item| item.trim() == "return=minimal");

        Self {
            single_object,
            return_minimal,
        }
    }
}

/// 从查询参数和 `Range` 请求头构造查询计划
pub fn plan_for<R: Record>(params: &[(String, String)], headers: &HeaderMap) -> ApiResult<QueryPlan> {
    let range = headers
        .get(header::RANGE)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| DispatchError::InvalidRange("Range 请求头不是合法的 ASCII".to_string()))
        })
        .transpose()?;
    Ok(QueryPlan::parse::<R>(params, range)?)
}

/// 解析 JSON 请求体
pub fn json_body(body: &Bytes) -> ApiResult<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DispatchError::InvalidBody("请求体为空".to_string()).into());
    }
    serde_json::from_slice(body).map_err(|e| DispatchError::InvalidBody(e.to_string()).into())
}

/// 将 JSON 值转换为具体的请求类型
pub fn decode<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    serde_json::from_value(value).map_err(|e| DispatchError::InvalidBody(e.to_string()).into())
}

/// 请求体可以是单个对象或对象数组
pub fn decode_one_or_many<T: DeserializeOwned>(body: &Bytes) -> ApiResult<(Vec<T>, bool)> {
    match json_body(body)? {
        Value::Array(items) => {
            let decoded = items
                .into_iter()
                .map(decode::<T>)
                .collect::<ApiResult<Vec<_>>>()?;
            Ok((decoded, true))
        }
        value @ Value::Object(_) => Ok((vec![decode(value)?], false)),
        _ => Err(DispatchError::InvalidBody("请求体必须是 JSON 对象或数组".to_string()).into()),
    }
}
