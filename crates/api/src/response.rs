use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use dispatch_domain::query::{ContentRange, Page, SelectSpec};

use crate::error::{ApiError, ApiResult};
use crate::request::Preferences;

fn project_rows<T: Serialize>(rows: Vec<T>, select: &SelectSpec) -> ApiResult<Vec<Value>> {
    rows.into_iter()
        .map(|row| {
            serde_json::to_value(row)
                .map(|value| select.project(value))
                .map_err(|e| ApiError::Dispatch(e.into()))
        })
        .collect()
}

fn with_content_range(mut response: Response, range: &ContentRange) -> Response {
    if let Ok(value) = HeaderValue::from_str(&range.to_string()) {
        response.headers_mut().insert(header::CONTENT_RANGE, value);
    }
    response
}

/// 读取响应：默认数组，请求单对象时必须恰好一行；总是带 `Content-Range`
pub fn rows<T: Serialize>(
    page: Page<T>,
    select: &SelectSpec,
    prefs: Preferences,
) -> ApiResult<Response> {
    let content_range = page.content_range;
    let mut values = project_rows(page.rows, select)?;

    let response = if prefs.single_object {
        if values.len() != 1 {
            return Err(ApiError::NotAcceptable { rows: values.len() });
        }
        Json(values.remove(0)).into_response()
    } else {
        Json(values).into_response()
    };

    Ok(with_content_range(response, &content_range))
}

/// 变更响应：请求体是数组时返回数组，否则返回单个对象
///
/// `Prefer: return=minimal` 时不返回记录，更新请求的状态码改为 204。
pub fn mutation<T: Serialize>(
    records: Vec<T>,
    many: bool,
    select: &SelectSpec,
    prefs: Preferences,
    status: StatusCode,
) -> ApiResult<Response> {
    if prefs.return_minimal {
        let status = if status == StatusCode::OK {
            StatusCode::NO_CONTENT
        } else {
            status
        };
        return Ok(status.into_response());
    }

    let mut values = project_rows(records, select)?;
    let body = if many {
        Value::Array(values)
    } else {
        values.pop().unwrap_or(Value::Null)
    };
    Ok((status, Json(body)).into_response())
}

pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use dispatch_core::models::DashboardStats;
    use dispatch_domain::query::Record;

    fn page(count: usize) -> Page<DashboardStats> {
        let rows = vec![DashboardStats::default(); count];
        Page {
            content_range: if count == 0 {
                ContentRange::Empty { total: 0 }
            } else {
                ContentRange::Window {
                    start: 0,
                    end: count - 1,
                    total: count,
                }
            },
            rows,
        }
    }

    #[tokio::test]
    async fn test_rows_sets_content_range() {
        let select = SelectSpec::everything::<DashboardStats>();
        let response = rows(page(2), &select, Preferences::default()).unwrap();
        assert_eq!(response.headers()[header::CONTENT_RANGE], "0-1/2");

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_single_object_requires_exactly_one_row() {
        let select = SelectSpec::everything::<DashboardStats>();
        let prefs = Preferences {
            single_object: true,
            ..Preferences::default()
        };
        assert!(rows(page(1), &select, prefs).is_ok());
        assert!(matches!(
            rows(page(0), &select, prefs),
            Err(ApiError::NotAcceptable { rows: 0 })
        ));
        assert!(matches!(
            rows(page(3), &select, prefs),
            Err(ApiError::NotAcceptable { rows: 3 })
        ));
        assert_eq!(DashboardStats::RESOURCE, "dashboard_stats");
    }

    #[test]
    fn test_minimal_mutation_has_no_body() {
        let select = SelectSpec::everything::<DashboardStats>();
        let prefs = Preferences {
            return_minimal: true,
            ..Preferences::default()
        };
        let created = mutation(vec![DashboardStats::default()], false, &select, prefs, StatusCode::CREATED)
            .unwrap();
        assert_eq!(created.status(), StatusCode::CREATED);
        let updated = mutation(vec![DashboardStats::default()], false, &select, prefs, StatusCode::OK)
            .unwrap();
        assert_eq!(updated.status(), StatusCode::NO_CONTENT);
    }
}
