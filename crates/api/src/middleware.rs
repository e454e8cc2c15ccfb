use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use dispatch_core::ApiConfig;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = std::time::Instant::now();

    let response = next.run(request).await;
    let elapsed = start.elapsed();

    info!(
        %method,
        %uri,
        status = response.status().as_u16(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Request handled"
    );

    response
}

/// 按配置构造 CORS 层，未启用时返回 `None`
///
/// 浏览器端需要读取 `Content-Range` 才能得到总条数，因此必须显式暴露。
pub fn cors_layer(config: &ApiConfig) -> Option<CorsLayer> {
    if !config.cors_enabled {
        return None;
    }

    let allow_origin = if config.cors_origins.iter().any(|origin| origin == "*") {
        AllowOrigin::from(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin) {
                Ok(value) => Some(value),
                Err(_) => {
                    warn!(%origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PATCH,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers(Any)
            .expose_headers([header::CONTENT_RANGE, HeaderName::from_static("range-unit")]),
    )
}

pub fn trace_layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cors_disabled() {
        let config = ApiConfig {
            cors_enabled: false,
            ..ApiConfig::default()
        };
        assert!(cors_layer(&config).is_none());
    }

    #[test]
    fn test_cors_with_explicit_origins() {
        let config = ApiConfig {
            cors_origins: vec!["http://localhost:5173".to_string(), "bad\norigin".to_string()],
            ..ApiConfig::default()
        };
        assert!(cors_layer(&config).is_some());
    }
}
