//! HTTP Middleware
//!
//! 请求日志中间件：记录 4xx/5xx 状态码与耗时

use std::time::Instant;

use axum::{
    extract::Request,
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};

/// 超过该耗时的请求记录为慢请求（分类服务推理通常较慢）
const SLOW_REQUEST_MS: u64 = 10_000;

/// HTTP 状态码错误日志中间件
///
/// 业务错误（errno != 0）在 ApiError::into_response() 中记录，
/// 这里只处理传输层状态码，例如请求体超过上限时的 413
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let content_length = request
        .headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok());
    let started = Instant::now();

    let response = next.run(request).await;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis() as u64;

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            elapsed_ms,
            "HTTP server error"
        );
    } else if status == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::warn!(
            method = %method,
            uri = %uri,
            content_length,
            "Upload rejected: body too large"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = status.as_u16(),
            "HTTP client error"
        );
    } else if elapsed_ms >= SLOW_REQUEST_MS {
        tracing::info!(method = %method, uri = %uri, elapsed_ms, "Slow request");
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, routing::post, Router};
    use tower::util::ServiceExt;

    fn create_test_router() -> Router {
        Router::new()
            .route("/api/analyze", post(|| async { "OK" }))
            .route(
                "/api/too-large",
                post(|| async { StatusCode::PAYLOAD_TOO_LARGE }),
            )
            .route(
                "/api/broken",
                post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
            )
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn post_to(uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_LENGTH, "4")
            .body(Body::from("RIFF"))
            .unwrap();
        create_test_router()
            .oneshot(request)
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_passes_responses_through_unchanged() {
        assert_eq!(post_to("/api/analyze").await, StatusCode::OK);
        assert_eq!(
            post_to("/api/too-large").await,
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            post_to("/api/broken").await,
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(post_to("/api/missing").await, StatusCode::NOT_FOUND);
    }
}
