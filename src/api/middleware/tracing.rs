//! HTTP request/response tracing middleware.
//!
//! Spans are named after the matched route template (`/api/hotels/{id}`)
//! rather than the raw path, so hotel and room ids do not explode span
//! cardinality. Every response also feeds the
//! `http_request_duration_seconds` histogram.

use std::time::Duration;

use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnRequest, MakeSpan, OnResponse, TraceLayer};
use tracing::Span;

pub type HttpTraceLayer =
    TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RouteSpan, DefaultOnRequest, RecordLatency>;

/// Opens an `INFO` span carrying method and route template.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteSpan;

impl<B> MakeSpan<B> for RouteSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map(MatchedPath::as_str)
            .unwrap_or_else(|| request.uri().path());

        tracing::info_span!(
            "request",
            method = %request.method(),
            route = %route,
            version = ?request.version(),
        )
    }
}

/// Logs the outcome and records latency per status code.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordLatency;

impl<B> OnResponse<B> for RecordLatency {
    fn on_response(self, response: &Response<B>, latency: Duration, _span: &Span) {
        let status = response.status();
        let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);

        metrics::histogram!(
            "http_request_duration_seconds",
            "status" => status.as_u16().to_string()
        )
        .record(latency.as_secs_f64());

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), latency_ms, "Request failed");
        } else {
            tracing::info!(status = status.as_u16(), latency_ms, "Request finished");
        }
    }
}

/// Creates the tracing middleware for HTTP requests.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=GET route=/api/hotels/{id} version=HTTP/1.1}: Request finished status=200 latency_ms=4
/// ERROR request{method=POST route=/api/hotels/{id}/bookings version=HTTP/1.1}: Request failed status=502 latency_ms=812
/// ```
///
/// # Integration
///
/// ```rust,ignore
/// let app = Router::new()
///     .nest("/api", api::routes::routes(state.clone()))
///     .with_state(state)
///     .layer(tracing::layer());
/// ```
pub fn layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RouteSpan)
        .on_response(RecordLatency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn test_span_falls_back_to_raw_path() {
        let subscriber = tracing_subscriber::fmt().with_test_writer().finish();
        tracing::subscriber::with_default(subscriber, || {
            let request = Request::builder()
                .uri("/api/hotels/7")
                .body(Body::empty())
                .unwrap();
            let span = RouteSpan.make_span(&request);
            assert_eq!(span.metadata().map(|m| m.name()), Some("request"));
        });
    }
}
