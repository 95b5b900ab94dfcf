//! Request logging stage
//!
//! Built on tower-http's `TraceLayer`: the span carries method and path,
//! status and elapsed time are recorded onto it when the response is ready,
//! and exactly one event is emitted at that point.

use std::time::Duration;

use axum::extract::Request;
use axum::response::Response;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::TraceLayer;
use tracing::Span;

/// Concrete layer type produced by [`layer`].
pub type LoggingLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request) -> Span,
    (),
    fn(&Response, Duration, &Span),
    (),
    (),
    (),
>;

/// Build the logging layer.
pub fn layer() -> LoggingLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_span as fn(&Request) -> Span)
        .on_request(())
        .on_response(on_response as fn(&Response, Duration, &Span))
        .on_body_chunk(())
        .on_eos(())
        .on_failure(())
}

fn make_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
        status = tracing::field::Empty,
        elapsed_ms = tracing::field::Empty,
    )
}

fn on_response(response: &Response, latency: Duration, span: &Span) {
    let status = response.status().as_u16();
    let elapsed_ms = latency.as_millis() as u64;
    span.record("status", status);
    span.record("elapsed_ms", elapsed_ms);

    tracing::info!(status, elapsed_ms, "request completed");
}
