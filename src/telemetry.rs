use std::time::Duration;

use axum::{
    body::Body,
    http::{Request, Response},
};
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};
use tracing::{field, Span};
use tracing_subscriber::EnvFilter;

use crate::config::{AppConfig, LogFormat};

pub fn init(config: &AppConfig) {
    let filter = EnvFilter::new(&config.log_filter);
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init(),
        LogFormat::Text => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}

type RequestSpan = fn(&Request<Body>) -> Span;
type ResponseLog = fn(&Response<Body>, Duration, &Span);

pub type HttpTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    RequestSpan,
    tower_http::trace::DefaultOnRequest,
    ResponseLog,
>;

/// One `http_request` span per request; the status is filled in on response.
pub fn http_trace_layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(request_span as RequestSpan)
        .on_response(log_response as ResponseLog)
}

fn request_span(req: &Request<Body>) -> Span {
    tracing::info_span!(
        "http_request",
        method = %req.method(),
        path = %req.uri().path(),
        status = field::Empty,
    )
}

fn log_response(res: &Response<Body>, latency: Duration, span: &Span) {
    let status = res.status();
    span.record("status", field::display(status));
    let latency_ms = latency.as_millis();
    if status.is_server_error() {
        tracing::error!(%status, latency_ms, "request failed");
    } else {
        tracing::info!(%status, latency_ms, "request served");
    }
}
