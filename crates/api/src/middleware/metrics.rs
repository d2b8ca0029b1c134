//! Prometheus metrics for HTTP traffic and spend cap evaluations.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use domain::errors::SpendLimitError;
use domain::services::Evaluation;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use std::time::Instant;

static RECORDER: OnceLock<PrometheusHandle> = OnceLock::new();

/// Checkout calls sit on the storefront's critical path, so the low buckets are dense.
const LATENCY_BUCKETS: &[f64] = &[0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5];

const SCRAPE_PATH: &str = "/metrics";

/// Counts requests in `http_requests_total{method, route, status_class}` and
/// times them in `http_request_duration_seconds{method, route}`.
///
/// Routes are labelled by their template so customer ids never become label
/// values. Scrapes of the metrics endpoint are not recorded.
pub async fn metrics_middleware(req: Request<Body>, next: Next) -> Response {
    let route = match req.extensions().get::<MatchedPath>() {
        Some(matched) if matched.as_str() == SCRAPE_PATH => return next.run(req).await,
        Some(matched) => matched.as_str().to_owned(),
        None => "unmatched".to_owned(),
    };
    let method = req.method().as_str().to_owned();
    let started = Instant::now();

    let response = next.run(req).await;

    let status_class = status_class(response.status());
    histogram!(
        "http_request_duration_seconds",
        "method" => method.clone(),
        "route" => route.clone()
    )
    .record(started.elapsed().as_secs_f64());
    counter!(
        "http_requests_total",
        "method" => method,
        "route" => route,
        "status_class" => status_class
    )
    .increment(1);

    response
}

fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Counts one evaluation in `spend_limit_evaluations_total{outcome}`.
pub fn record_spend_evaluation(result: &Result<Evaluation, SpendLimitError>) {
    let outcome = match result {
        Ok(evaluation) => evaluation.outcome(),
        Err(_) => "error",
    };
    counter!("spend_limit_evaluations_total", "outcome" => outcome).increment(1);
}

/// GET /metrics in Prometheus text format.
pub async fn metrics_handler() -> Response {
    let Some(handle) = RECORDER.get() else {
        return (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response();
    };
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    )
        .into_response()
}

/// Installs the global recorder. Repeated calls keep the first one.
pub fn init_metrics() -> Result<(), BuildError> {
    if RECORDER.get().is_none() {
        let handle = PrometheusBuilder::new()
            .set_buckets(LATENCY_BUCKETS)?
            .install_recorder()?;
        let _ = RECORDER.set(handle);
    }
    Ok(())
}
