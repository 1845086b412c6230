use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn metrics() -> Response {
    let version = env!("CARGO_PKG_VERSION");
    let body = format!(
        "# HELP pantrychef_up Whether the service is up\n\
         # TYPE pantrychef_up gauge\n\
         pantrychef_up 1\n\
         # HELP pantrychef_info Service information\n\
         # TYPE pantrychef_info gauge\n\
         pantrychef_info{{version=\"{}\"}} 1\n",
        version
    );
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

pub fn router() -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
}
