//! Request metrics middleware

use axum::extract::{MatchedPath, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;

use common::utils::timed;

use crate::routes::AppState;

/// Reports method, matched route, status code and latency of every request
///
/// Installed as a route layer, so the route template (`/models/:model_name`)
/// is recorded rather than the raw path.
pub async fn record_request_metrics<B>(
    State(state): State<AppState>,
    request: Request<B>,
    next: Next<B>,
) -> Response {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let (response, elapsed) = timed(next.run(request)).await;
    state
        .metrics
        .record_http_request(&method, &route, response.status().as_u16(), elapsed);

    response
}
