use std::{path::Path, sync::Arc};

use axum::{
    extract::{Query, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use feedrender_render::{HttpFeedSource, Pipeline};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, services::ServeDir, trace::TraceLayer};

use crate::middleware::{content_security_policy, frame_options, request_id, RequestId};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline<HttpFeedSource>>,
}

pub fn build_app(state: AppState, static_dir: &Path) -> Router {
    let trace = TraceLayer::new_for_http().make_span_with(|req: &Request| {
        let request_id = req
            .extensions()
            .get::<RequestId>()
            .map_or("", |id| id.0.as_str());
        tracing::info_span!(
            "http_request",
            method = %req.method(),
            uri = %req.uri(),
            request_id,
        )
    });

    Router::new()
        .route("/", get(render_feed))
        .route("/health", get(health))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(request_id))
                .layer(trace)
                .layer(content_security_policy())
                .layer(frame_options())
                .layer(CatchPanicLayer::new()),
        )
        .with_state(state)
}

/// Render the feed named by the `url` query parameter, or the landing page.
///
/// The query is taken as raw pairs so that repeated or unknown parameters
/// never reject the request; the first `url` wins.
async fn render_feed(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let url = first_param(params, "url");
    match state.pipeline.render(&url).await {
        Ok(page) => Html(page).into_response(),
        Err(e) => {
            tracing::error!(error = %e, url = %url, "page composition failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
        }
    }
}

fn first_param(params: Vec<(String, String)>, name: &str) -> String {
    params
        .into_iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value)
        .unwrap_or_default()
}

async fn health() -> &'static str {
    "."
}
