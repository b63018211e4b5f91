use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Application routes, without the metrics and CORS layers added in `main`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/variables", get(handlers::variables::list_variables))
        .route("/templates", get(handlers::variables::list_templates))
        .route(
            "/page-info",
            get(handlers::page_info::get_page_info).post(handlers::page_info::extract_page_info),
        )
        .route("/render", post(handlers::render::render_template))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
