use axum::{Router, routing::get};

use crate::{
    http::handlers::{
        export_ratings_handler, get_stats_handler, list_ratings_handler, submit_rating_handler,
    },
    state::AppState,
};

pub fn create_http_routes(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/ratings",
            get(list_ratings_handler).post(submit_rating_handler),
        )
        .route("/api/ratings/stats", get(get_stats_handler))
        .route("/api/ratings/export", get(export_ratings_handler))
        .with_state(state)
}
