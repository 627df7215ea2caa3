use axum::{
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;

use crate::state::AppState;

pub mod restaurants;

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(cors: CorsLayer, state: AppState) -> Router {
    let api = Router::new()
        .route("/", get(restaurants::config_echo))
        .route("/health", get(health))
        .route("/restaurants", post(restaurants::create_restaurant))
        .route("/restaurants/rating", post(restaurants::submit_rating))
        .route(
            "/restaurants/:name",
            get(restaurants::get_restaurant).delete(restaurants::delete_restaurant),
        )
        .route("/restaurants/cuisine/:cuisine", get(restaurants::top_by_cuisine))
        .route("/restaurants/region/:region", get(restaurants::top_by_region))
        .route(
            "/restaurants/region/:region/cuisine/:cuisine",
            get(restaurants::top_by_region_cuisine),
        )
        .with_state(state);

    api.layer(cors).layer(
        TraceLayer::new_for_http()
            .make_span_with(
                DefaultMakeSpan::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_request(
                DefaultOnRequest::new()
                    .level(Level::INFO),
            )
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .include_headers(false),
            )
            .on_failure(
                DefaultOnFailure::new()
                    .level(Level::ERROR),
            ),
    )
}
