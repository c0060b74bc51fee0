//! Router construction for the permit proxy.

use axum::{routing::post, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

use crate::routes;
use crate::state::ProxyState;

/// `/api` plus the static front end; `/` serves `index.html`.
pub fn build_router(state: ProxyState) -> Router {
    let static_files = ServeDir::new(&state.config.static_dir);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api", post(routes::api::forward))
        .fallback_service(static_files)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
