use axum::{extract::DefaultBodyLimit, middleware, Router};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::auth::gate;
use crate::handlers::{auth, car, health};
use crate::state::AppState;

/// Above the 10MB image cap so oversize uploads reach validation and come
/// back as a 400 instead of a bare 413.
const MAX_REQUEST_BODY_BYTES: usize = 12 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/auth", auth::router())
        .nest("/api/cars", car::router())
        .nest("/api", health::router())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn_with_state(state.clone(), gate::authenticate))
                .layer(middleware::from_fn(gate::authorize)),
        )
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}
