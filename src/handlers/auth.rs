use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};

use crate::auth::gate::bearer_token;
use crate::error::AppError;
use crate::models::LoginRequest;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/validate", get(validate_token))
}

async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let response = state.auth_service.login(&request).await?;
    let status = if response.token.is_some() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };
    Ok((status, Json(response)))
}

async fn logout(State(state): State<AppState>) -> &'static str {
    state.auth_service.logout();
    "Logged out successfully"
}

async fn validate_token(State(state): State<AppState>, headers: HeaderMap) -> Json<bool> {
    let valid = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(|token| state.auth_service.is_valid_token(token))
        .unwrap_or(false);
    Json(valid)
}
