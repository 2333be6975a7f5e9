use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::auth::{policy, JwtService};
use crate::models::Role;
use crate::state::AppState;

/// Request-scoped identity established by the gate and carried in request
/// extensions. An invalid or missing token is silently downgraded to
/// `Anonymous` here; rejection is the policy's job, not the gate's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { username: String },
    Admin { username: String },
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Identity::Admin { .. })
    }

    pub fn from_token(jwt: &JwtService, token: &str) -> Identity {
        match jwt.claims(token) {
            Some(claims) => match Role::parse(&claims.role) {
                Some(Role::Admin) => Identity::Admin { username: claims.sub },
                // Valid token with a non-admin (or unrecognized) role claim.
                _ => Identity::User { username: claims.sub },
            },
            None => Identity::Anonymous,
        }
    }
}

/// Strips the bearer prefix from an `Authorization` header value.
pub fn bearer_token(value: &str) -> Option<&str> {
    let token = value.strip_prefix("Bearer ")?;
    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}

/// Runs once per request, ahead of any authorization check: resolve the
/// caller's identity from the bearer token and stash it in extensions.
pub async fn authenticate(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let identity = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(|token| Identity::from_token(&state.jwt, token))
        .unwrap_or(Identity::Anonymous);

    req.extensions_mut().insert(identity);
    next.run(req).await
}

/// Evaluates the static policy table against the established identity.
pub async fn authorize(req: Request, next: Next) -> Response {
    let identity = req
        .extensions()
        .get::<Identity>()
        .cloned()
        .unwrap_or(Identity::Anonymous);
    let access = policy::required_access(req.method(), req.uri().path());

    match policy::check(&identity, access) {
        Ok(()) => next.run(req).await,
        Err(err) => err.into_response(),
    }
}
