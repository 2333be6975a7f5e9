use axum::http::Method;

use crate::auth::Identity;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Authenticated,
    Admin,
}

struct Rule {
    method: Method,
    pattern: &'static str,
    access: Access,
}

/// Ordered route table: the first matching rule wins, and anything the table
/// does not name requires some authenticated identity.
static RULES: &[Rule] = &[
    Rule { method: Method::GET, pattern: "/api/health", access: Access::Public },
    Rule { method: Method::POST, pattern: "/api/auth/login", access: Access::Public },
    Rule { method: Method::GET, pattern: "/api/cars", access: Access::Public },
    Rule { method: Method::GET, pattern: "/api/cars/search", access: Access::Public },
    Rule { method: Method::GET, pattern: "/api/cars/brands", access: Access::Public },
    Rule { method: Method::GET, pattern: "/api/cars/fuel-types", access: Access::Public },
    Rule { method: Method::GET, pattern: "/api/cars/{id}", access: Access::Public },
    Rule { method: Method::POST, pattern: "/api/cars", access: Access::Admin },
    Rule { method: Method::PUT, pattern: "/api/cars/{id}", access: Access::Admin },
    Rule { method: Method::DELETE, pattern: "/api/cars/{id}", access: Access::Admin },
    Rule { method: Method::POST, pattern: "/api/cars/{id}/gallery", access: Access::Admin },
    Rule { method: Method::DELETE, pattern: "/api/cars/{id}/gallery", access: Access::Admin },
];

pub fn required_access(method: &Method, path: &str) -> Access {
    RULES
        .iter()
        .find(|rule| rule.method == *method && matches_pattern(rule.pattern, path))
        .map(|rule| rule.access)
        .unwrap_or(Access::Authenticated)
}

pub fn check(identity: &Identity, access: Access) -> Result<(), AppError> {
    match access {
        Access::Public => Ok(()),
        Access::Authenticated => {
            if identity.is_anonymous() {
                Err(AppError::Unauthorized)
            } else {
                Ok(())
            }
        }
        Access::Admin => match identity {
            Identity::Admin { .. } => Ok(()),
            Identity::Anonymous => Err(AppError::Unauthorized),
            Identity::User { .. } => {
                Err(AppError::Forbidden("Admin role required".to_string()))
            }
        },
    }
}

/// Segment-wise match; a `{name}` segment matches exactly one non-empty
/// path segment.
fn matches_pattern(pattern: &str, path: &str) -> bool {
    let mut pattern_segments = pattern.split('/');
    let mut path_segments = path.split('/');

    loop {
        match (pattern_segments.next(), path_segments.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) => {
                let wildcard = p.starts_with('{') && p.ends_with('}');
                if wildcard {
                    if s.is_empty() {
                        return false;
                    }
                } else if p != s {
                    return false;
                }
            }
            _ => return false,
        }
    }
}
