use serde::{Deserialize, Serialize};

use crate::models::Role;

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// On success carries the token and identity; on failure only `message` is
/// set and the handler maps the response to a 400.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    pub message: String,
}

impl LoginResponse {
    pub fn success(token: String, username: String, role: Role) -> Self {
        Self {
            token: Some(token),
            username: Some(username),
            role: Some(role),
            message: "Login successful".to_string(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            token: None,
            username: None,
            role: None,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_response_omits_token_and_identity() {
        let body = serde_json::to_value(LoginResponse::failure("Invalid username or password"))
            .unwrap();
        assert!(body.get("token").is_none());
        assert!(body.get("username").is_none());
        assert!(body.get("role").is_none());
        assert_eq!(body["message"], "Invalid username or password");
    }

    #[test]
    fn success_response_carries_token_and_role() {
        let body = serde_json::to_value(LoginResponse::success(
            "tok".to_string(),
            "admin".to_string(),
            Role::Admin,
        ))
        .unwrap();
        assert_eq!(body["token"], "tok");
        assert_eq!(body["username"], "admin");
        assert_eq!(body["role"], "ADMIN");
        assert_eq!(body["message"], "Login successful");
    }
}
