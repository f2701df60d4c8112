use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration. Fields are optional so missing ones
/// surface as a 400 with the expected message rather than a decode error.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Access/refresh pair issued on register and login.
#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Response returned after register or login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: TokenPair,
}

/// Response returned after token refresh.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Generic `{"message": ...}` body for logout and deletes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Public part of the user returned to the client.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_serializes_nested_token_pair() {
        let response = AuthResponse {
            message: "Login successful".into(),
            token: TokenPair {
                access: "a.b.c".into(),
                refresh: "d.e.f".into(),
            },
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["token"]["access"], "a.b.c");
        assert_eq!(json["token"]["refresh"], "d.e.f");
        assert_eq!(json["message"], "Login successful");
    }

    #[test]
    fn register_request_tolerates_missing_fields() {
        let req: RegisterRequest = serde_json::from_str(r#"{"username": "u1"}"#).unwrap();
        assert_eq!(req.username.as_deref(), Some("u1"));
        assert!(req.email.is_none());
        assert!(req.password.is_none());
    }
}
