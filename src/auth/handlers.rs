use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{
            AuthResponse, LoginRequest, MessageResponse, RefreshResponse, RegisterRequest,
            TokenPair,
        },
        extractors::BearerClaims,
        jwt::{JwtKeys, TokenKind},
        password::{hash_password, verify_password},
        repo::{BlockedToken, User},
        services::{is_valid_email, non_empty},
    },
    error::ApiError,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/refresh", post(refresh))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let (username, email, password) = match (
        non_empty(payload.username),
        non_empty(payload.email),
        non_empty(payload.password),
    ) {
        (Some(u), Some(e), Some(p)) => (u, e, p),
        _ => {
            return Err(ApiError::Validation(
                "Username, email, and password are required".into(),
            ))
        }
    };

    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(ApiError::Validation("Invalid email format".into()));
    }

    if password.len() < 8 {
        warn!("password too short");
        return Err(ApiError::Validation(
            "Password must be at least 8 characters long".into(),
        ));
    }

    if User::find_by_username(&state.db, &username).await?.is_some() {
        warn!(username = %username, "username already registered");
        return Err(ApiError::Validation("Username already in use".into()));
    }

    if User::find_by_email(&state.db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Validation("Email already in use".into()));
    }

    let hash = hash_password(&password)?;
    let user = User::create(&state.db, &username, &email, &hash).await?;

    let keys = JwtKeys::from_ref(&state);
    let access = keys.sign_access(user.id)?;
    let refresh = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token: TokenPair { access, refresh },
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let (username, password) = match (non_empty(payload.username), non_empty(payload.password)) {
        (Some(u), Some(p)) => (u, p),
        _ => {
            return Err(ApiError::Validation(
                "Username and password are required".into(),
            ))
        }
    };

    let user = User::find_by_username(&state.db, &username).await?;
    let user = match user {
        Some(u) if verify_password(&password, &u.password_hash)? => u,
        _ => {
            warn!(username = %username, "login rejected");
            return Err(ApiError::Forbidden("Invalid username or password".into()));
        }
    };

    let keys = JwtKeys::from_ref(&state);
    let access = keys.sign_access(user.id)?;
    let refresh = keys.sign_refresh(user.id)?;

    info!(user_id = %user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token: TokenPair { access, refresh },
    }))
}

/// Revokes exactly the token presented, access or refresh.
#[instrument(skip(state, claims))]
pub async fn logout(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
) -> Result<Json<MessageResponse>, ApiError> {
    BlockedToken::insert(&state.db, claims.jti).await?;
    info!(user_id = %claims.sub, jti = %claims.jti, kind = ?claims.kind, "token revoked");
    Ok(Json(MessageResponse {
        message: format!("{} token revoked successfully", claims.kind),
    }))
}

/// Mints a new access token; the refresh token itself is left untouched.
#[instrument(skip(state, claims))]
pub async fn refresh(
    State(state): State<AppState>,
    BearerClaims(claims): BearerClaims,
) -> Result<Json<RefreshResponse>, ApiError> {
    if claims.kind != TokenKind::Refresh {
        return Err(ApiError::InvalidToken);
    }
    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign_access(claims.sub)?;
    Ok(Json(RefreshResponse { access_token }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::Claims;
    use crate::state::test_support::fake_state;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn register_payload(
        username: Option<&str>,
        email: Option<&str>,
        password: Option<&str>,
    ) -> RegisterRequest {
        RegisterRequest {
            username: username.map(Into::into),
            email: email.map(Into::into),
            password: password.map(Into::into),
        }
    }

    async fn register_err(payload: RegisterRequest) -> ApiError {
        register(State(fake_state()), Json(payload))
            .await
            .unwrap_err()
    }

    #[tokio::test]
    async fn register_requires_all_fields() {
        for payload in [
            register_payload(None, Some("u1@x.com"), Some("longpass1")),
            register_payload(Some("u1"), None, Some("longpass1")),
            register_payload(Some("u1"), Some("u1@x.com"), None),
            register_payload(Some(""), Some("u1@x.com"), Some("longpass1")),
        ] {
            let err = register_err(payload).await;
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), "Username, email, and password are required");
        }
    }

    #[tokio::test]
    async fn register_rejects_malformed_email() {
        let err = register_err(register_payload(
            Some("u1"),
            Some("not-an-email"),
            Some("longpass1"),
        ))
        .await;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Invalid email format");
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let err = register_err(register_payload(
            Some("u1"),
            Some("u1@x.com"),
            Some("short1"),
        ))
        .await;
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.to_string(),
            "Password must be at least 8 characters long"
        );
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        for (username, password) in [(None, Some("longpass1")), (Some("u1"), None)] {
            let payload = LoginRequest {
                username: username.map(str::to_string),
                password: password.map(str::to_string),
            };
            let err = login(State(fake_state()), Json(payload)).await.unwrap_err();
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
            assert_eq!(err.to_string(), "Username and password are required");
        }
    }

    #[tokio::test]
    async fn refresh_rejects_access_token_claims() {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4(),
            jti: Uuid::new_v4(),
            iat: now,
            exp: now + 300,
            iss: "test".into(),
            aud: "test-users".into(),
            kind: TokenKind::Access,
        };
        let err = refresh(State(fake_state()), BearerClaims(claims))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }
}
