use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::warn;
use uuid::Uuid;

use crate::auth::jwt::{Claims, JwtKeys, TokenKind};
use crate::auth::repo::BlockedToken;
use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(parts: &Parts) -> Result<&str, ApiError> {
    let auth = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(ApiError::MissingToken)?;

    // A non-Bearer scheme means no token was presented at all.
    auth.strip_prefix("Bearer ")
        .or_else(|| auth.strip_prefix("bearer "))
        .ok_or(ApiError::MissingToken)
}

/// Verified claims of either token kind, checked against the blocklist.
///
/// Logout accepts both kinds and refresh needs the raw claims, so this is
/// the common extractor; `AuthUser` narrows it to access tokens.
#[derive(Debug)]
pub struct BearerClaims(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for BearerClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token)?;

        if BlockedToken::contains(&state.db, claims.jti).await? {
            warn!(user_id = %claims.sub, jti = %claims.jti, "revoked token presented");
            return Err(ApiError::TokenRevoked);
        }

        Ok(BearerClaims(claims))
    }
}

/// Extracts a validated access token, returning the caller's user ID.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let BearerClaims(claims) = BearerClaims::from_request_parts(parts, state).await?;
        if claims.kind != TokenKind::Access {
            return Err(ApiError::InvalidToken);
        }
        Ok(AuthUser(claims.sub))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::test_support::fake_state;
    use axum::http::Request;

    fn parts_with_auth(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/api/profile");
        if let Some(v) = value {
            builder = builder.header(axum::http::header::AUTHORIZATION, v);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[tokio::test]
    async fn missing_header_is_missing_token() {
        let state = fake_state();
        let mut parts = parts_with_auth(None);
        let err = BearerClaims::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn non_bearer_scheme_is_missing_token() {
        let state = fake_state();
        let mut parts = parts_with_auth(Some("Basic dXNlcjpwYXNz"));
        let err = BearerClaims::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::MissingToken));
    }

    #[tokio::test]
    async fn garbage_bearer_token_is_invalid() {
        let state = fake_state();
        let mut parts = parts_with_auth(Some("Bearer not.a.jwt"));
        let err = BearerClaims::from_request_parts(&mut parts, &state)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidToken));
    }
}
