use std::net::SocketAddr;

use axum::http::{header, StatusCode};
use axum::middleware::{self, map_response};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::error::ApiError;
use crate::state::AppState;
use crate::{auth, comments, posts, profile, ratelimit};

pub fn build_app(state: AppState) -> Router {
    let api = Router::new()
        .merge(auth::router().route_layer(middleware::from_fn_with_state(
            state.clone(),
            ratelimit::limit_auth,
        )))
        .merge(posts::router().route_layer(middleware::from_fn_with_state(
            state.clone(),
            ratelimit::limit_posts,
        )))
        .merge(posts::search_router())
        .merge(profile::router())
        .merge(comments::router());

    Router::new()
        .nest("/api", api)
        .fallback(unknown_route)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
        .layer(map_response(json_method_not_allowed))
}

async fn unknown_route() -> ApiError {
    ApiError::NotFound("Resource not found".into())
}

/// Axum answers a wrong method with an empty 405; rewrite it into the same
/// `{"error": ...}` shape every other failure uses.
async fn json_method_not_allowed(res: Response) -> Response {
    if res.status() == StatusCode::METHOD_NOT_ALLOWED
        && !res.headers().contains_key(header::CONTENT_TYPE)
    {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(json!({ "error": "Method not allowed" })),
        )
            .into_response();
    }
    res
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "8080".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
