//! HTTP server implementation using axum.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use v7mon_api::ApiClient;
use v7mon_auth::{AuthClient, AuthError};

use crate::config::{DashboardConfig, PollerConfig};
use crate::poller::run_poller;
use crate::state::SessionRegistry;

/// Session cookie name.
const SESSION_COOKIE: &str = "v7mon_session";

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub registry: SessionRegistry,
    pub auth_client: Arc<AuthClient>,
    pub api_client: Arc<ApiClient>,
    pub poller: PollerConfig,
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/snapshot", get(get_snapshot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the dashboard page.
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

/// Login request body. Zeroized on drop so the secret does not linger in
/// memory after the exchange.
#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
struct LoginForm {
    identifier: String,
    secret: String,
}

#[derive(Serialize)]
struct LoginBody {
    session_id: Uuid,
    email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    username: Option<String>,
}

/// Exchange credentials for a dashboard session.
async fn login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Response {
    let credential = match state.auth_client.login(&form.identifier, &form.secret).await {
        Ok(credential) => credential,
        Err(AuthError::InvalidCredentials) => {
            return error_response(StatusCode::UNAUTHORIZED, "Invalid credentials");
        }
        Err(AuthError::ServiceUnavailable(msg)) => {
            warn!(error = %msg, "Auth backend unavailable during login");
            return error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                "Service temporarily unavailable",
            );
        }
    };

    let Some((session_id, session)) = state.registry.create() else {
        warn!(
            sessions = state.registry.active_count(),
            "Session limit reached"
        );
        return error_response(StatusCode::SERVICE_UNAVAILABLE, "Too many active sessions");
    };
    session.auth().store(credential.clone());

    // One polling task per session; it stops when the session's token is
    // cancelled on logout or server shutdown.
    tokio::spawn(run_poller(
        session,
        state.auth_client.clone(),
        state.api_client.clone(),
        state.poller.clone(),
    ));

    info!(
        %session_id,
        sessions = state.registry.active_count(),
        "Session created"
    );

    let cookie = format!("{SESSION_COOKIE}={session_id}; Path=/; HttpOnly; SameSite=Lax");
    (
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(LoginBody {
            session_id,
            email: credential.email,
            username: credential.username,
        }),
    )
        .into_response()
}

/// End the session: stop its poller, drop the credential, tell the backend.
async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_id_from_headers(&headers)
        .and_then(|id| state.registry.remove(&id).map(|s| (id, s)));
    let Some((session_id, session)) = session else {
        return error_response(StatusCode::UNAUTHORIZED, "No active session");
    };

    if let Some(credential) = session.auth().credential() {
        state.auth_client.logout(&credential).await;
    }
    session.shutdown();
    info!(%session_id, "Session closed");

    (StatusCode::OK, Json(serde_json::json!({ "ok": true }))).into_response()
}

/// Latest snapshot for the calling session. Gated by the auth guard:
/// without a valid credential only the unauthenticated state is returned.
async fn get_snapshot(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = session_id_from_headers(&headers).and_then(|id| state.registry.get(&id));

    match session {
        Some(session) if session.auth().require_auth().is_some() => {
            Json(session.snapshot()).into_response()
        }
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "state": "unauthenticated" })),
        )
            .into_response(),
    }
}

/// Resolve the session id from the `X-Session-Id` header or the session
/// cookie.
fn session_id_from_headers(headers: &HeaderMap) -> Option<Uuid> {
    if let Some(value) = headers.get("x-session-id").and_then(|v| v.to_str().ok()) {
        if let Ok(id) = value.parse() {
            return Some(id);
        }
    }

    let cookies = headers.get(header::COOKIE)?.to_str().ok()?;
    cookies.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')?
            .parse()
            .ok()
    })
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

/// Run the dashboard HTTP server until the shutdown token fires.
pub async fn run_server(
    state: AppState,
    config: DashboardConfig,
    shutdown: CancellationToken,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let registry = state.registry.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(port = config.port, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    // No poller outlives the server.
    registry.shutdown_all();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(name: &'static str, value: String) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, value.parse().unwrap());
        headers
    }

    #[test]
    fn test_session_id_from_header() {
        let id = Uuid::new_v4();
        let headers = headers_with("x-session-id", id.to_string());
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_session_id_from_cookie() {
        let id = Uuid::new_v4();
        let headers = headers_with("cookie", format!("theme=dark; v7mon_session={id}"));
        assert_eq!(session_id_from_headers(&headers), Some(id));
    }

    #[test]
    fn test_missing_session_id() {
        assert_eq!(session_id_from_headers(&HeaderMap::new()), None);
        let headers = headers_with("cookie", "theme=dark".to_string());
        assert_eq!(session_id_from_headers(&headers), None);
    }

    #[test]
    fn test_garbage_session_id_ignored() {
        let headers = headers_with("x-session-id", "not-a-uuid".to_string());
        assert_eq!(session_id_from_headers(&headers), None);
    }
}
