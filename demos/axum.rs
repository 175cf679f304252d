//! Run with
//!
//! ```not_rust
//! cargo run --example axum
//!
//! TOKEN=$(curl -s -X POST -d alice http://127.0.0.1:4000/login)
//! curl -H "Authorization: Bearer $TOKEN" http://127.0.0.1:4000/
//! curl -X POST -H "Authorization: Bearer $TOKEN" http://127.0.0.1:4000/logout
//! ```

use std::time::Duration;

use axum::{
    Extension, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    routing::{get, post},
};
use jwtgate::{Authenticator, Config, extract_from_headers};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone)]
struct AppState {
    auth: Authenticator,
}

#[derive(Clone)]
struct Identity(String);

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jwtgate=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let signing_key =
        std::env::var("JWT_SIGNING_KEY").unwrap_or_else(|_| "change-me-in-production".into());
    let config = Config::builder(signing_key)
        .time_to_live(Duration::from_secs(15 * 60))
        .leeway(30)
        .build()
        .expect("invalid token configuration");

    let state = AppState {
        auth: Authenticator::new(config),
    };

    let protected = Router::new()
        .route("/", get(handler))
        .route("/logout", post(logout))
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_middleware,
        ));

    let app = Router::new()
        .route("/login", post(login))
        .merge(protected)
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:4000")
        .await
        .unwrap();
    tracing::debug!("listening on {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.unwrap();
}

async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    tracing::debug!("Validating JWT token");

    let token = extract_from_headers(request.headers(), state.auth.config()).map_err(|_| {
        tracing::warn!("Missing Authorization header");
        StatusCode::UNAUTHORIZED
    })?;

    let user: String = state.auth.validate_as(token).map_err(|e| {
        tracing::warn!("JWT validation failed: {:?}", e);
        StatusCode::UNAUTHORIZED
    })?;
    request.extensions_mut().insert(Identity(user));

    Ok(next.run(request).await)
}

async fn login(State(state): State<AppState>, user: String) -> Result<String, StatusCode> {
    let user = user.trim().to_string();
    if user.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    state.auth.issue(&user).map_err(|e| {
        tracing::error!("failed to issue token: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

async fn logout(State(state): State<AppState>, request: Request) -> StatusCode {
    match extract_from_headers(request.headers(), state.auth.config()) {
        Ok(token) => match state.auth.revoke(token) {
            Ok(()) => StatusCode::NO_CONTENT,
            Err(e) => {
                tracing::error!("failed to revoke token: {e}");
                StatusCode::SERVICE_UNAVAILABLE
            }
        },
        Err(_) => StatusCode::UNAUTHORIZED,
    }
}

async fn handler(Extension(Identity(user)): Extension<Identity>) -> String {
    format!("Hello, World! You are authorized: {user}")
}
