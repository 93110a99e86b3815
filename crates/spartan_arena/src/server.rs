//! JSON API over a running session.

use crate::runtime::{ClickOutcome, SessionClosed, SessionHandle};
use crate::session::SessionSnapshot;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use spartan_tictactoe::Objective;
use tower::ServiceBuilder;
use tracing::{info, instrument, warn};

/// Body of `POST /api/move`.
///
/// The index is kept as raw JSON so that negative, fractional, or
/// non-numeric values are refused like any other invalid click.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MoveBody {
    /// Cell index, 0 to 8.
    #[serde(default)]
    pub index: serde_json::Value,
}

impl MoveBody {
    /// The index as a cell number, if it is a non-negative integer.
    pub fn cell_index(&self) -> Option<usize> {
        self.index.as_u64().and_then(|i| usize::try_from(i).ok())
    }
}

/// Session runtime unavailable.
#[derive(Debug)]
pub struct ApiError(SessionClosed);

impl From<SessionClosed> for ApiError {
    fn from(e: SessionClosed) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(error = %self.0, "Request against stopped session");
        (StatusCode::SERVICE_UNAVAILABLE, self.0.to_string()).into_response()
    }
}

/// Builds the API router.
pub fn router(handle: SessionHandle) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/state", get(state))
        .route("/api/move", post(make_move))
        .route("/api/reset", post(reset))
        .route("/api/objectives", get(objectives))
        .layer(ServiceBuilder::new().map_request(|req: Request<Body>| {
            info!(method = %req.method(), uri = %req.uri(), "Incoming HTTP request");
            req
        }))
        .with_state(handle)
}

/// Binds `host:port` and serves until the listener fails.
#[instrument(skip(handle))]
pub async fn serve(handle: SessionHandle, host: String, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("Arena ready at http://{}:{}/", host, port);
    axum::serve(listener, router(handle)).await?;
    Ok(())
}

async fn health() -> &'static str {
    "ok"
}

async fn state(State(handle): State<SessionHandle>) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(handle.snapshot().await?))
}

async fn make_move(
    State(handle): State<SessionHandle>,
    Json(body): Json<MoveBody>,
) -> Result<Json<ClickOutcome>, ApiError> {
    let Some(index) = body.cell_index() else {
        info!(index = %body.index, "Move index is not a cell");
        return Ok(Json(ClickOutcome {
            accepted: false,
            snapshot: handle.snapshot().await?,
        }));
    };
    let outcome = handle.click(index).await?;
    if !outcome.accepted {
        info!(index, "Move not accepted");
    }
    Ok(Json(outcome))
}

async fn reset(State(handle): State<SessionHandle>) -> Result<Json<SessionSnapshot>, ApiError> {
    Ok(Json(handle.reset().await?))
}

async fn objectives(State(handle): State<SessionHandle>) -> Result<Json<Vec<Objective>>, ApiError> {
    Ok(Json(handle.snapshot().await?.objectives))
}
