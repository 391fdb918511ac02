//! HTTP surface of the time-travel monitor.
//!
//! ```text
//! GET  /__devtools/sessions
//! GET  /__devtools/sessions/{id}/history
//! POST /__devtools/sessions/{id}/jump/{index}
//! POST /__devtools/sessions/{id}/state
//! ```

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::Value;
use tokio::sync::oneshot;

use tackle_docs_app::DevtoolsError;

use crate::context::{AppContext, SessionInfo};
use crate::session::SessionCommand;

/// Errors returned by devtools endpoints.
#[derive(Debug, thiserror::Error)]
pub enum DevtoolsApiError {
    #[error("No connected session with id {0}")]
    SessionNotFound(String),

    #[error("Session {0} went away")]
    SessionGone(String),

    #[error(transparent)]
    Devtools(#[from] DevtoolsError),
}

impl IntoResponse for DevtoolsApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            DevtoolsApiError::SessionNotFound(_) | DevtoolsApiError::SessionGone(_) => {
                StatusCode::NOT_FOUND
            }
            DevtoolsApiError::Devtools(DevtoolsError::Detached) => StatusCode::CONFLICT,
            DevtoolsApiError::Devtools(DevtoolsError::UnknownEntry(_)) => StatusCode::NOT_FOUND,
            DevtoolsApiError::Devtools(_) => StatusCode::UNPROCESSABLE_ENTITY,
        };

        tracing::warn!("Devtools request failed: {}", self);
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// Routes mounted under `/__devtools`.
pub fn routes() -> Router<Arc<AppContext>> {
    Router::new()
        .route("/sessions", get(list_sessions))
        .route("/sessions/{id}/history", get(history))
        .route("/sessions/{id}/jump/{index}", post(jump))
        .route("/sessions/{id}/state", post(import_state))
}

async fn list_sessions(State(ctx): State<Arc<AppContext>>) -> Json<Vec<SessionInfo>> {
    Json(ctx.sessions().await)
}

async fn history(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Value>, DevtoolsApiError> {
    let entries = request(&ctx, &id, SessionCommand::History)
        .await?
        .ok_or(DevtoolsError::Detached)?;

    Ok(Json(serde_json::json!({
        "session": id,
        "entries": entries,
    })))
}

async fn jump(
    State(ctx): State<Arc<AppContext>>,
    Path((id, index)): Path<(String, usize)>,
) -> Result<StatusCode, DevtoolsApiError> {
    request(&ctx, &id, |reply| SessionCommand::JumpTo(index, reply)).await??;
    tracing::info!("Session {} jumped to entry {}", id, index);
    Ok(StatusCode::NO_CONTENT)
}

async fn import_state(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(state): Json<Value>,
) -> Result<StatusCode, DevtoolsApiError> {
    request(&ctx, &id, |reply| SessionCommand::Import(state, reply)).await??;
    tracing::info!("Session {} imported a new state", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Send a command to a connected session and wait for its answer.
async fn request<T>(
    ctx: &AppContext,
    id: &str,
    command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
) -> Result<T, DevtoolsApiError> {
    let commands = ctx
        .commands(id)
        .await
        .ok_or_else(|| DevtoolsApiError::SessionNotFound(id.to_string()))?;

    let (tx, rx) = oneshot::channel();
    commands
        .send(command(tx))
        .await
        .map_err(|_| DevtoolsApiError::SessionGone(id.to_string()))?;

    rx.await
        .map_err(|_| DevtoolsApiError::SessionGone(id.to_string()))
}
