//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented; logs include parameters and basic result info.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use tracing::{info, instrument};

use crate::logic::{handle_callback, handle_command};
use crate::protocol::*;
use crate::state::AppState;

#[instrument(level = "info", skip(state))]
pub async fn http_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  Json(HealthOut {
    ok: true,
    rows: state.dataset.len(),
    categories: state.dataset.categories().len(),
    source: state.report.source.clone(),
  })
}

#[instrument(level = "info", skip(state, body), fields(command = %body.command))]
pub async fn http_post_command(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CommandIn>,
) -> impl IntoResponse {
  let reply = handle_command(&state, &body.command, body.arg.as_deref());
  info!(target: "commands", command = %body.command, chunks = reply.chunks.len(), buttons = reply.buttons.len(), "HTTP command served");
  Json(reply)
}

#[instrument(level = "info", skip(state, body), fields(token = %body.token))]
pub async fn http_post_callback(
  State(state): State<Arc<AppState>>,
  Json(body): Json<CallbackIn>,
) -> impl IntoResponse {
  let reply = handle_callback(&state, &body.token);
  info!(target: "commands", token = %body.token, chunks = reply.chunks.len(), "HTTP callback served");
  Json(reply)
}
