//! Chengyus · Chino-Venezolano Lookup & Quiz Backend
//!
//! - Loads the chengyu dataset once at startup (Excel → CSV → embedded
//!   fallback), normalizes its schema, and serves lookups and quizzes over a
//!   small Axum HTTP API.
//!
//! Important env variables:
//!   PORT            : u16 (default 3000)
//!   BOT_CONFIG_PATH : path to TOML config (data file override + limits)
//!   LOG_LEVEL       : tracing filter, e.g. "debug" or full directives
//!   LOG_FORMAT      : "pretty" (default) or "json"

mod telemetry;
mod util;
mod domain;
mod config;
mod schema;
mod seeds;
mod source;
mod dataset;
mod query;
mod quiz;
mod render;
mod state;
mod protocol;
mod logic;
mod routes;

use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, instrument};

use crate::routes::build_router;
use crate::state::AppState;

#[instrument(level = "info", skip_all)]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  telemetry::init_tracing();

  // Build shared application state (the dataset is resolved and indexed here,
  // synchronously, before any request is accepted).
  let state = Arc::new(AppState::new());

  // Build the HTTP router with routes, CORS and tracing layers.
  let app = build_router(state.clone());

  // Read port from env or default to 3000.
  let addr: SocketAddr = std::env::var("PORT")
    .ok()
    .and_then(|p| p.parse::<u16>().ok())
    .map(|port| SocketAddr::from(([0, 0, 0, 0], port)))
    .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

  let listener = TcpListener::bind(addr).await?;
  info!(target: "chengyus_backend", %addr, "HTTP server listening");
  axum::serve(listener, app).await?;
  Ok(())
}
