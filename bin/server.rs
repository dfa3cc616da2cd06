// Class Roster - Web Server
// REST API with Axum

use anyhow::{Context, Result};
use axum::Router;
use clap::Parser;
use class_roster::api::{self, AppState};
use class_roster::{logging, MemoryStore, RosterService, RosterStore, SqliteStore};
use std::path::PathBuf;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Parser, Debug)]
#[command(name = "roster-server", version, about = "REST API for class rosters")]
struct Config {
    /// SQLite database file
    #[arg(long, env = "ROSTER_DATABASE", default_value = "roster.db")]
    database: PathBuf,

    /// Address to listen on
    #[arg(long, env = "ROSTER_LISTEN", default_value = "0.0.0.0:3000")]
    listen: String,

    /// Keep everything in memory instead of opening the database
    #[arg(long)]
    in_memory: bool,
}

fn app<S: RosterStore + Send + 'static>(store: S) -> Router {
    let state = AppState::new(RosterService::new(store));

    Router::new()
        .nest("/api", api::router(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init("info")?;
    let config = Config::parse();

    let app = if config.in_memory {
        tracing::warn!("Running with an in-memory store; data is lost on exit");
        app(MemoryStore::new())
    } else {
        let store = SqliteStore::open(&config.database)
            .with_context(|| format!("Failed to open database {}", config.database.display()))?;
        tracing::info!(database = %config.database.display(), "Database opened");
        app(store)
    };

    let listener = tokio::net::TcpListener::bind(&config.listen)
        .await
        .with_context(|| format!("Failed to bind to {}", config.listen))?;

    tracing::info!(addr = %config.listen, "Roster server listening");

    axum::serve(listener, app)
        .await
        .context("Server failed")?;

    Ok(())
}
