//! Stress diagnosis web server.
//!
//! Serves the trunk-built frontend bundle. The form talks to the
//! prediction service directly, so there is no API here beyond a
//! health check.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::{Router, routing::get};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

/// stress-server: serve the stress diagnosis frontend
#[derive(Parser)]
#[command(name = "stress-server")]
#[command(version, about, long_about = None)]
struct Args {
    /// Directory holding the built frontend (index.html, wasm, css)
    #[arg(short, long, env = "STRESS_DIST_DIR", default_value = "crates/frontend/dist")]
    dist: PathBuf,

    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "5970")]
    port: u16,
}

/// Build the router: static bundle with `index.html` fallback.
fn build_router(dist: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let index = ServeFile::new(dist.join("index.html"));

    Router::new()
        .route("/healthz", get(|| async { "ok" }))
        .fallback_service(
            ServeDir::new(dist)
                .append_index_html_on_directories(true)
                .fallback(index),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    if !args.dist.join("index.html").is_file() {
        tracing::warn!(
            dist = %args.dist.display(),
            "no index.html found; build the frontend with `trunk build` first"
        );
    }

    let app = build_router(&args.dist);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", args.host, args.port))?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
