//! Zine Maker Web - Web server for assembling printable zine booklets.

mod helpers;
mod routes;
mod state;
mod templates;

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    compression::CompressionLayer,
    cors::CorsLayer,
    services::ServeDir,
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use zine_maker_core::{auto_load, create_source, AppConfig};

use state::AppState;

/// Resolve the static files directory.
///
/// Priority:
/// 1. Explicit path if provided
/// 2. ./static if it exists
/// 3. Crate's built-in static directory
fn resolve_static_dir(explicit_path: Option<&str>) -> PathBuf {
    if let Some(path) = explicit_path {
        return PathBuf::from(path);
    }

    // Try ./static first (works in development and when running from crate dir)
    let local_static = PathBuf::from("static");
    if local_static.exists() && local_static.is_dir() {
        return local_static;
    }

    // Fall back to compiled-in path (useful for cargo run)
    PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/static"))
}

#[derive(Parser, Debug)]
#[command(name = "zine-maker-web")]
#[command(author, version, about = "Zine Maker Web Server", long_about = None)]
struct Args {
    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind to
    #[arg(short, long, default_value = "3000")]
    port: u16,

    /// URL of the preconfigured booklet (overrides config)
    #[arg(long, env = "ZINE_BOOKLET_URL")]
    booklet_url: Option<String>,

    /// Local path of the preconfigured booklet (overrides config)
    #[arg(long, env = "ZINE_BOOKLET_PATH")]
    booklet_path: Option<PathBuf>,

    /// Skip the startup auto-load entirely
    #[arg(long)]
    no_autoload: bool,

    /// Config file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Static files directory (defaults to ./static or crate's static dir)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<String>,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before parsing args so env vars are available)
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let default_level = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };

    if args.no_autoload {
        config.autoload.url = None;
        config.autoload.path = None;
    } else {
        if let Some(url) = args.booklet_url {
            config.autoload.url = Some(url);
        }
        if let Some(path) = args.booklet_path {
            config.autoload.path = Some(path);
        }
    }

    let body_limit = config.max_upload_bytes;
    let state = Arc::new(AppState::new(config));

    // Attempt the auto-load before accepting requests so the first page view
    // already reflects the outcome.
    if let Some(source) = create_source(&state.config.autoload) {
        match auto_load(source.as_ref()).await {
            Ok(Some(merged)) => {
                let pages = merged.page_count;
                let id = state.publish_auto_loaded(merged).await;
                info!("Auto-loaded booklet published as {} ({} pages)", id, pages);
            }
            Ok(None) => info!("No preconfigured booklet found; waiting for uploads"),
            Err(e) => warn!(
                "Preconfigured booklet is unusable ({}); waiting for uploads",
                e
            ),
        }
    } else {
        info!("Auto-load disabled; waiting for uploads");
    }

    // Build router
    let app = Router::new()
        .route("/", get(routes::index))
        .route("/api/upload", post(routes::upload_pages))
        .route("/download/{artifact_id}", get(routes::download_booklet))
        // Static files with Cache-Control: no-cache (cache but always revalidate)
        .nest_service(
            "/static",
            ServiceBuilder::new()
                .layer(SetResponseHeaderLayer::if_not_present(
                    header::CACHE_CONTROL,
                    HeaderValue::from_static("no-cache"),
                ))
                .service(ServeDir::new(resolve_static_dir(args.static_dir.as_deref()))),
        )
        // Middleware
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store, max-age=0"),
        ))
        .layer(CompressionLayer::new())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
