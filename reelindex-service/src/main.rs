mod error;
mod routes;
mod state;

use axum::routing::get;
use axum::Router;
use clap::Parser;
use reelindex_core::{Config, ReelError, Scanner, SeedReport, Store};
use state::{AppState, SharedState};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "reelindex-service")]
#[command(about = "Index local video files and browse them over HTTP", long_about = None)]
struct Args {
    /// Directory to scan and serve
    #[arg(long, env = "REELINDEX_ROOT", default_value = ".")]
    root: PathBuf,

    /// Config file (default: reelindex.toml in the scan root, if present)
    #[arg(long, env = "REELINDEX_CONFIG")]
    config: Option<PathBuf>,

    /// SQLite database file (overrides [store] path)
    #[arg(long, env = "REELINDEX_DB")]
    db: Option<PathBuf>,

    /// Bind address (overrides [server] bind)
    #[arg(long, env = "REELINDEX_BIND")]
    bind: Option<String>,

    /// Port (overrides [server] port)
    #[arg(long, env = "REELINDEX_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    if let Err(err) = run(Args::parse()).await {
        tracing::error!(error = %err, "reelindex-service failed to start");
        std::process::exit(1);
    }
}

async fn run(args: Args) -> reelindex_core::Result<()> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::load_from_root(&args.root)?,
    };
    if let Some(bind) = args.bind {
        config.server.bind = bind;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    let db_path = args.db.unwrap_or_else(|| config.store_path(&args.root));
    let root = args.root;

    tracing::info!(
        "Starting reelindex-service v{} (root={}, db={})",
        env!("CARGO_PKG_VERSION"),
        root.display(),
        db_path.display()
    );

    // Scan and seed once, before accepting requests
    let report = tokio::task::spawn_blocking({
        let root = root.clone();
        let db_path = db_path.clone();
        let config = config.clone();
        move || seed(&root, &db_path, &config)
    })
    .await
    .map_err(|err| ReelError::Io(std::io::Error::other(format!("seed task failed: {err}"))))??;

    tracing::info!(
        inserted = report.inserted,
        skipped = report.skipped,
        failed = report.failures.len(),
        "index ready"
    );

    let state: SharedState = Arc::new(AppState::new(db_path, root));
    let app = app(state);

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("reelindex-service listening on {}", addr);
    axum::serve(listener, app).await?;
    Ok(())
}

/// Open (or create) the store and insert every newly discovered video
fn seed(root: &Path, db_path: &Path, config: &Config) -> reelindex_core::Result<SeedReport> {
    let mut store = Store::open(db_path)?;
    let scanner = Scanner::new(root, config)?;
    let scan = scanner.scan();
    if !scan.warnings.is_empty() {
        tracing::warn!(count = scan.warnings.len(), "some entries were skipped during scan");
    }
    store.upsert_if_absent(&scan.records)
}

fn app(state: SharedState) -> Router {
    Router::new()
        .route("/", get(routes::index))
        .route("/api/folder", get(routes::browse_root))
        .route("/api/folder/", get(routes::browse_root))
        .route("/api/folder/{*path}", get(routes::browse))
        .route("/api/search", get(routes::search_empty))
        .route("/api/search/", get(routes::search_empty))
        .route("/api/search/{name}", get(routes::search))
        .route("/api/file/{name}", get(routes::file))
        .route("/media/{*path}", get(routes::media))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
