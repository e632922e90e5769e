use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chips_rust_server::level_pack::{decode_level_pack, LevelData};
use log::{info, warn};
use serde_json::json;
use tower_http::services::{ServeDir, ServeFile};

type SharedLevels = Arc<Vec<LevelData>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let port = std::env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(3000);

    let pack_path = std::env::var("LEVEL_PACK_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("data/chips.dat"));

    // decoded once; a bad pack aborts startup instead of serving a partial list
    let bytes = tokio::fs::read(&pack_path)
        .await
        .with_context(|| format!("failed to read level pack {}", pack_path.display()))?;
    let levels = decode_level_pack(&bytes)
        .with_context(|| format!("failed to decode level pack {}", pack_path.display()))?;
    info!("loaded {} levels from {}", levels.len(), pack_path.display());

    let app = Router::new()
        .route("/healthz", get(healthz))
        .route("/data", get(levels_handler))
        .route("/data/{index}", get(level_handler))
        .with_state(Arc::new(levels));

    let app = if let Some(static_dir) = resolve_static_dir() {
        let index_file = static_dir.join("index.html");
        info!("static file root: {}", static_dir.display());
        app.fallback_service(
            ServeDir::new(static_dir).not_found_service(ServeFile::new(index_file)),
        )
    } else {
        warn!("static file root not found, serving the level API only");
        app
    };

    let bind_addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;

    info!("listening on :{port}");
    axum::serve(listener, app)
        .await
        .context("server runtime failed")
}

fn resolve_static_dir() -> Option<PathBuf> {
    let configured = std::env::var("STATIC_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("public"));
    [configured, PathBuf::from("dist")]
        .into_iter()
        .find(|path| path.join("index.html").is_file())
}

async fn healthz() -> impl IntoResponse {
    Json(json!({ "ok": true }))
}

async fn levels_handler(State(levels): State<SharedLevels>) -> impl IntoResponse {
    Json(levels.to_vec())
}

async fn level_handler(
    State(levels): State<SharedLevels>,
    Path(index): Path<usize>,
) -> impl IntoResponse {
    match levels.get(index) {
        Some(level) => Json(level.clone()).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no level at index {index}") })),
        )
            .into_response(),
    }
}
