//! fluenta-ts - Speaking Test Service
//!
//! HTTP backend for the Fluenta speaking-proficiency application: prompt
//! bank, audio submission with hosted transcription and evaluation, test
//! results, and progress tracking.

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use fluenta_common::config::{self, TomlConfig};
use fluenta_ts::config::resolve_api_keys;
use fluenta_ts::services::evaluator::EvaluationService;
use fluenta_ts::services::transcriber::{AssemblyAiTranscriber, Transcriber};
use fluenta_ts::store::Store;
use fluenta_ts::{build_router, AppState};

const DEFAULT_PORT: u16 = 5730;

#[derive(Debug, Parser)]
#[command(name = "fluenta-ts", about = "Fluenta speaking test service")]
struct Cli {
    /// Root folder for transient data (audio uploads)
    #[arg(long)]
    root_folder: Option<String>,

    /// HTTP listen port
    #[arg(long, env = "FLUENTA_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    // Log build identification immediately after tracing init
    info!(
        "Starting Fluenta Test Service (fluenta-ts) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let cli = Cli::parse();
    let toml_config: TomlConfig = config::load_toml_config();

    let root_folder = config::resolve_root_folder(
        cli.root_folder.as_deref(),
        "FLUENTA_ROOT_FOLDER",
        &toml_config,
    );
    let uploads_dir = root_folder.join("uploads");
    config::ensure_directory_exists(&uploads_dir)?;
    info!("Uploads folder: {}", uploads_dir.display());

    // Missing keys degrade to fallback behavior, never startup failure
    let keys = resolve_api_keys(&toml_config);

    let transcriber: Option<Arc<dyn Transcriber>> = match keys.assemblyai {
        Some(key) => match AssemblyAiTranscriber::new(key) {
            Ok(client) => Some(Arc::new(client)),
            Err(e) => {
                tracing::warn!("AssemblyAI client unavailable: {}", e);
                None
            }
        },
        None => None,
    };
    let evaluator = Arc::new(EvaluationService::from_keys(keys.mistral, keys.openai));

    let store = Arc::new(Store::new());
    store.seed().await;

    let state = AppState::new(store, transcriber, evaluator, uploads_dir);
    let app = build_router(state);

    let port = cli.port.or(toml_config.port).unwrap_or(DEFAULT_PORT);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port)).await?;
    info!("fluenta-ts listening on http://127.0.0.1:{}", port);
    info!("Health check: http://127.0.0.1:{}/health", port);

    axum::serve(listener, app).await?;

    Ok(())
}
