//! deck-composer - A web backend for AI-assisted slide deck editing.
//!
//! This binary starts the HTTP server and wires all components together.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use deck_composer::{
    assets::{AssetCoordinator, HttpImageFetcher},
    config::Config,
    deck::DeckService,
    generation::HttpGenerator,
    server::{create_router, RouterConfig},
    storage::ObjectStorage,
    store::MemoryStore,
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();

    init_logging(config.verbose);

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let generator_url = match config.generator_base_url() {
        Ok(url) => url,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let image_url = match config.image_service_base_url() {
        Ok(url) => url,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    info!("deck-composer v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration:");
    info!("  Generator: {}", generator_url);
    info!("  Image service: {}", image_url);

    // Object storage is optional; unconfigured means assets stay local
    let storage = ObjectStorage::initialize(&config.storage_config()).await;
    if storage.is_some() {
        info!(
            "  Object storage: enabled ({})",
            config.object_storage_bucket.as_deref().unwrap_or("")
        );
    } else {
        info!("  Object storage: disabled");
    }

    // Wire the service
    let store = Arc::new(MemoryStore::new());
    let generator = Arc::new(HttpGenerator::new(generator_url));
    let fetcher = Arc::new(HttpImageFetcher::new(image_url));
    let assets = AssetCoordinator::new(fetcher).with_storage(storage);
    let service = Arc::new(DeckService::new(store, generator, assets));

    // Build router configuration
    let mut router_config = RouterConfig::new().with_tracing(!config.no_tracing);
    if let Some(origins) = config.cors_origins.clone() {
        router_config = router_config.with_cors_origins(origins);
    }

    let router = create_router(service, router_config);

    // Bind and serve
    let addr = config.bind_address();

    info!("");
    info!("Server listening on: http://{}", addr);
    info!("  Try: curl http://{}/health", addr);
    info!("");

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = axum::serve(listener, router).await {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "deck_composer=debug,tower_http=debug"
    } else {
        "deck_composer=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
