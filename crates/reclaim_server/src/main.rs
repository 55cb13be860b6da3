//! Reclaim server binary.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use reclaim_auth::TokenSigner;
use reclaim_core::{
    AccountService, ClaimService, ContactService, CoreConfig, ItemService, ListingService,
};
use reclaim_db::ReclaimDb;
use reclaim_logging::{init_logging, LogConfig};
use reclaim_server::blob::FsBlobStore;
use reclaim_server::config::ServerConfig;
use reclaim_server::{app, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let config = ServerConfig::parse();

    init_logging(LogConfig {
        app_name: "reclaim-server",
        verbose: config.verbose,
    })?;

    let db = ReclaimDb::open(&config.database)
        .await
        .with_context(|| format!("Failed to open database: {}", config.database.display()))?;

    let signer = TokenSigner::new(&config.token_secret, config.token_ttl_secs);
    let core_cfg = CoreConfig {
        store_timeout: Duration::from_secs(config.store_timeout_secs),
        max_page_size: config.max_page_size,
    };

    let blobs = FsBlobStore::new(&config.upload_dir).with_context(|| {
        format!("Failed to create upload dir: {}", config.upload_dir.display())
    })?;

    let state = AppState {
        accounts: AccountService::new(db.clone(), signer.clone(), core_cfg),
        items: ItemService::new(db.clone(), core_cfg),
        claims: ClaimService::new(db.clone(), core_cfg),
        listings: ListingService::new(db.clone(), core_cfg),
        contact: ContactService::new(db, core_cfg),
        signer,
        blobs: Arc::new(blobs),
        dev_errors: config.dev_errors,
    };

    let listener = TcpListener::bind(&config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;

    info!(bind = %config.bind, "Reclaim server listening");

    axum::serve(listener, app(state))
        .await
        .context("Server error")?;

    Ok(())
}
