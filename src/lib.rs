//! Shelf application library
//!
//! The in-memory bookstore catalog and the HTTP modules that serve it.

pub mod catalog;
pub mod modules;
pub mod utils;

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use catalog::CatalogStore;

/// Build a registry with every module serving `store`
pub fn build_registry(store: Arc<CatalogStore>) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store)?;
    Ok(registry)
}

/// Full HTTP application over `store`, without binding a socket
pub fn app(store: Arc<CatalogStore>, settings: &Settings) -> anyhow::Result<Router> {
    let registry = build_registry(store)?;
    Ok(shelf_http::build_router(&registry, settings))
}

/// Run the catalog service until a shutdown signal arrives
pub async fn run(settings: Settings) -> anyhow::Result<()> {
    let store = Arc::new(CatalogStore::seeded());
    let registry = build_registry(store)?;
    let ctx = InitCtx {
        settings: &settings,
    };

    registry
        .init_all(&ctx)
        .await
        .context("module initialization failed")?;
    registry
        .start_all(&ctx)
        .await
        .context("module startup failed")?;

    let served = shelf_http::start_server(&registry, &settings).await;

    registry
        .stop_all()
        .await
        .context("module shutdown failed")?;

    served
}
