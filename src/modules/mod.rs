pub mod books;
pub mod users;

use std::sync::Arc;

use shelf_kernel::ModuleRegistry;

use crate::catalog::CatalogStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, store: Arc<CatalogStore>) -> anyhow::Result<()> {
    registry.register(users::create_module(store.clone()))?;
    registry.register(books::create_module(store))?;
    Ok(())
}
