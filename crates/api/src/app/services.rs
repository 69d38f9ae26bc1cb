use std::sync::Arc;

use anyhow::Context;

use stockroom_store::{InMemoryStore, PgStore, Store, seed};

/// Store wiring behind the routes.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn Store>,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }
}

/// Build services from the environment.
///
/// `USE_PERSISTENT_STORES=true` selects Postgres (requires `DATABASE_URL`,
/// applies the schema on startup). The default is a seeded in-memory store
/// for dev.
pub async fn build_services() -> anyhow::Result<AppServices> {
    let persistent = std::env::var("USE_PERSISTENT_STORES")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false);

    if persistent {
        let database_url = std::env::var("DATABASE_URL")
            .context("DATABASE_URL must be set when USE_PERSISTENT_STORES=true")?;
        let store = PgStore::connect(&database_url).await?;
        store.migrate().await?;
        tracing::info!("using postgres store");
        Ok(AppServices::new(Arc::new(store)))
    } else {
        let store = InMemoryStore::new();
        let data = seed(&store).await?;
        tracing::info!(
            products = data.products.len(),
            "using seeded in-memory store"
        );
        Ok(AppServices::new(Arc::new(store)))
    }
}
