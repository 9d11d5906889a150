use std::sync::Arc;

use records::{doctor_directory, models::Doctor};
use tracing::info;

use super::{
    config::{Config, StoreBackend},
    database::Store,
    error::StartupError,
};

pub struct AppState {
    pub config: Config,
    pub store: Store,
    pub doctors: Vec<Doctor>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, StartupError> {
        let store = match config.store_backend {
            StoreBackend::Redis => {
                info!("Connecting to Redis...");
                Store::redis(&config.redis_url).await?
            }
            StoreBackend::Memory => {
                info!("Using in-memory store, records will not survive a restart");
                Store::memory()
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Store) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            doctors: doctor_directory(),
        })
    }
}
