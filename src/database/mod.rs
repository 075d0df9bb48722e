pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod repository;

use std::sync::Arc;

use tracing::info;

use crate::config::{StorageBackend, StorageConfig};

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryAccountRepository;
pub use postgres::PostgresAccountRepository;
pub use repository::{AccountRepository, ACCOUNTS_TABLE};

/// Open the configured account store. Postgres connects and prepares its schema first.
pub async fn open_repository(
    config: &StorageConfig,
    debug_logging: bool,
) -> Result<Arc<dyn AccountRepository>, DatabaseError> {
    match config.backend {
        StorageBackend::Postgres => {
            let manager = DatabaseManager::connect(config).await?;
            let repository = PostgresAccountRepository::new(manager, debug_logging);
            repository.ensure_schema().await?;
            Ok(Arc::new(repository))
        }
        StorageBackend::Memory => {
            info!("Using in-memory account store; data is lost on exit");
            Ok(Arc::new(MemoryAccountRepository::new()))
        }
    }
}
