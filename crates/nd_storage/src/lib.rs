use std::sync::Arc;

use async_trait::async_trait;
use nd_core::{ArticleStorage, Error, Result};
use tracing::{error, info};

pub mod backends;

pub use backends::*;

/// A concrete store that can be opened by name from configuration.
#[async_trait]
pub trait StorageBackend: ArticleStorage + Sized + 'static {
    /// Name accepted by `create_storage`
    const KIND: &'static str;

    fn get_error_message() -> &'static str;

    /// Opens the store; `location` is backend specific (a file path for SQLite).
    async fn open(location: Option<&str>) -> Result<Self>;
}

/// Opens the backend named `kind` (`memory` or `sqlite`).
pub async fn create_storage(kind: &str, location: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match kind.trim().to_lowercase().as_str() {
        "memory" => open_backend::<InMemoryStorage>(location).await,
        #[cfg(feature = "sqlite")]
        "sqlite" => open_backend::<SQLiteStorage>(location).await,
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => Err(Error::Config(
            "SQLite storage requires building with the `sqlite` feature".to_string(),
        )),
        other => Err(Error::Config(format!("Unknown storage backend: {}", other))),
    }
}

async fn open_backend<B: StorageBackend>(location: Option<&str>) -> Result<Arc<dyn ArticleStorage>> {
    match B::open(location).await {
        Ok(backend) => {
            info!(kind = B::KIND, "💾 Storage ready");
            Ok(Arc::new(backend))
        }
        Err(e) => {
            error!(kind = B::KIND, error = %e, "{}", B::get_error_message());
            Err(e)
        }
    }
}

pub mod prelude {
    pub use super::backends::*;
    pub use super::{create_storage, StorageBackend};
}
