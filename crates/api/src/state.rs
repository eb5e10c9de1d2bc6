use std::sync::Arc;

use soundshelf_core::storage::BlobStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the pool is reference counted and everything else sits
/// behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: soundshelf_db::DbPool,
    /// Server configuration (JWT secrets, session lifetimes, upload limits).
    pub config: Arc<ServerConfig>,
    /// Storage for uploaded audio, covers and profile pictures.
    pub blob_store: Arc<dyn BlobStore>,
}
