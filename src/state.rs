//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor.
//! It holds the database pool, the authoritative ad list, the broadcast
//! channel that feeds every realtime connection, and the optional blob store.
//! The ad list is the only mutable piece and is guarded by one `RwLock`;
//! see `services::ads` for the locking rules around it.

use std::sync::Arc;

use grid::ad::Ad;
use sqlx::PgPool;
use tokio::sync::{RwLock, broadcast};

use crate::config::AppConfig;
use crate::services::ads::AdEvent;
use crate::services::storage::BlobStore;

/// Events buffered per feed before a slow reader starts lagging.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Shared application state, injected into Axum handlers via State extractor.
/// Clone is required by Axum; all inner fields are Arc-wrapped or Clone.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<AppConfig>,
    /// Authoritative ad list, in purchase order.
    pub ads: Arc<RwLock<Vec<Ad>>>,
    pub events: broadcast::Sender<AdEvent>,
    /// Image store. `None` if storage env vars are not configured.
    pub storage: Option<Arc<dyn BlobStore>>,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, config: AppConfig, storage: Option<Arc<dyn BlobStore>>) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { pool, config: Arc::new(config), ads: Arc::new(RwLock::new(Vec::new())), events, storage }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
