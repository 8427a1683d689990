pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod telemetry;

pub use config::Config;

use std::sync::Arc;

use cache::ReadThroughCache;
use repository::{FavoriteStore, InMemoryFavoriteRepository};
use services::{FAVORITES_CACHE, FavoriteService};

#[derive(Clone)]
pub struct AppState {
    pub favorite_service: FavoriteService,
}

impl AppState {
    pub fn new(store: Arc<dyn FavoriteStore>, evict_on_add: bool) -> Self {
        let cache = Arc::new(ReadThroughCache::new(FAVORITES_CACHE));
        let favorite_service = FavoriteService::new(store, cache).with_evict_on_add(evict_on_add);

        Self { favorite_service }
    }

    /// State backed by a fresh process-local store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryFavoriteRepository::new()), false)
    }
}
