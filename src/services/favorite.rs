use std::sync::Arc;

use time::OffsetDateTime;
use tracing::instrument;

use crate::{
    cache::ReadThroughCache,
    error::AppResult,
    models::{Favorite, NewFavorite},
    repository::FavoriteStore,
    telemetry::{FAVORITES_ADDED, FAVORITES_REMOVED},
};

pub const FAVORITES_CACHE: &str = "favorites";

pub type FavoritesCache = ReadThroughCache<Vec<Favorite>>;

#[derive(Clone)]
pub struct FavoriteService {
    store: Arc<dyn FavoriteStore>,
    cache: Arc<FavoritesCache>,
    evict_on_add: bool,
}

impl FavoriteService {
    pub fn new(store: Arc<dyn FavoriteStore>, cache: Arc<FavoritesCache>) -> Self {
        Self {
            store,
            cache,
            evict_on_add: false,
        }
    }

    /// Also drop the user's cached list when a favorite is added. Off by
    /// default, in which case a warm list stays as it was until the next
    /// removal for that user.
    pub fn with_evict_on_add(mut self, evict_on_add: bool) -> Self {
        self.evict_on_add = evict_on_add;
        self
    }

    pub fn store(&self) -> &Arc<dyn FavoriteStore> {
        &self.store
    }

    #[instrument(name = "favorite.list", skip(self))]
    pub async fn get_user_favorites(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        self.cache
            .get_or_compute(user_id, || self.store.find_by_user_id(user_id))
            .await
    }

    #[instrument(
        name = "favorite.add",
        skip(self, favorite),
        fields(user_id = %favorite.user_id, course_id = %favorite.course_id)
    )]
    pub async fn add_favorite(&self, favorite: NewFavorite) -> AppResult<Favorite> {
        let created_at = OffsetDateTime::now_utc();
        let saved = self.store.save(favorite, created_at).await?;

        if self.evict_on_add {
            self.cache.invalidate(&saved.user_id).await;
        }

        FAVORITES_ADDED.add(1, &[]);

        tracing::info!(
            favorite_id = %saved.id,
            user_id = %saved.user_id,
            course_id = %saved.course_id,
            "Favorite added"
        );

        Ok(saved)
    }

    #[instrument(name = "favorite.remove", skip(self))]
    pub async fn remove_favorite(&self, user_id: &str, course_id: &str) -> AppResult<()> {
        let removed = self
            .store
            .delete_by_user_id_and_course_id(user_id, course_id)
            .await?;

        self.cache.invalidate(user_id).await;

        if removed > 0 {
            FAVORITES_REMOVED.add(removed, &[]);
        }

        tracing::info!(user_id, course_id, removed, "Favorite removed");

        Ok(())
    }

    #[instrument(name = "favorite.exists", skip(self))]
    pub async fn is_favorite(&self, user_id: &str, course_id: &str) -> AppResult<bool> {
        self.store
            .exists_by_user_id_and_course_id(user_id, course_id)
            .await
    }
}
