mod favorite;
mod memory;

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    error::AppResult,
    models::{Favorite, NewFavorite},
};

pub use favorite::FavoriteRepository;
pub use memory::InMemoryFavoriteRepository;

/// Persistence gateway for favorites.
///
/// Records are addressed two ways: by their store-generated `id`, and by the
/// `(user_id, course_id)` pair used for existence checks and removal. The pair
/// is not unique, so removal and existence operate on every matching record.
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// All favorites owned by `user_id`; empty when the user has none.
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<Favorite>>;

    /// Inserts a new record and returns it with its generated `id`.
    async fn save(&self, favorite: NewFavorite, created_at: OffsetDateTime) -> AppResult<Favorite>;

    /// Removes every record matching the pair, returning how many were removed.
    async fn delete_by_user_id_and_course_id(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<u64>;

    async fn exists_by_user_id_and_course_id(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<bool>;

    /// Connectivity probe for health checks.
    async fn ping(&self) -> AppResult<()>;
}
