use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use tracing::instrument;
use uuid::Uuid;

use super::FavoriteStore;
use crate::{
    error::AppResult,
    models::{Favorite, NewFavorite},
};

/// Process-local store for running without PostgreSQL. Records are kept in
/// insertion order.
#[derive(Default)]
pub struct InMemoryFavoriteRepository {
    records: RwLock<Vec<Favorite>>,
}

impl InMemoryFavoriteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    #[cfg(test)]
    async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FavoriteStore for InMemoryFavoriteRepository {
    #[instrument(name = "memory.favorite.find_by_user_id", skip(self))]
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|f| f.user_id == user_id)
            .cloned()
            .collect())
    }

    #[instrument(
        name = "memory.favorite.save",
        skip(self, favorite),
        fields(user_id = %favorite.user_id, course_id = %favorite.course_id)
    )]
    async fn save(&self, favorite: NewFavorite, created_at: OffsetDateTime) -> AppResult<Favorite> {
        let saved = favorite.into_favorite(Uuid::new_v4(), created_at);
        self.records.write().await.push(saved.clone());
        Ok(saved)
    }

    #[instrument(name = "memory.favorite.delete_by_user_id_and_course_id", skip(self))]
    async fn delete_by_user_id_and_course_id(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<u64> {
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|f| !(f.user_id == user_id && f.course_id == course_id));
        Ok((before - records.len()) as u64)
    }

    #[instrument(name = "memory.favorite.exists_by_user_id_and_course_id", skip(self))]
    async fn exists_by_user_id_and_course_id(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<bool> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .any(|f| f.user_id == user_id && f.course_id == course_id))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::assert_ok;

    fn now() -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }

    #[tokio::test]
    async fn test_save_assigns_distinct_ids() {
        let store = InMemoryFavoriteRepository::new();

        let first = store.save(NewFavorite::new("u1", "c1"), now()).await.unwrap();
        let second = store.save(NewFavorite::new("u1", "c1"), now()).await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_find_by_user_id_filters_by_owner() {
        let store = InMemoryFavoriteRepository::new();
        store.save(NewFavorite::new("u1", "c1"), now()).await.unwrap();
        store.save(NewFavorite::new("u2", "c1"), now()).await.unwrap();
        store.save(NewFavorite::new("u1", "c2"), now()).await.unwrap();

        let courses: Vec<String> = store
            .find_by_user_id("u1")
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.course_id)
            .collect();

        assert_eq!(courses, vec!["c1", "c2"]);
        assert!(store.find_by_user_id("nobody").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_every_matching_record() {
        let store = InMemoryFavoriteRepository::new();
        store.save(NewFavorite::new("u1", "c1"), now()).await.unwrap();
        store.save(NewFavorite::new("u1", "c1"), now()).await.unwrap();
        store.save(NewFavorite::new("u1", "c2"), now()).await.unwrap();

        let removed = store.delete_by_user_id_and_course_id("u1", "c1").await.unwrap();

        assert_eq!(removed, 2);
        assert!(!store.exists_by_user_id_and_course_id("u1", "c1").await.unwrap());
        assert!(store.exists_by_user_id_and_course_id("u1", "c2").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_without_match_is_not_an_error() {
        let store = InMemoryFavoriteRepository::new();

        let removed = assert_ok!(store.delete_by_user_id_and_course_id("u1", "c1").await);

        assert_eq!(removed, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_exists_requires_both_keys() {
        let store = InMemoryFavoriteRepository::new();
        store.save(NewFavorite::new("u1", "c1"), now()).await.unwrap();

        assert!(store.exists_by_user_id_and_course_id("u1", "c1").await.unwrap());
        assert!(!store.exists_by_user_id_and_course_id("u1", "c2").await.unwrap());
        assert!(!store.exists_by_user_id_and_course_id("u2", "c1").await.unwrap());
    }
}
