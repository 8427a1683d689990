use async_trait::async_trait;
use sqlx::{PgPool, Row};
use time::OffsetDateTime;
use tracing::instrument;

use super::FavoriteStore;
use crate::{
    error::AppResult,
    models::{Favorite, NewFavorite},
};

#[derive(Clone)]
pub struct FavoriteRepository {
    pool: PgPool,
}

impl FavoriteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FavoriteStore for FavoriteRepository {
    #[instrument(name = "db.favorite.find_by_user_id", skip(self))]
    async fn find_by_user_id(&self, user_id: &str) -> AppResult<Vec<Favorite>> {
        let favorites = sqlx::query_as::<_, Favorite>(
            r#"
            SELECT id, user_id, course_id, course_title, course_description,
                   course_image_url, created_at
            FROM favorites
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(favorites)
    }

    #[instrument(
        name = "db.favorite.save",
        skip(self, favorite),
        fields(user_id = %favorite.user_id, course_id = %favorite.course_id)
    )]
    async fn save(&self, favorite: NewFavorite, created_at: OffsetDateTime) -> AppResult<Favorite> {
        let saved = sqlx::query_as::<_, Favorite>(
            r#"
            INSERT INTO favorites (
                user_id, course_id, course_title, course_description, course_image_url, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, course_id, course_title, course_description,
                      course_image_url, created_at
            "#,
        )
        .bind(&favorite.user_id)
        .bind(&favorite.course_id)
        .bind(&favorite.course_title)
        .bind(&favorite.course_description)
        .bind(&favorite.course_image_url)
        .bind(created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    #[instrument(name = "db.favorite.delete_by_user_id_and_course_id", skip(self))]
    async fn delete_by_user_id_and_course_id(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND course_id = $2")
            .bind(user_id)
            .bind(course_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    #[instrument(name = "db.favorite.exists_by_user_id_and_course_id", skip(self))]
    async fn exists_by_user_id_and_course_id(
        &self,
        user_id: &str,
        course_id: &str,
    ) -> AppResult<bool> {
        let row = sqlx::query(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM favorites WHERE user_id = $1 AND course_id = $2
            ) as exists
            "#,
        )
        .bind(user_id)
        .bind(course_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.get::<bool, _>("exists"))
    }

    #[instrument(name = "db.favorite.ping", skip(self))]
    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
