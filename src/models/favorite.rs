use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// A user's bookmark of a course, with a snapshot of the course's display
/// metadata taken when it was favorited.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub id: Uuid,
    pub user_id: String,
    pub course_id: String,
    pub course_title: Option<String>,
    pub course_description: Option<String>,
    pub course_image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Body of `POST /api/favorites`. `id` and `createdAt` are assigned by the
/// server, so any client-supplied values are dropped here.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub user_id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub course_id: String,
    pub course_title: Option<String>,
    pub course_description: Option<String>,
    pub course_image_url: Option<String>,
}

// Identifiers are passed through unvalidated; an explicit null binds like a
// missing key.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewFavorite {
    #[cfg(test)]
    pub fn new(user_id: impl Into<String>, course_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            course_id: course_id.into(),
            ..Default::default()
        }
    }

    #[cfg(test)]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.course_title = Some(title.into());
        self
    }

    pub fn into_favorite(self, id: Uuid, created_at: OffsetDateTime) -> Favorite {
        Favorite {
            id,
            user_id: self.user_id,
            course_id: self.course_id,
            course_title: self.course_title,
            course_description: self.course_description,
            course_image_url: self.course_image_url,
            created_at,
        }
    }
}
