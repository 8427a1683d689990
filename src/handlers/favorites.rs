use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{
    AppState,
    error::AppResult,
    models::{Favorite, NewFavorite},
};

pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> AppResult<Json<Vec<Favorite>>> {
    let favorites = state.favorite_service.get_user_favorites(&user_id).await?;

    Ok(Json(favorites))
}

pub async fn add_favorite(
    State(state): State<AppState>,
    Json(input): Json<NewFavorite>,
) -> AppResult<Json<Favorite>> {
    let favorite = state.favorite_service.add_favorite(input).await?;

    Ok(Json(favorite))
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    state
        .favorite_service
        .remove_favorite(&user_id, &course_id)
        .await?;

    Ok(StatusCode::OK)
}

pub async fn is_favorite(
    State(state): State<AppState>,
    Path((user_id, course_id)): Path<(String, String)>,
) -> AppResult<Json<bool>> {
    let exists = state
        .favorite_service
        .is_favorite(&user_id, &course_id)
        .await?;

    Ok(Json(exists))
}
