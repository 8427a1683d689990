mod favorites;
mod health;

pub use favorites::{add_favorite, is_favorite, list_favorites, remove_favorite};
pub use health::health_check;
