mod favorite;

pub use favorite::{FAVORITES_CACHE, FavoriteService, FavoritesCache};
