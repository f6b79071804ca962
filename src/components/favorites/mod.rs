//! Favorites components: the optimistic toggle button and the saved-books
//! view.

mod favorite_button;
mod favorites_view;

pub use favorite_button::FavoriteButton;
pub use favorites_view::FavoritesView;
