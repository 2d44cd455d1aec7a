//! Screen-level compositions of the query layer.

pub mod home;
pub mod search;

pub use home::{load_home, refresh_home, HomeError, HomeFeed, HomeRefresh};
pub use search::{ingredient_search_enabled, search_recipes, SearchOutcome, SearchSource};
