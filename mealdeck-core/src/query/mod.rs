//! Query orchestration: cached, de-duplicated reads with declarative
//! enablement, mutations with cache invalidation, and debounced input.

mod cache;
mod debounce;
mod favorites;
mod meals;

pub use cache::{QueryClient, QueryKey};
pub use debounce::Debouncer;
pub use favorites::{FavoriteQueries, FavoriteToggle, MY_FAVORITES};
pub use meals::{
    MealQueries, CATEGORIES, FILTER_BY_CATEGORY, FILTER_BY_INGREDIENT, GET_BY_ID, RANDOM, RANDOM_BATCH,
    SEARCH_BY_NAME,
};
