pub mod catalog;
pub mod config;
pub mod credentials;
pub mod enrichment;
pub mod error;
pub mod favorites;
pub mod http;
pub mod normalize;
pub mod query;
pub mod types;
pub mod views;

pub use catalog::CatalogClient;
pub use config::{AppConfig, ConfigError};
pub use credentials::{validate_sign_in, validate_sign_up};
pub use enrichment::{EnrichmentSource, FixedEnrichment, RandomEnrichment};
pub use error::{FavoriteError, FetchError, NormalizeError, QueryError, ValidationError};
pub use favorites::{FavoriteRecipe, FavoritesClient, FavoritesPage, NewFavorite};
pub use http::{HttpClient, MockClient, MockResponse, ReqwestClient};
pub use normalize::Normalizer;
pub use query::{Debouncer, FavoriteQueries, FavoriteToggle, MealQueries, QueryClient, QueryKey};
pub use types::{Category, RawCategory, RawMeal, Recipe, RecipeDetail};
pub use views::{load_home, refresh_home, search_recipes, HomeFeed, SearchOutcome, SearchSource};
