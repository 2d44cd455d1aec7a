//! Home screen: featured recipe, a random feed and the category strip.

use serde::Serialize;
use thiserror::Error;

use crate::error::QueryError;
use crate::query::MealQueries;
use crate::types::{Category, Recipe};

#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub featured: Option<Recipe>,
    pub recipes: Vec<Recipe>,
    pub categories: Vec<Category>,
}

/// The first failing dependency of the home screen, in display priority.
#[derive(Error, Debug)]
pub enum HomeError {
    #[error("Error fetching featured recipe.")]
    Featured(#[source] QueryError),

    #[error("Error fetching random recipes.")]
    Recipes(#[source] QueryError),

    #[error("Error fetching categories.")]
    Categories(#[source] QueryError),
}

pub async fn load_home(queries: &MealQueries, feed_size: usize) -> Result<HomeFeed, HomeError> {
    let (featured, recipes, categories) =
        tokio::join!(queries.random(), queries.random_batch(feed_size), queries.categories());

    let featured = featured.map_err(HomeError::Featured)?;
    let recipes = recipes.map_err(HomeError::Recipes)?;
    let categories = categories.map_err(HomeError::Categories)?;

    Ok(HomeFeed {
        featured,
        recipes,
        categories: categories.unwrap_or_default(),
    })
}

/// Result of a pull-to-refresh. A field is `None` when its refetch failed.
#[derive(Debug, Clone, Default)]
pub struct HomeRefresh {
    pub featured: Option<Option<Recipe>>,
    pub recipes: Option<Vec<Recipe>>,
}

impl HomeRefresh {
    pub fn is_complete(&self) -> bool {
        self.featured.is_some() && self.recipes.is_some()
    }
}

/// Refetch the featured recipe and the random feed together.
///
/// Both refetches are awaited before returning; failures are logged.
pub async fn refresh_home(queries: &MealQueries, feed_size: usize) -> HomeRefresh {
    let (featured, recipes) = tokio::join!(queries.refetch_random(), queries.refetch_random_batch(feed_size));

    let featured = featured
        .map_err(|e| tracing::error!(error = %e, "refreshing featured recipe failed"))
        .ok();
    let recipes = recipes
        .map_err(|e| tracing::error!(error = %e, "refreshing random recipes failed"))
        .ok();

    HomeRefresh { featured, recipes }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogClient;
    use crate::enrichment::FixedEnrichment;
    use crate::http::{Method, MockClient};
    use crate::normalize::Normalizer;
    use crate::query::QueryClient;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const BASE: &str = "https://catalog.test/api";

    fn queries(mock: MockClient) -> (MealQueries, Arc<MockClient>) {
        let mock = Arc::new(mock);
        let queries = MealQueries::new(
            CatalogClient::new(mock.clone(), BASE),
            Arc::new(QueryClient::new(Duration::from_secs(60))),
            Normalizer::new(Arc::new(FixedEnrichment::default())),
        );
        (queries, mock)
    }

    #[tokio::test]
    async fn test_load_home() {
        let (queries, _) = queries(
            MockClient::new()
                .with_json(&format!("{BASE}/random.php"), json!({"meals": [{"idMeal": "1", "strMeal": "Stew"}]}))
                .with_json(
                    &format!("{BASE}/categories.php"),
                    json!({"categories": [{"idCategory": "1", "strCategory": "Beef"}]}),
                ),
        );

        let feed = load_home(&queries, 4).await.unwrap();
        assert_eq!(feed.featured.unwrap().title, "Stew");
        assert_eq!(feed.recipes.len(), 4);
        assert_eq!(feed.categories[0].name, "Beef");
    }

    #[tokio::test]
    async fn test_missing_categories_is_empty_strip() {
        let (queries, _) = queries(
            MockClient::new()
                .with_json(&format!("{BASE}/random.php"), json!({"meals": [{"idMeal": "1"}]}))
                .with_json(&format!("{BASE}/categories.php"), json!({"categories": null})),
        );

        let feed = load_home(&queries, 2).await.unwrap();
        assert!(feed.categories.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_draws_new_recipes() {
        let url = format!("{BASE}/random.php");
        let (queries, mock) = queries(
            MockClient::new()
                .with_json(&url, json!({"meals": [{"idMeal": "1"}]}))
                .with_json(&url, json!({"meals": [{"idMeal": "1"}]}))
                .with_json(&url, json!({"meals": [{"idMeal": "2"}]})),
        );

        queries.random().await.unwrap();
        queries.random_batch(1).await.unwrap();
        assert_eq!(mock.call_count(Method::Get, &url), 2);

        let refreshed = refresh_home(&queries, 1).await;
        assert!(refreshed.is_complete());
        assert_eq!(refreshed.featured.flatten().unwrap().id, "2");
        assert_eq!(mock.call_count(Method::Get, &url), 4);
    }

    #[test]
    fn test_error_messages() {
        let err = HomeError::Recipes(QueryError::NotFound("x".to_string()));
        assert_eq!(err.to_string(), "Error fetching random recipes.");
        let err = HomeError::Featured(QueryError::NotFound("x".to_string()));
        assert_eq!(err.to_string(), "Error fetching featured recipe.");
    }
}
