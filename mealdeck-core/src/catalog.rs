//! Client for the third-party recipe catalog (TheMealDB).
//!
//! Every operation degrades instead of failing: transport or decode errors
//! are logged and turned into an empty list or `None`.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::FetchError;
use crate::http::{build_url, HttpClient};
use crate::types::{RawCategory, RawMeal};

/// Default size of a random batch.
pub const DEFAULT_RANDOM_BATCH: usize = 6;

#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    #[serde(default)]
    meals: Option<Vec<RawMeal>>,
}

#[derive(Debug, Deserialize)]
struct CategoriesEnvelope {
    #[serde(default)]
    categories: Option<Vec<RawCategory>>,
}

/// Read-only catalog client. Cloning shares the underlying transport.
#[derive(Clone)]
pub struct CatalogClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl CatalogClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<T, FetchError> {
        let url = build_url(&self.base_url, &[endpoint], query)?;
        let body = self.http.get_json(&url).await?;
        serde_json::from_value(body).map_err(|e| FetchError::InvalidBody(format!("{url}: {e}")))
    }

    async fn meals(&self, op: &'static str, endpoint: &str, query: &[(&str, &str)]) -> Vec<RawMeal> {
        match self.get::<MealsEnvelope>(endpoint, query).await {
            Ok(envelope) => envelope.meals.unwrap_or_default(),
            Err(e) => {
                tracing::error!(op, error = %e, "catalog request failed");
                Vec::new()
            }
        }
    }

    async fn first_meal(&self, op: &'static str, endpoint: &str, query: &[(&str, &str)]) -> Option<RawMeal> {
        match self.get::<MealsEnvelope>(endpoint, query).await {
            Ok(envelope) => envelope.meals.and_then(|meals| meals.into_iter().next()),
            Err(e) => {
                tracing::error!(op, error = %e, "catalog request failed");
                None
            }
        }
    }

    /// Meals whose name contains `query`; empty on no match or failure.
    pub async fn search_by_name(&self, query: &str) -> Vec<RawMeal> {
        self.meals("search_by_name", "search.php", &[("s", query)]).await
    }

    pub async fn get_by_id(&self, id: &str) -> Option<RawMeal> {
        self.first_meal("get_by_id", "lookup.php", &[("i", id)]).await
    }

    pub async fn get_random(&self) -> Option<RawMeal> {
        self.first_meal("get_random", "random.php", &[]).await
    }

    /// Issue `count` random draws concurrently and keep the ones that resolved.
    ///
    /// Best-effort: a failed or panicked draw shrinks the batch. Draws are
    /// independent, so duplicates are possible.
    pub async fn get_random_batch(&self, count: usize) -> Vec<RawMeal> {
        let mut draws = JoinSet::new();
        for _ in 0..count {
            let client = self.clone();
            draws.spawn(async move { client.get_random().await });
        }

        let mut meals = Vec::with_capacity(count);
        while let Some(joined) = draws.join_next().await {
            match joined {
                Ok(Some(meal)) => meals.push(meal),
                Ok(None) => {}
                Err(e) => tracing::error!(error = %e, "random draw task failed"),
            }
        }

        if meals.len() < count {
            tracing::warn!(requested = count, received = meals.len(), "random batch came back short");
        }
        meals
    }

    pub async fn get_categories(&self) -> Vec<RawCategory> {
        match self.get::<CategoriesEnvelope>("categories.php", &[]).await {
            Ok(envelope) => envelope.categories.unwrap_or_default(),
            Err(e) => {
                tracing::error!(op = "get_categories", error = %e, "catalog request failed");
                Vec::new()
            }
        }
    }

    pub async fn filter_by_ingredient(&self, ingredient: &str) -> Vec<RawMeal> {
        self.meals("filter_by_ingredient", "filter.php", &[("i", ingredient)])
            .await
    }

    pub async fn filter_by_category(&self, category: &str) -> Vec<RawMeal> {
        self.meals("filter_by_category", "filter.php", &[("c", category)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Method, MockClient};
    use serde_json::json;

    const BASE: &str = "https://catalog.test/api/json/v1/1";

    fn client(mock: MockClient) -> (CatalogClient, Arc<MockClient>) {
        let mock = Arc::new(mock);
        (CatalogClient::new(mock.clone(), BASE), mock)
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let (catalog, mock) = client(MockClient::new().with_json(
            &format!("{BASE}/search.php?s=chicken+curry"),
            json!({"meals": [{"idMeal": "1"}, {"idMeal": "2"}]}),
        ));

        let meals = catalog.search_by_name("chicken curry").await;
        assert_eq!(meals.len(), 2);
        assert_eq!(meals[1].id(), Some("2"));
        assert_eq!(mock.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_search_no_match_is_empty() {
        let (catalog, _) = client(
            MockClient::new().with_json(&format!("{BASE}/search.php?s=zzz"), json!({"meals": null})),
        );
        assert!(catalog.search_by_name("zzz").await.is_empty());
    }

    #[tokio::test]
    async fn test_failures_degrade() {
        let (catalog, _) = client(MockClient::new());
        assert!(catalog.search_by_name("x").await.is_empty());
        assert!(catalog.get_by_id("1").await.is_none());
        assert!(catalog.get_random().await.is_none());
        assert!(catalog.get_categories().await.is_empty());
        assert!(catalog.filter_by_ingredient("x").await.is_empty());
        assert!(catalog.filter_by_category("x").await.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_body_degrades() {
        let (catalog, _) = client(
            MockClient::new().with_json(&format!("{BASE}/lookup.php?i=1"), json!({"meals": "nope"})),
        );
        assert!(catalog.get_by_id("1").await.is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_takes_first() {
        let (catalog, _) = client(MockClient::new().with_json(
            &format!("{BASE}/lookup.php?i=52772"),
            json!({"meals": [{"idMeal": "52772", "strMeal": "Teriyaki Chicken"}]}),
        ));
        let meal = catalog.get_by_id("52772").await.unwrap();
        assert_eq!(meal.field("strMeal"), Some("Teriyaki Chicken"));
    }

    #[tokio::test]
    async fn test_random_batch_issues_one_call_per_draw() {
        let url = format!("{BASE}/random.php");
        let mock = MockClient::new()
            .with_json(&url, json!({"meals": [{"idMeal": "1"}]}))
            .with_response(Method::Get, &url, crate::http::MockResponse::Status(503))
            .with_json(&url, json!({"meals": [{"idMeal": "3"}]}))
            .with_json(&url, json!({"meals": null}))
            .with_json(&url, json!({"meals": [{"idMeal": "5"}]}));
        let (catalog, mock) = client(mock);

        let meals = catalog.get_random_batch(5).await;
        assert_eq!(mock.call_count(Method::Get, &url), 5);
        assert_eq!(meals.len(), 3);
    }

    #[tokio::test]
    async fn test_random_batch_bounds() {
        let url = format!("{BASE}/random.php");
        let (catalog, mock) = client(MockClient::new().with_json(&url, json!({"meals": [{"idMeal": "7"}]})));

        for n in [0usize, 1, 6, 12] {
            let before = mock.call_count(Method::Get, &url);
            let meals = catalog.get_random_batch(n).await;
            assert_eq!(meals.len(), n);
            assert_eq!(mock.call_count(Method::Get, &url) - before, n);
        }
    }

    #[tokio::test]
    async fn test_categories_and_filters() {
        let (catalog, _) = client(
            MockClient::new()
                .with_json(
                    &format!("{BASE}/categories.php"),
                    json!({"categories": [{"idCategory": "1", "strCategory": "Beef",
                        "strCategoryThumb": "t", "strCategoryDescription": "d"}]}),
                )
                .with_json(&format!("{BASE}/filter.php?i=garlic"), json!({"meals": [{"idMeal": "9"}]}))
                .with_json(&format!("{BASE}/filter.php?c=Seafood"), json!({"meals": [{"idMeal": "8"}]})),
        );

        let categories = catalog.get_categories().await;
        assert_eq!(categories[0].str_category, "Beef");
        assert_eq!(catalog.filter_by_ingredient("garlic").await[0].id(), Some("9"));
        assert_eq!(catalog.filter_by_category("Seafood").await[0].id(), Some("8"));
    }
}
