//! Cached catalog queries.
//!
//! Raw catalog output is cached; normalization runs on every read, so the
//! synthetic fields of a recipe may differ between reads of the same entry.

use std::sync::Arc;

use super::cache::{QueryClient, QueryKey};
use crate::catalog::CatalogClient;
use crate::error::QueryError;
use crate::normalize::{normalize_categories, Normalizer};
use crate::types::{Category, RawCategory, RawMeal, Recipe, RecipeDetail};

pub const SEARCH_BY_NAME: &str = "searchMealByName";
pub const GET_BY_ID: &str = "getMealById";
pub const RANDOM: &str = "getRandomMeal";
pub const RANDOM_BATCH: &str = "getRandomMeals";
pub const CATEGORIES: &str = "getCategories";
pub const FILTER_BY_INGREDIENT: &str = "filterByIngredient";
pub const FILTER_BY_CATEGORY: &str = "filterByCategory";

/// Catalog operations exposed as cached, de-duplicated queries.
///
/// Methods returning `Option` yield `None` when the query's enablement
/// condition is false; nothing is dispatched in that case.
#[derive(Clone)]
pub struct MealQueries {
    catalog: CatalogClient,
    cache: Arc<QueryClient>,
    normalizer: Normalizer,
}

impl MealQueries {
    pub fn new(catalog: CatalogClient, cache: Arc<QueryClient>, normalizer: Normalizer) -> Self {
        Self {
            catalog,
            cache,
            normalizer,
        }
    }

    /// Enabled when `enabled` is set and `query` is non-empty.
    pub async fn search_by_name(&self, query: &str, enabled: bool) -> Result<Option<Vec<Recipe>>, QueryError> {
        if !enabled || query.is_empty() {
            return Ok(None);
        }

        let key = QueryKey::new(SEARCH_BY_NAME).arg(query);
        let raw: Vec<RawMeal> = self
            .cache
            .fetch(&key, || async { Ok(self.catalog.search_by_name(query).await) })
            .await?;
        Ok(Some(self.normalizer.recipes(&raw)))
    }

    /// Recipe detail with its embed link. Enabled when `id` is non-empty.
    ///
    /// An unknown id or a record without a video id is an error.
    pub async fn get_by_id(&self, id: &str) -> Result<Option<RecipeDetail>, QueryError> {
        if id.is_empty() {
            return Ok(None);
        }

        let key = QueryKey::new(GET_BY_ID).arg(id);
        let raw: Option<RawMeal> = self
            .cache
            .fetch(&key, || async { Ok(self.catalog.get_by_id(id).await) })
            .await?;
        let raw = raw.ok_or_else(|| QueryError::NotFound(key.to_string()))?;
        Ok(Some(self.normalizer.detail(&raw)?))
    }

    pub async fn random(&self) -> Result<Option<Recipe>, QueryError> {
        let raw = self.random_raw(false).await?;
        Ok(self.normalizer.maybe_recipe(raw.as_ref()))
    }

    /// Drop the cached featured recipe and draw a new one.
    pub async fn refetch_random(&self) -> Result<Option<Recipe>, QueryError> {
        let raw = self.random_raw(true).await?;
        Ok(self.normalizer.maybe_recipe(raw.as_ref()))
    }

    async fn random_raw(&self, force: bool) -> Result<Option<RawMeal>, QueryError> {
        let key = QueryKey::new(RANDOM);
        let fetcher = || async { Ok(self.catalog.get_random().await) };
        if force {
            self.cache.refetch(&key, fetcher).await
        } else {
            self.cache.fetch(&key, fetcher).await
        }
    }

    pub async fn random_batch(&self, count: usize) -> Result<Vec<Recipe>, QueryError> {
        let raw = self.random_batch_raw(count, false).await?;
        Ok(self.normalizer.recipes(&raw))
    }

    pub async fn refetch_random_batch(&self, count: usize) -> Result<Vec<Recipe>, QueryError> {
        let raw = self.random_batch_raw(count, true).await?;
        Ok(self.normalizer.recipes(&raw))
    }

    async fn random_batch_raw(&self, count: usize, force: bool) -> Result<Vec<RawMeal>, QueryError> {
        let key = QueryKey::new(RANDOM_BATCH).arg(count);
        let fetcher = || async { Ok(self.catalog.get_random_batch(count).await) };
        if force {
            self.cache.refetch(&key, fetcher).await
        } else {
            self.cache.fetch(&key, fetcher).await
        }
    }

    /// `None` when the catalog returned no categories.
    pub async fn categories(&self) -> Result<Option<Vec<Category>>, QueryError> {
        let key = QueryKey::new(CATEGORIES);
        let raw: Vec<RawCategory> = self
            .cache
            .fetch(&key, || async { Ok(self.catalog.get_categories().await) })
            .await?;
        Ok(normalize_categories(&raw))
    }

    /// Enabled when `enabled` is set and `ingredient` is non-empty.
    pub async fn filter_by_ingredient(
        &self,
        ingredient: &str,
        enabled: bool,
    ) -> Result<Option<Vec<Recipe>>, QueryError> {
        if !enabled || ingredient.is_empty() {
            return Ok(None);
        }

        let key = QueryKey::new(FILTER_BY_INGREDIENT).arg(ingredient);
        let raw: Vec<RawMeal> = self
            .cache
            .fetch(&key, || async { Ok(self.catalog.filter_by_ingredient(ingredient).await) })
            .await?;
        Ok(Some(self.normalizer.recipes(&raw)))
    }

    pub async fn filter_by_category(&self, category: &str) -> Result<Vec<Recipe>, QueryError> {
        let key = QueryKey::new(FILTER_BY_CATEGORY).arg(category);
        let raw: Vec<RawMeal> = self
            .cache
            .fetch(&key, || async { Ok(self.catalog.filter_by_category(category).await) })
            .await?;
        Ok(self.normalizer.recipes(&raw))
    }
}
