//! Client for the app's own favorites backend.
//!
//! Routes:
//! - `POST   /favorites` (body: `NewFavorite`) -> created record
//! - `GET    /favorites/:userId` -> `{ data, meta }`
//! - `DELETE /favorites/:userId/:recipeId` -> confirmation
//!
//! Unlike the catalog client, failures are returned as `FavoriteError` so
//! callers can roll back optimistic state.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::error::FavoriteError;
use crate::http::{build_url, HttpClient};
use crate::types::Recipe;

/// Body of an add-favorite request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewFavorite {
    pub user_id: String,
    pub recipe_id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub serving: u32,
    pub cooking_time: String,
}

impl NewFavorite {
    pub fn from_recipe(user_id: &str, recipe: &Recipe) -> Self {
        Self {
            user_id: user_id.to_string(),
            recipe_id: recipe.id.clone(),
            title: recipe.title.clone(),
            image_url: recipe.image.clone(),
            serving: u32::from(recipe.servings),
            cooking_time: recipe.cook_time.clone(),
        }
    }
}

/// A stored favorite as the backend returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecord {
    pub user_id: String,
    pub recipe_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub serving: Option<u32>,
    #[serde(default)]
    pub cooking_time: Option<String>,
    /// Backend-owned fields (row id, timestamps, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A favorite in recipe-card shape: the stored record plus `id` (the recipe
/// id) and `image` (the image URL).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FavoriteRecipe {
    pub id: String,
    pub image: Option<String>,
    pub title: String,
    pub user_id: String,
    pub recipe_id: String,
    pub image_url: Option<String>,
    pub serving: Option<u32>,
    pub cooking_time: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<FavoriteRecord> for FavoriteRecipe {
    fn from(record: FavoriteRecord) -> Self {
        // `id` and `image` are redefined below; drop any backend fields of the same name.
        let mut extra = record.extra;
        extra.remove("id");
        extra.remove("image");

        Self {
            id: record.recipe_id.clone(),
            image: record.image_url.clone(),
            title: record.title,
            user_id: record.user_id,
            recipe_id: record.recipe_id,
            image_url: record.image_url,
            serving: record.serving,
            cooking_time: record.cooking_time,
            extra,
        }
    }
}

/// `data` may be a single record or a list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Raw list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoritesResponse {
    pub data: OneOrMany<FavoriteRecord>,
    #[serde(default)]
    pub meta: Value,
}

/// A user's favorites in recipe-card shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoritesPage {
    pub data: Vec<FavoriteRecipe>,
    pub meta: Value,
}

impl FavoritesPage {
    pub fn contains(&self, recipe_id: &str) -> bool {
        self.data.iter().any(|favorite| favorite.id == recipe_id)
    }
}

pub fn normalize_favorites(response: FavoritesResponse) -> FavoritesPage {
    FavoritesPage {
        data: response
            .data
            .into_vec()
            .into_iter()
            .map(FavoriteRecipe::from)
            .collect(),
        meta: response.meta,
    }
}

#[derive(Clone)]
pub struct FavoritesClient {
    http: Arc<dyn HttpClient>,
    base_url: String,
}

impl FavoritesClient {
    pub fn new(http: Arc<dyn HttpClient>, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub async fn add(&self, favorite: &NewFavorite) -> Result<Value, FavoriteError> {
        let url = build_url(&self.base_url, &["favorites"], &[])?;
        let body = serde_json::to_value(favorite).map_err(|e| FavoriteError::Encode(e.to_string()))?;

        self.http.post_json(&url, &body).await.map_err(|e| {
            tracing::error!(user_id = %favorite.user_id, recipe_id = %favorite.recipe_id, error = %e, "adding favorite failed");
            e.into()
        })
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<FavoritesResponse, FavoriteError> {
        let url = build_url(&self.base_url, &["favorites", user_id], &[])?;

        let body = self.http.get_json(&url).await.map_err(|e| {
            tracing::error!(user_id, error = %e, "listing favorites failed");
            FavoriteError::from(e)
        })?;

        serde_json::from_value(body).map_err(|e| {
            tracing::error!(user_id, error = %e, "favorites response did not decode");
            FavoriteError::UnexpectedResponse(e.to_string())
        })
    }

    pub async fn remove(&self, user_id: &str, recipe_id: &str) -> Result<Value, FavoriteError> {
        let url = build_url(&self.base_url, &["favorites", user_id, recipe_id], &[])?;

        self.http.delete_json(&url).await.map_err(|e| {
            tracing::error!(user_id, recipe_id, error = %e, "removing favorite failed");
            e.into()
        })
    }
}
