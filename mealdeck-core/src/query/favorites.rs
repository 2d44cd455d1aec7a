//! Favorites query and mutations.
//!
//! Mutations invalidate the user's cached favorites list on success only.

use serde_json::Value;
use std::sync::Arc;

use super::cache::{QueryClient, QueryKey};
use crate::error::QueryError;
use crate::favorites::{normalize_favorites, FavoritesClient, FavoritesPage, FavoritesResponse, NewFavorite};

pub const MY_FAVORITES: &str = "getMyFavorites";

fn favorites_key(user_id: &str) -> QueryKey {
    QueryKey::new(MY_FAVORITES).arg(user_id)
}

#[derive(Clone)]
pub struct FavoriteQueries {
    client: FavoritesClient,
    cache: Arc<QueryClient>,
}

impl FavoriteQueries {
    pub fn new(client: FavoritesClient, cache: Arc<QueryClient>) -> Self {
        Self { client, cache }
    }

    /// The user's favorites in recipe-card shape. Enabled for a non-empty user id.
    pub async fn my_favorites(&self, user_id: &str) -> Result<Option<FavoritesPage>, QueryError> {
        if user_id.is_empty() {
            return Ok(None);
        }

        let raw: FavoritesResponse = self
            .cache
            .fetch(&favorites_key(user_id), || async {
                Ok(self.client.list_by_user(user_id).await?)
            })
            .await?;
        Ok(Some(normalize_favorites(raw)))
    }

    pub async fn add_favorite(&self, favorite: &NewFavorite) -> Result<Value, QueryError> {
        let confirmation = self.client.add(favorite).await?;
        self.cache.invalidate(&favorites_key(&favorite.user_id));
        Ok(confirmation)
    }

    pub async fn remove_favorite(&self, user_id: &str, recipe_id: &str) -> Result<Value, QueryError> {
        let confirmation = self.client.remove(user_id, recipe_id).await?;
        self.cache.invalidate(&favorites_key(user_id));
        Ok(confirmation)
    }
}

/// Optimistic bookmark state for one recipe.
///
/// `toggle` flips the flag before the mutation runs and restores it if the
/// mutation fails.
#[derive(Debug, Clone)]
pub struct FavoriteToggle {
    favorite: NewFavorite,
    favorited: bool,
}

impl FavoriteToggle {
    pub fn new(favorite: NewFavorite, favorited: bool) -> Self {
        Self { favorite, favorited }
    }

    pub fn is_favorited(&self) -> bool {
        self.favorited
    }

    /// Returns the new state, or the mutation error after rolling back.
    pub async fn toggle(&mut self, queries: &FavoriteQueries) -> Result<bool, QueryError> {
        let previous = self.favorited;
        self.favorited = !previous;

        let result = if previous {
            queries
                .remove_favorite(&self.favorite.user_id, &self.favorite.recipe_id)
                .await
        } else {
            queries.add_favorite(&self.favorite).await
        };

        match result {
            Ok(_) => Ok(self.favorited),
            Err(e) => {
                tracing::warn!(
                    recipe_id = %self.favorite.recipe_id,
                    error = %e,
                    "favorite toggle failed, rolling back"
                );
                self.favorited = previous;
                Err(e)
            }
        }
    }
}
