//! Search screen: name search with ingredient-search fallback.

use serde::Serialize;

use crate::error::QueryError;
use crate::query::MealQueries;
use crate::types::Recipe;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSource {
    /// No term: random recipes.
    Popular,
    Name,
    Ingredient,
    /// A term with no results from either search.
    Empty,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub term: String,
    pub source: SearchSource,
    pub recipes: Vec<Recipe>,
}

/// Whether the ingredient search may run for `term`.
///
/// `name_results` is `None` while the name search is disabled or failed.
pub fn ingredient_search_enabled(term: &str, name_results: Option<&[Recipe]>) -> bool {
    !term.is_empty() && name_results.is_none_or(|recipes| recipes.is_empty())
}

/// Resolve what the search screen shows for a settled term.
///
/// A failed name search counts as "no results" and lets the ingredient
/// search run; the outcome is an error only when both fail, or when the
/// random feed fails for an empty term.
pub async fn search_recipes(queries: &MealQueries, term: &str, limit: usize) -> Result<SearchOutcome, QueryError> {
    if term.is_empty() {
        let recipes = queries.random_batch(limit).await?;
        return Ok(outcome(term, SearchSource::Popular, recipes, limit));
    }

    let (by_name, name_error) = match queries.search_by_name(term, true).await {
        Ok(results) => (results, None),
        Err(e) => {
            tracing::warn!(term, error = %e, "name search failed, trying ingredients");
            (None, Some(e))
        }
    };

    if let Some(recipes) = by_name.as_ref().filter(|r| !r.is_empty()) {
        return Ok(outcome(term, SearchSource::Name, recipes.clone(), limit));
    }

    let enabled = ingredient_search_enabled(term, by_name.as_deref());
    match queries.filter_by_ingredient(term, enabled).await {
        Ok(Some(recipes)) if !recipes.is_empty() => Ok(outcome(term, SearchSource::Ingredient, recipes, limit)),
        Ok(_) => Ok(outcome(term, SearchSource::Empty, Vec::new(), limit)),
        Err(ingredient_error) => match name_error {
            Some(name_error) => {
                tracing::error!(term, error = %ingredient_error, "ingredient search failed too");
                Err(name_error)
            }
            None => {
                tracing::warn!(term, error = %ingredient_error, "ingredient search failed");
                Ok(outcome(term, SearchSource::Empty, Vec::new(), limit))
            }
        },
    }
}

fn outcome(term: &str, source: SearchSource, mut recipes: Vec<Recipe>, limit: usize) -> SearchOutcome {
    recipes.truncate(limit);
    SearchOutcome {
        term: term.to_string(),
        source,
        recipes,
    }
}
