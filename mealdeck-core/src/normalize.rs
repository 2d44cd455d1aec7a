//! Catalog record normalization.
//!
//! Maps raw catalog records into `Recipe` / `Category`. Everything here is
//! pure apart from the injected `EnrichmentSource`.

use std::sync::Arc;

use crate::enrichment::{EnrichmentSource, RandomEnrichment};
use crate::error::NormalizeError;
use crate::types::{Category, RawCategory, RawMeal, Recipe, RecipeDetail, INGREDIENT_SLOTS};

pub const DEFAULT_CATEGORY: &str = "Main Course";
pub const DEFAULT_DESCRIPTION: &str = "Delicious meal from TheMealDB";
pub const DESCRIPTION_CHARS: usize = 120;
pub const YOUTUBE_EMBED_BASE: &str = "https://www.youtube.com/embed/";

/// Turns catalog records into recipes, filling synthetic fields from its source.
#[derive(Debug, Clone)]
pub struct Normalizer {
    enrichment: Arc<dyn EnrichmentSource>,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(Arc::new(RandomEnrichment))
    }
}

impl Normalizer {
    pub fn new(enrichment: Arc<dyn EnrichmentSource>) -> Self {
        Self { enrichment }
    }

    /// Normalize an optional record; `None` in, `None` out.
    pub fn maybe_recipe(&self, raw: Option<&RawMeal>) -> Option<Recipe> {
        raw.map(|meal| self.recipe(meal))
    }

    pub fn recipe(&self, raw: &RawMeal) -> Recipe {
        let instructions_blob = raw.non_empty("strInstructions");

        Recipe {
            id: raw.id().unwrap_or_default().to_string(),
            title: raw.field("strMeal").unwrap_or_default().to_string(),
            description: describe(instructions_blob),
            image: raw.field("strMealThumb").map(str::to_string),
            cook_time: self.enrichment.cook_time(),
            servings: self.enrichment.servings(),
            category: raw
                .non_empty("strCategory")
                .unwrap_or(DEFAULT_CATEGORY)
                .to_string(),
            area: raw.field("strArea").map(str::to_string),
            ingredients: extract_ingredients(raw),
            instructions: instructions_blob.map(split_instructions).unwrap_or_default(),
            original_data: raw.clone(),
        }
    }

    pub fn recipes(&self, raw: &[RawMeal]) -> Vec<Recipe> {
        raw.iter().map(|meal| self.recipe(meal)).collect()
    }

    /// Normalize a record fetched by id and attach its embed link.
    ///
    /// Fails when the record's video link carries no video id.
    pub fn detail(&self, raw: &RawMeal) -> Result<RecipeDetail, NormalizeError> {
        let recipe = self.recipe(raw);
        let youtube_url = youtube_embed_url(recipe.original_data.field("strYoutube"))?;
        Ok(RecipeDetail {
            recipe,
            youtube_url,
        })
    }
}

/// Collect `"<ingredient> - <measure>"` for slots 1..=20.
///
/// A slot counts only when the ingredient is non-blank and the measure field
/// is a non-empty string. A whitespace-only measure renders as an empty measure.
pub fn extract_ingredients(raw: &RawMeal) -> Vec<String> {
    (1..=INGREDIENT_SLOTS)
        .filter_map(|slot| {
            let ingredient = raw.ingredient(slot)?.trim();
            let measure = raw.measure(slot)?.trim();
            if ingredient.is_empty() {
                return None;
            }
            Some(format!("{ingredient} - {measure}"))
        })
        .collect()
}

/// Split an instructions blob on `\n` / `\r\n`, dropping blank lines.
pub fn split_instructions(blob: &str) -> Vec<String> {
    blob.lines()
        .filter(|step| !step.trim().is_empty())
        .map(str::to_string)
        .collect()
}

fn describe(instructions: Option<&str>) -> String {
    match instructions {
        Some(text) => {
            let head: String = text.chars().take(DESCRIPTION_CHARS).collect();
            format!("{head}...")
        }
        None => DEFAULT_DESCRIPTION.to_string(),
    }
}

/// Build an embed URL from a watch link's `v` parameter.
///
/// Links that do not parse as URLs fall back to the text after the first `v=`,
/// up to the next `&`.
pub fn youtube_embed_url(link: Option<&str>) -> Result<String, NormalizeError> {
    let link = link.unwrap_or_default();

    let video_id = match url::Url::parse(link) {
        Ok(parsed) => parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned()),
        Err(_) => link
            .split("v=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .map(str::to_string),
    };

    match video_id {
        Some(id) if !id.trim().is_empty() => Ok(format!("{YOUTUBE_EMBED_BASE}{id}")),
        _ => Err(NormalizeError::MissingVideoId(link.to_string())),
    }
}

/// Rename category fields.
///
/// Returns `None` for an empty list, so callers cannot tell "no categories"
/// apart from "nothing to transform".
pub fn normalize_categories(raw: &[RawCategory]) -> Option<Vec<Category>> {
    if raw.is_empty() {
        return None;
    }

    Some(
        raw.iter()
            .map(|cat| Category {
                id: cat.id_category.clone(),
                name: cat.str_category.clone(),
                image: cat.str_category_thumb.clone(),
                description: cat.str_category_description.clone(),
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrichment::FixedEnrichment;
    use serde_json::{json, Value};

    fn raw(value: Value) -> RawMeal {
        serde_json::from_value(value).unwrap()
    }

    fn normalizer() -> Normalizer {
        Normalizer::new(Arc::new(FixedEnrichment::new("15 mins", 2)))
    }

    #[test]
    fn test_teriyaki_example() {
        let meal = raw(json!({
            "idMeal": "52772",
            "strMeal": "Teriyaki Chicken",
            "strIngredient1": "chicken",
            "strMeasure1": "1 lb",
            "strInstructions": "Step1\nStep2"
        }));

        let recipe = normalizer().recipe(&meal);
        assert_eq!(recipe.id, "52772");
        assert_eq!(recipe.title, "Teriyaki Chicken");
        assert_eq!(recipe.ingredients, vec!["chicken - 1 lb"]);
        assert_eq!(recipe.instructions, vec!["Step1", "Step2"]);
        assert_eq!(recipe.category, "Main Course");
        assert_eq!(recipe.cook_time, "15 mins");
        assert_eq!(recipe.servings, 2);
        assert_eq!(recipe.description, "Step1\nStep2...");
        assert_eq!(recipe.original_data, meal);
    }

    #[test]
    fn test_maybe_recipe_none() {
        assert!(normalizer().maybe_recipe(None).is_none());
    }

    #[test]
    fn test_ingredients_skip_incomplete_slots_and_keep_order() {
        let meal = raw(json!({
            "strIngredient1": "rice",
            "strMeasure1": "2 cups",
            "strIngredient2": "salt",
            "strMeasure2": "",
            "strIngredient3": "",
            "strMeasure3": "1 tsp",
            "strIngredient4": "  soy sauce ",
            "strMeasure4": " 3 tbsp",
            "strIngredient5": null,
            "strIngredient6": "water",
            "strMeasure6": " ",
            "strIngredient20": "sesame",
            "strMeasure20": "pinch",
            "strIngredient21": "ignored",
            "strMeasure21": "ignored"
        }));

        assert_eq!(
            extract_ingredients(&meal),
            vec![
                "rice - 2 cups",
                "soy sauce - 3 tbsp",
                "water - ",
                "sesame - pinch"
            ]
        );
    }

    #[test]
    fn test_blank_ingredient_name_is_skipped() {
        let meal = raw(json!({"strIngredient1": "   ", "strMeasure1": "1 cup"}));
        assert!(extract_ingredients(&meal).is_empty());
    }

    #[test]
    fn test_split_instructions_drops_blank_lines() {
        let steps = split_instructions("Boil water.\r\n\r\nAdd pasta.\n   \nDrain.\n");
        assert_eq!(steps, vec!["Boil water.", "Add pasta.", "Drain."]);
        assert!(split_instructions("").is_empty());
        assert!(split_instructions("\n\r\n  ").is_empty());
    }

    #[test]
    fn test_missing_instructions() {
        let recipe = normalizer().recipe(&raw(json!({"idMeal": "1", "strInstructions": null})));
        assert!(recipe.instructions.is_empty());
        assert_eq!(recipe.description, DEFAULT_DESCRIPTION);
    }

    #[test]
    fn test_description_truncates_on_char_boundary() {
        let long = "é".repeat(200);
        let recipe = normalizer().recipe(&raw(json!({"strInstructions": long})));
        assert_eq!(recipe.description.chars().count(), DESCRIPTION_CHARS + 3);
        assert!(recipe.description.ends_with("..."));
    }

    #[test]
    fn test_partial_filter_record() {
        let recipe = normalizer().recipe(&raw(json!({
            "strMeal": "Beef Wellington",
            "strMealThumb": "https://img.test/w.jpg",
            "idMeal": "52803"
        })));
        assert_eq!(recipe.image.as_deref(), Some("https://img.test/w.jpg"));
        assert_eq!(recipe.category, DEFAULT_CATEGORY);
        assert!(recipe.area.is_none());
        assert!(recipe.ingredients.is_empty());
    }

    #[test]
    fn test_youtube_embed_url() {
        assert_eq!(
            youtube_embed_url(Some("https://www.youtube.com/watch?v=4aZr5hZXP_s")).unwrap(),
            "https://www.youtube.com/embed/4aZr5hZXP_s"
        );
        assert_eq!(
            youtube_embed_url(Some("https://www.youtube.com/watch?feature=share&v=abc")).unwrap(),
            "https://www.youtube.com/embed/abc"
        );
        assert_eq!(youtube_embed_url(Some("watch?v=xyz")).unwrap(), "https://www.youtube.com/embed/xyz");
        assert_eq!(
            youtube_embed_url(Some("https://www.youtube.com/watch?v=abc&t=30s")).unwrap(),
            "https://www.youtube.com/embed/abc"
        );
        assert_eq!(youtube_embed_url(Some("watch?v=xyz&t=30s")).unwrap(), "https://www.youtube.com/embed/xyz");
    }

    #[test]
    fn test_youtube_embed_url_missing_id() {
        assert!(matches!(
            youtube_embed_url(Some("https://www.youtube.com/")),
            Err(NormalizeError::MissingVideoId(_))
        ));
        assert!(youtube_embed_url(Some("")).is_err());
        assert!(youtube_embed_url(None).is_err());
        assert!(youtube_embed_url(Some("https://www.youtube.com/watch?v=")).is_err());
    }

    #[test]
    fn test_detail_requires_video() {
        let meal = raw(json!({"idMeal": "1", "strMeal": "Soup"}));
        assert!(normalizer().detail(&meal).is_err());

        let meal = raw(json!({"idMeal": "1", "strYoutube": "https://www.youtube.com/watch?v=q"}));
        let detail = normalizer().detail(&meal).unwrap();
        assert_eq!(detail.recipe.id, "1");
        assert_eq!(detail.youtube_url, "https://www.youtube.com/embed/q");
    }

    #[test]
    fn test_normalize_categories() {
        assert!(normalize_categories(&[]).is_none());

        let raw = vec![RawCategory {
            id_category: "1".to_string(),
            str_category: "Beef".to_string(),
            str_category_thumb: "https://img.test/beef.png".to_string(),
            str_category_description: "Cow".to_string(),
        }];
        let categories = normalize_categories(&raw).unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "Beef");
        assert_eq!(categories[0].image, "https://img.test/beef.png");
    }
}
