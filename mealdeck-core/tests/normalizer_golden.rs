//! Golden file tests for catalog normalization.
//!
//! Each fixture in `fixtures/catalog/` pairs a raw catalog record with the
//! recipe it should normalize to under fixed enrichment.

use mealdeck_core::{FixedEnrichment, Normalizer, RawMeal};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct TestCase {
    raw: RawMeal,
    expected: ExpectedRecipe,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpectedRecipe {
    id: String,
    title: String,
    description: String,
    image: Option<String>,
    category: String,
    area: Option<String>,
    ingredients: Vec<String>,
    instructions: Vec<String>,
    /// `None` when the record has no usable video id.
    youtube_url: Option<String>,
}

fn fixture_paths() -> Vec<PathBuf> {
    let pattern = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/catalog/*.json")
        .to_string_lossy()
        .into_owned();

    let paths: Vec<PathBuf> = glob::glob(&pattern)
        .expect("Invalid fixture pattern")
        .filter_map(Result::ok)
        .collect();

    assert!(!paths.is_empty(), "No fixtures matched {}", pattern);
    paths
}

fn load(path: &Path) -> TestCase {
    let content =
        fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&content).unwrap_or_else(|e| panic!("Failed to parse {}: {}", path.display(), e))
}

#[test]
fn golden_normalization() {
    let normalizer = Normalizer::new(Arc::new(FixedEnrichment::new("30 mins", 2)));
    let mut failures = Vec::new();

    for path in fixture_paths() {
        let name = path.file_stem().unwrap().to_string_lossy().into_owned();
        let case = load(&path);
        let recipe = normalizer.recipe(&case.raw);
        let expected = &case.expected;

        let mut check = |field: &str, ok: bool, actual: String, want: String| {
            if !ok {
                failures.push(format!("{name}.{field}: expected {want}, got {actual}"));
            }
        };

        check("id", recipe.id == expected.id, recipe.id.clone(), expected.id.clone());
        check("title", recipe.title == expected.title, recipe.title.clone(), expected.title.clone());
        check(
            "description",
            recipe.description == expected.description,
            format!("{:?}", recipe.description),
            format!("{:?}", expected.description),
        );
        check(
            "image",
            recipe.image == expected.image,
            format!("{:?}", recipe.image),
            format!("{:?}", expected.image),
        );
        check(
            "category",
            recipe.category == expected.category,
            recipe.category.clone(),
            expected.category.clone(),
        );
        check(
            "area",
            recipe.area == expected.area,
            format!("{:?}", recipe.area),
            format!("{:?}", expected.area),
        );
        check(
            "ingredients",
            recipe.ingredients == expected.ingredients,
            format!("{:?}", recipe.ingredients),
            format!("{:?}", expected.ingredients),
        );
        check(
            "instructions",
            recipe.instructions == expected.instructions,
            format!("{:?}", recipe.instructions),
            format!("{:?}", expected.instructions),
        );
        check("cookTime", recipe.cook_time == "30 mins", recipe.cook_time.clone(), "30 mins".into());
        check("servings", recipe.servings == 2, recipe.servings.to_string(), "2".into());
        check(
            "originalData",
            recipe.original_data == case.raw,
            "modified record".into(),
            "raw record".into(),
        );

        let youtube_url = normalizer.detail(&case.raw).ok().map(|d| d.youtube_url);
        check(
            "youtubeUrl",
            youtube_url == expected.youtube_url,
            format!("{:?}", youtube_url),
            format!("{:?}", expected.youtube_url),
        );
    }

    assert!(failures.is_empty(), "Golden mismatches:\n{}", failures.join("\n"));
}
