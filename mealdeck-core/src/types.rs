use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Number of indexed ingredient/measure slots in a catalog record.
pub const INGREDIENT_SLOTS: usize = 20;

/// A catalog record exactly as the upstream API returned it.
///
/// Kept as a JSON object so fields that are not promoted to `Recipe`
/// (e.g. `strYoutube`) stay reachable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawMeal(pub Map<String, Value>);

impl RawMeal {
    /// A string field, or `None` when absent, null or not a string.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    /// A string field that is present and non-empty.
    pub fn non_empty(&self, name: &str) -> Option<&str> {
        self.field(name).filter(|s| !s.is_empty())
    }

    pub fn id(&self) -> Option<&str> {
        self.field("idMeal")
    }

    pub fn ingredient(&self, slot: usize) -> Option<&str> {
        self.non_empty(&format!("strIngredient{slot}"))
    }

    pub fn measure(&self, slot: usize) -> Option<&str> {
        self.non_empty(&format!("strMeasure{slot}"))
    }
}

/// Recipe in the shape the rest of the app consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: String,
    pub title: String,
    /// First 120 characters of the instructions, or a stock blurb.
    pub description: String,
    pub image: Option<String>,
    /// Synthetic: the catalog has no timing data.
    pub cook_time: String,
    /// Synthetic: the catalog has no serving data.
    pub servings: u8,
    pub category: String,
    pub area: Option<String>,
    /// `"<ingredient> - <measure>"`, in slot order.
    pub ingredients: Vec<String>,
    /// Non-blank lines of the instructions blob, in order.
    pub instructions: Vec<String>,
    pub original_data: RawMeal,
}

/// A recipe fetched by id, with its embeddable video link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetail {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub youtube_url: String,
}

/// A catalog category record as returned by `categories.php`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(rename = "idCategory", default)]
    pub id_category: String,
    #[serde(rename = "strCategory", default)]
    pub str_category: String,
    #[serde(rename = "strCategoryThumb", default)]
    pub str_category_thumb: String,
    #[serde(rename = "strCategoryDescription", default)]
    pub str_category_description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub image: String,
    pub description: String,
}
