//! Placeholder enrichment for fields the catalog does not carry.
//!
//! The catalog has no cook time or serving count, so every normalized recipe
//! gets synthetic values from an `EnrichmentSource`. These are NOT sourced
//! facts. Production uses `RandomEnrichment`; tests pin values with
//! `FixedEnrichment`.

use rand::Rng;
use std::fmt;

/// Cook times a recipe may be labelled with.
pub const COOK_TIMES: &[&str] = &["30 mins", "15 mins", "20 mins", "40 mins"];

/// Inclusive serving range.
pub const MIN_SERVINGS: u8 = 1;
pub const MAX_SERVINGS: u8 = 4;

/// Supplies the synthetic fields of a recipe.
pub trait EnrichmentSource: Send + Sync + fmt::Debug {
    fn cook_time(&self) -> String;

    fn servings(&self) -> u8;
}

/// Draws a fresh cook time and serving count on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomEnrichment;

impl EnrichmentSource for RandomEnrichment {
    fn cook_time(&self) -> String {
        let idx = rand::rng().random_range(0..COOK_TIMES.len());
        COOK_TIMES[idx].to_string()
    }

    fn servings(&self) -> u8 {
        rand::rng().random_range(MIN_SERVINGS..=MAX_SERVINGS)
    }
}

/// Always returns the same values.
#[derive(Debug, Clone)]
pub struct FixedEnrichment {
    pub cook_time: String,
    pub servings: u8,
}

impl FixedEnrichment {
    pub fn new(cook_time: &str, servings: u8) -> Self {
        Self {
            cook_time: cook_time.to_string(),
            servings,
        }
    }
}

impl Default for FixedEnrichment {
    fn default() -> Self {
        Self::new(COOK_TIMES[0], 2)
    }
}

impl EnrichmentSource for FixedEnrichment {
    fn cook_time(&self) -> String {
        self.cook_time.clone()
    }

    fn servings(&self) -> u8 {
        self.servings
    }
}
