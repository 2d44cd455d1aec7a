use anyhow::{bail, Context, Result};
use clap::Subcommand;
use mealdeck_core::{FavoriteToggle, NewFavorite};

use crate::{print_json, App};

#[derive(Subcommand)]
pub enum FavoritesCommand {
    /// List a user's favorites
    List {
        #[arg(long)]
        user: String,
    },
    /// Bookmark a catalog recipe, or remove the bookmark if already saved
    Toggle {
        #[arg(long)]
        user: String,
        recipe_id: String,
    },
    /// Remove a bookmark
    Remove {
        #[arg(long)]
        user: String,
        recipe_id: String,
    },
}

pub async fn run(app: &App, command: FavoritesCommand) -> Result<()> {
    match command {
        FavoritesCommand::List { user } => {
            let page = app
                .favorites
                .my_favorites(&user)
                .await
                .with_context(|| format!("Failed to list favorites for {}", user))?;
            match page {
                Some(page) => print_json(&page),
                None => bail!("A user id is required"),
            }
        }
        FavoritesCommand::Toggle { user, recipe_id } => toggle(app, &user, &recipe_id).await,
        FavoritesCommand::Remove { user, recipe_id } => {
            let confirmation = app
                .favorites
                .remove_favorite(&user, &recipe_id)
                .await
                .with_context(|| format!("Failed to remove favorite {}", recipe_id))?;
            print_json(&confirmation)
        }
    }
}

async fn toggle(app: &App, user: &str, recipe_id: &str) -> Result<()> {
    if user.is_empty() {
        bail!("A user id is required");
    }

    let detail = app
        .meals
        .get_by_id(recipe_id)
        .await
        .with_context(|| format!("Failed to load recipe {}", recipe_id))?
        .context("Recipe id must not be empty")?;

    let favorited = app
        .favorites
        .my_favorites(user)
        .await
        .context("Failed to load current favorites")?
        .is_some_and(|page| page.contains(recipe_id));

    let mut toggle = FavoriteToggle::new(NewFavorite::from_recipe(user, &detail.recipe), favorited);
    let now_favorited = toggle
        .toggle(&app.favorites)
        .await
        .with_context(|| format!("Failed to update favorite {}", recipe_id))?;

    tracing::info!(recipe_id, favorited = now_favorited, "favorite updated");
    print_json(&serde_json::json!({ "recipeId": recipe_id, "favorited": now_favorited }))
}
