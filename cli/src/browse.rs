use anyhow::{Context, Result};
use mealdeck_core::{load_home, refresh_home, search_recipes, Debouncer};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::{print_json, App};

pub async fn search(app: &App, term: &str) -> Result<()> {
    let outcome = search_recipes(&app.meals, term.trim(), app.config.feed_size)
        .await
        .with_context(|| format!("Search for {:?} failed", term))?;
    print_json(&outcome)
}

/// Each stdin line replaces the current search text, as if typed.
pub async fn watch(app: &App, delay: Duration) -> Result<()> {
    let mut debouncer = Debouncer::spawn(delay);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line.context("Failed to read stdin")? {
                    Some(line) => debouncer.push(line.trim()),
                    None => break,
                }
            }
            Some(term) = debouncer.next_settled() => run_search(app, &term).await,
        }
    }

    let mut rest = debouncer.close();
    while let Some(term) = rest.recv().await {
        run_search(app, &term).await;
    }
    Ok(())
}

async fn run_search(app: &App, term: &str) {
    match search_recipes(&app.meals, term, app.config.feed_size).await {
        Ok(outcome) => {
            if let Err(e) = print_json(&outcome) {
                tracing::error!(error = %e, "failed to print search results");
            }
        }
        Err(e) => tracing::error!(term, error = %e, "search failed"),
    }
}

pub async fn random(app: &App, count: usize) -> Result<()> {
    let recipes = app.meals.random_batch(count).await?;
    print_json(&recipes)
}

pub async fn show(app: &App, id: &str) -> Result<()> {
    let detail = app
        .meals
        .get_by_id(id)
        .await
        .with_context(|| format!("Failed to load recipe {}", id))?
        .context("Recipe id must not be empty")?;
    print_json(&detail)
}

pub async fn home(app: &App, refresh: bool) -> Result<()> {
    let feed = load_home(&app.meals, app.config.feed_size).await?;

    if !refresh {
        return print_json(&feed);
    }

    let refreshed = refresh_home(&app.meals, app.config.feed_size).await;
    if !refreshed.is_complete() {
        tracing::warn!("refresh incomplete, keeping previous results where needed");
    }
    let mut feed = feed;
    if let Some(featured) = refreshed.featured {
        feed.featured = featured;
    }
    if let Some(recipes) = refreshed.recipes {
        feed.recipes = recipes;
    }
    print_json(&feed)
}

pub async fn categories(app: &App) -> Result<()> {
    let categories = app.meals.categories().await?.unwrap_or_default();
    print_json(&categories)
}

pub async fn category(app: &App, name: &str) -> Result<()> {
    let recipes = app
        .meals
        .filter_by_category(name)
        .await
        .with_context(|| format!("Failed to list category {}", name))?;
    print_json(&recipes)
}
