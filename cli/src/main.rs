mod browse;
mod favorites;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mealdeck_core::{
    AppConfig, CatalogClient, FavoriteQueries, FavoritesClient, MealQueries, Normalizer, QueryClient, ReqwestClient,
};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "mealdeck")]
#[command(about = "Browse TheMealDB recipes and manage favorites", long_about = None)]
struct Cli {
    /// Favorites backend base URL (overrides MEALDECK_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Recipe catalog base URL (overrides MEALDECK_CATALOG_URL)
    #[arg(long, global = true)]
    catalog_url: Option<String>,

    /// Seconds before a cached query is considered stale
    #[arg(long, global = true)]
    stale_secs: Option<u64>,

    /// Number of recipes in the home and search feeds
    #[arg(long, global = true)]
    feed_size: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search by name, falling back to ingredient
    Search {
        /// Search term (empty shows random recipes)
        #[arg(default_value = "")]
        term: String,
    },
    /// Read search terms from stdin, one keystroke state per line, and
    /// search each term once typing settles
    Watch {
        /// Debounce interval in milliseconds (overrides MEALDECK_SEARCH_DEBOUNCE_MS)
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
    /// Draw random recipes
    Random {
        #[arg(long, default_value_t = mealdeck_core::catalog::DEFAULT_RANDOM_BATCH)]
        count: usize,
    },
    /// Show one recipe with its video link
    Show {
        id: String,
    },
    /// Featured recipe, random feed and categories
    Home {
        /// Refetch the featured recipe and feed after loading
        #[arg(long)]
        refresh: bool,
    },
    /// List categories
    Categories,
    /// Recipes in one category
    Category {
        name: String,
    },
    /// Manage a user's favorites
    Favorites {
        #[command(subcommand)]
        command: favorites::FavoritesCommand,
    },
}

/// Console logging to stderr, filtered by RUST_LOG. Stdout carries JSON output.
fn init_telemetry() {
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let env_filter = tracing_subscriber::EnvFilter::from_default_env();

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .init();
}

/// Shared services for one CLI invocation.
pub struct App {
    pub config: AppConfig,
    pub meals: MealQueries,
    pub favorites: FavoriteQueries,
}

impl App {
    fn new(config: AppConfig) -> Result<Self> {
        let http = Arc::new(
            ReqwestClient::builder()
                .timeout(config.timeout)
                .build()
                .context("Failed to build HTTP client")?,
        );
        let cache = Arc::new(QueryClient::new(config.stale_time).with_gc_time(config.gc_time));

        let meals = MealQueries::new(
            CatalogClient::new(http.clone(), config.catalog_url.clone()),
            cache.clone(),
            Normalizer::default(),
        );
        let favorites = FavoriteQueries::new(FavoritesClient::new(http, config.api_url.clone()), cache);

        Ok(Self {
            config,
            meals,
            favorites,
        })
    }
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = match &cli.api_url {
        Some(api_url) => AppConfig::new(api_url.clone()).with_env_overrides(),
        None => AppConfig::from_env(),
    }
    .context("Failed to load configuration")?;

    if let Some(catalog_url) = &cli.catalog_url {
        config.catalog_url = catalog_url.clone();
    }
    if let Some(secs) = cli.stale_secs {
        config.stale_time = Duration::from_secs(secs);
    }
    if let Some(feed_size) = cli.feed_size {
        config.feed_size = feed_size;
    }
    Ok(config)
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", text);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry();

    let cli = Cli::parse();
    let app = App::new(load_config(&cli)?)?;

    match cli.command {
        Commands::Search { term } => browse::search(&app, &term).await?,
        Commands::Watch { debounce_ms } => {
            let delay = debounce_ms.map_or(app.config.debounce, Duration::from_millis);
            browse::watch(&app, delay).await?
        }
        Commands::Random { count } => browse::random(&app, count).await?,
        Commands::Show { id } => browse::show(&app, &id).await?,
        Commands::Home { refresh } => browse::home(&app, refresh).await?,
        Commands::Categories => browse::categories(&app).await?,
        Commands::Category { name } => browse::category(&app, &name).await?,
        Commands::Favorites { command } => favorites::run(&app, command).await?,
    }

    Ok(())
}
