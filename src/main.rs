use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use horizon::app::{App, AppEvent};
use horizon::config::Config;
use horizon::storage::{Database, DatabaseError, JsonStore, SavedArticles};
use horizon::ui;

/// Get the config directory path (~/.config/horizon/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("horizon"))
}

#[derive(Parser, Debug)]
#[command(name = "horizon", about = "Terminal news briefings powered by Gemini")]
struct Args {
    /// Reset database (forget saved articles and the stored theme)
    #[arg(long)]
    reset_db: bool,

    /// Print saved articles and exit
    #[arg(long)]
    list_saved: bool,

    /// Use this config file instead of ~/.config/horizon/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr; the TUI owns stdout.
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
        println!("Created config directory: {}", config_dir.display());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            tracing::warn!(
                path = %config_dir.display(),
                error = %e,
                "Failed to set config directory permissions to 0700"
            );
        }
    }

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;
    tracing::debug!(?config, "Configuration loaded");

    let db_path = config_dir.join("horizon.db");
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of horizon appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    if args.reset_db {
        let removed = db.clear_all().await.context("Failed to reset database")?;
        tracing::info!(removed, "Database reset");
        println!("Database reset ({} entries removed).", removed);
    }

    if args.list_saved {
        let saved = SavedArticles::load(JsonStore::new(db)).await;
        if saved.is_empty() {
            println!("You have no saved articles.");
        }
        for article in saved.all() {
            println!("{}\n  {} ({})", article.headline, article.source_title, article.source_uri);
        }
        return Ok(());
    }

    let mut app = App::new(db, &config)
        .await
        .context("Failed to create application")?;
    tracing::debug!(model = app.gateway.model(), "Gateway ready");
    if !app.gateway.has_api_key() {
        app.set_status("No Gemini API key: set GEMINI_API_KEY or gemini_api_key in config.toml");
    }

    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);
    ui::run(&mut app, event_tx, event_rx).await?;

    println!("Goodbye!");
    Ok(())
}
