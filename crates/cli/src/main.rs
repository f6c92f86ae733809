mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fishdex_core::FishDex;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// FishDex: a personal catch log and species tracker
#[derive(Parser)]
#[command(name = "fishdex", version, about)]
struct Cli {
    /// Path to the catalog database
    #[arg(long, env = "FISHDEX_CATALOG", default_value_t = default_catalog_path())]
    catalog: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a new catch
    Log {
        /// Reference species ID (see `fishdex reference search`)
        #[arg(long)]
        species: String,
        /// Where the fish was caught
        #[arg(long)]
        location: String,
        /// When it was caught, as "YYYY-MM-DD HH:MM" (default: now)
        #[arg(long)]
        at: Option<String>,
        /// Photo of the catch
        #[arg(long)]
        photo: Option<PathBuf>,
    },
    /// Show the catch log, newest first
    Catches {
        /// Only show rows containing this text
        filter: Option<String>,
        /// Sort by column name, e.g. "Location"
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
        /// Decode photos and show their dimensions
        #[arg(long)]
        photos: bool,
    },
    /// Show every species caught so far, latest discovery first
    Species {
        /// Only show rows containing this text
        filter: Option<String>,
        /// Sort by column name, e.g. "Quantity Caught"
        #[arg(long)]
        sort: Option<String>,
        /// Sort descending
        #[arg(long)]
        desc: bool,
    },
    /// Browse or load the reference species table
    Reference {
        #[command(subcommand)]
        action: ReferenceAction,
    },
    /// Show or extract the photo of a catch
    Photo {
        /// Catch ID
        id: i64,
        /// Write the photo to this file
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Show catalog summary
    Status,
    /// Show or change settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ReferenceAction {
    /// Import species from a JSON file (existing IDs are skipped)
    Import {
        /// Path to the JSON file
        path: PathBuf,
    },
    /// Search reference species by name
    Search {
        /// Text to look for
        text: String,
        /// Match the scientific name instead of the common name
        #[arg(long)]
        scientific: bool,
    },
    /// Show one reference species
    Show {
        /// Species ID
        id: i64,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current settings
    Show,
    /// Set the longest side, in pixels, that new photos are scaled down to
    PhotoSize {
        /// Size in pixels
        pixels: u32,
    },
}

fn default_catalog_path() -> String {
    dirs_path().to_string_lossy().to_string()
}

fn dirs_path() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".fishdex").join("fishdex.db")
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fishdex=warn,fishdex_core=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let catalog_path = PathBuf::from(&cli.catalog);
    debug!(catalog = %catalog_path.display(), "opening catalog");
    let mut dex = FishDex::open(&catalog_path)?;

    match cli.command {
        Commands::Log {
            species,
            location,
            at,
            photo,
        } => commands::log::run(&mut dex, species, location, at, photo)?,
        Commands::Catches {
            filter,
            sort,
            desc,
            photos,
        } => commands::catches::run(&dex, filter.as_deref(), sort.as_deref(), desc, photos)?,
        Commands::Species { filter, sort, desc } => {
            commands::species::run(&dex, filter.as_deref(), sort.as_deref(), desc)?
        }
        Commands::Reference { action } => match action {
            ReferenceAction::Import { path } => commands::reference::import(&mut dex, path)?,
            ReferenceAction::Search { text, scientific } => {
                commands::reference::search(&dex, &text, scientific)?
            }
            ReferenceAction::Show { id } => commands::reference::show(&dex, id)?,
        },
        Commands::Photo { id, out } => commands::photo::run(&dex, id, out)?,
        Commands::Status => commands::status::run(&dex, &catalog_path)?,
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(&dex)?,
            ConfigAction::PhotoSize { pixels } => commands::config::photo_size(&dex, pixels)?,
        },
    }

    Ok(())
}
