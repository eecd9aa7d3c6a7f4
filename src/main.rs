//! Catalog command-line tool.
//!
//! Loads JSON batches into a catalog database and prints rankings as JSON.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use music_catalog_store::catalog_store::{
    AlbumRelease, CatalogStore, SingleSong, SongRating, SqliteCatalogStore, YearRange,
};
use music_catalog_store::config::{AppConfig, CliConfig, FileConfig};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "catalog-cli")]
#[command(about = "Load and query a music catalog database")]
struct CliArgs {
    /// Path to the SQLite catalog database, created when missing.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Path to a TOML config file. Its values override command-line options.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Milliseconds to wait on a database locked by another process.
    #[arg(long, global = true)]
    busy_timeout_ms: Option<u64>,

    /// Default log level, e.g. "debug". LOG_LEVEL takes precedence.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a JSON array of singles.
    LoadSingles { file: PathBuf },

    /// Load a JSON array of albums.
    LoadAlbums { file: PathBuf },

    /// Load a JSON array of usernames.
    LoadUsers { file: PathBuf },

    /// Load a JSON array of ratings.
    LoadRatings {
        file: PathBuf,

        /// Print why each rating was rejected.
        #[arg(long, default_value_t = false)]
        detailed: bool,
    },

    /// Artists with the most singles released in a year range.
    ProlificArtists {
        #[arg(long)]
        n: Option<usize>,
        #[arg(long)]
        from: i32,
        #[arg(long)]
        to: i32,
    },

    /// Artists whose last single came out in the given year.
    LastSingleYear { year: i32 },

    /// Genres with the most songs.
    TopGenres {
        #[arg(long)]
        n: Option<usize>,
    },

    /// Artists that released both singles and albums.
    AlbumAndSingleArtists,

    /// Songs with the most ratings given in a year range.
    MostRatedSongs {
        #[arg(long)]
        from: i32,
        #[arg(long)]
        to: i32,
        #[arg(long)]
        n: Option<usize>,
    },

    /// Listeners who gave the most ratings in a year range.
    MostEngagedListeners {
        #[arg(long)]
        from: i32,
        #[arg(long)]
        to: i32,
        #[arg(long)]
        n: Option<usize>,
    },

    /// Print row counts.
    Stats,

    /// Delete every catalog row.
    Clear,
}

fn read_entries<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {:?}", path))?;
    serde_json::from_str(&content).with_context(|| format!("Failed to parse input file: {:?}", path))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let default_directive: Directive = level
        .parse()
        .unwrap_or_else(|_| LevelFilter::INFO.into());
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(default_directive)
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to install tracing subscriber")
}

fn run(store: &SqliteCatalogStore, command: Command, default_limit: usize) -> Result<()> {
    match command {
        Command::LoadSingles { file } => {
            let singles: Vec<SingleSong> = read_entries(&file)?;
            print_json(&store.load_singles(&singles)?)
        }
        Command::LoadAlbums { file } => {
            let albums: Vec<AlbumRelease> = read_entries(&file)?;
            print_json(&store.load_albums(&albums)?)
        }
        Command::LoadUsers { file } => {
            let usernames: Vec<String> = read_entries(&file)?;
            print_json(&store.load_users(&usernames)?)
        }
        Command::LoadRatings { file, detailed } => {
            let ratings: Vec<SongRating> = read_entries(&file)?;
            if detailed {
                print_json(&store.load_ratings_detailed(&ratings)?)
            } else {
                print_json(&store.load_ratings(&ratings)?)
            }
        }
        Command::ProlificArtists { n, from, to } => print_json(
            &store.most_prolific_individual_artists(
                n.unwrap_or(default_limit),
                YearRange::new(from, to),
            )?,
        ),
        Command::LastSingleYear { year } => print_json(&store.artists_last_single_in_year(year)?),
        Command::TopGenres { n } => print_json(&store.top_song_genres(n.unwrap_or(default_limit))?),
        Command::AlbumAndSingleArtists => print_json(&store.album_and_single_artists()?),
        Command::MostRatedSongs { from, to, n } => print_json(
            &store.most_rated_songs(YearRange::new(from, to), n.unwrap_or(default_limit))?,
        ),
        Command::MostEngagedListeners { from, to, n } => print_json(
            &store.most_engaged_listeners(YearRange::new(from, to), n.unwrap_or(default_limit))?,
        ),
        Command::Stats => print_json(&store.counts()?),
        Command::Clear => store.clear(),
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        db_path: cli_args.db.clone(),
        busy_timeout_ms: cli_args.busy_timeout_ms,
        log_level: cli_args.log_level.clone(),
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    init_logging(&config.log_level)?;

    info!("Opening catalog database at {:?}...", config.db_path);
    let store = SqliteCatalogStore::open(&config.db_path, &config.store_options())?;

    run(&store, cli_args.command, config.default_limit)
}
