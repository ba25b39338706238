use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::{eyre, WrapErr};
use commands::{config, movies, watchlist};
use reelmark_config::{Config, PathManager};
use reelmark_core::AppContext;
use reelmark_models::{OrderDirection, OrderKey};

mod commands;
mod format;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "reelmark")]
#[command(about = "Reelmark - Browse TMDB movies and keep a watchlist")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Keep the watchlist in memory only for this run
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List popular movies
    #[command(long_about = "List popular movies from TMDB. Use --pages to keep loading following pages while more are available.")]
    Popular {
        /// First page to load
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Search movies by title
    Search {
        /// Search text
        query: String,

        /// First page to load
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Number of pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Show details, cast and trailer for one movie
    Show {
        /// TMDB movie id
        id: u64,
    },
    /// Manage the watchlist
    #[command(long_about = "View and edit the saved watchlist. Running without a subcommand lists it in stored order.")]
    Watchlist {
        #[command(subcommand)]
        cmd: Option<WatchlistCommands>,
    },
    /// View or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List saved movies
    List {
        /// Sort the listing by popularity, vote_average or release_date (stored order is kept)
        #[arg(long)]
        order: Option<OrderKey>,

        /// Sort direction
        #[arg(long, default_value = "desc")]
        direction: OrderDirection,
    },
    /// Save a movie by TMDB id (skipped when already saved)
    Add { id: u64 },
    /// Remove a movie by TMDB id
    Remove { id: u64 },
    /// Save the movie if missing, remove it if present
    Toggle { id: u64 },
    /// Reorder the stored watchlist
    Order {
        /// popularity, vote_average or release_date
        key: OrderKey,

        /// asc or desc
        #[arg(default_value = "desc")]
        direction: OrderDirection,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Write a configuration file
    #[command(long_about = "Create config.toml with the given TMDB API key. Get a key at https://www.themoviedb.org/settings/api.")]
    Init {
        /// TMDB API key
        #[arg(long)]
        api_key: String,

        /// Response language, e.g. zh-TW or en-US
        #[arg(long)]
        language: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();
    let config_file = paths.config_file();
    let loaded = Config::load_or_default(&config_file);

    let log_config = loaded.as_ref().map(|c| c.logging.clone()).unwrap_or_default();
    let log_file = log_config.file.as_deref().map(|f| paths.resolve_log_file(f));
    logging::init_logging_with_file(cli.verbose, cli.quiet, &log_config.level, log_file)
        .map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    let command = match cli.command {
        Commands::Config { cmd } => return config::run_config(cmd, &paths, &output),
        command => command,
    };

    let config = loaded
        .map_err(|e| eyre!("{:#}", e))
        .wrap_err_with(|| format!("Failed to load config from {}", config_file.display()))?;
    let ctx = AppContext::from_config(&config, &paths, cli.ephemeral).map_err(|e| {
        eyre!("{:#}\nRun 'reelmark config init --api-key <KEY>' or set TMDB_API_KEY.", e)
    })?;

    match command {
        Commands::Popular { page, pages } => movies::run_list(&ctx, None, page, pages, &output).await,
        Commands::Search { query, page, pages } => movies::run_list(&ctx, Some(&query), page, pages, &output).await,
        Commands::Show { id } => movies::run_show(&ctx, id, &output).await,
        Commands::Watchlist { cmd } => {
            let cmd = cmd.unwrap_or(WatchlistCommands::List { order: None, direction: OrderDirection::Desc });
            watchlist::run_watchlist(&ctx, cmd, &output).await
        }
        Commands::Config { .. } => unreachable!("handled before loading the context"),
    }
}
