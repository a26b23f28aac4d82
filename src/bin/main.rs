//! foodcomp CLI - build and serve food composition documents
//!
//! Usage:
//!   foodcomp init [--database <path>]
//!   foodcomp seed <file.json> [--database <path>]
//!   foodcomp show <id> [--database <path>] [--pretty]
//!   foodcomp serve [--host <host>] [--port <port>] [--database <path>]
//!
//! Examples:
//!   foodcomp seed data/foods.json
//!   foodcomp show CL0001 --pretty
//!   foodcomp serve --port 8080

use clap::{Parser, Subcommand};
use foodcomp::config::Settings;
use foodcomp::lookup::fetch_food_document;
use foodcomp::store::{Seed, SqliteFoodStore};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "foodcomp")]
#[command(about = "foodcomp - Food composition lookups over a relational store")]
#[command(version)]
struct Cli {
    /// Path to a foodcomp.toml (overrides the default search)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init {
        /// Path to the SQLite database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Load a JSON seed file into the database
    Seed {
        /// Path to the seed file
        file: PathBuf,

        /// Path to the SQLite database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },

    /// Print the assembled document for one food
    Show {
        /// Numeric food id or food code
        id: String,

        /// Path to the SQLite database
        #[arg(short, long)]
        database: Option<PathBuf>,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Run the HTTP server
    Serve {
        /// Address to bind (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Path to the SQLite database
        #[arg(short, long)]
        database: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings);

    match cli.command {
        Commands::Init { database } => cmd_init(&settings, database),
        Commands::Seed { file, database } => cmd_seed(&settings, file, database).await,
        Commands::Show {
            id,
            database,
            pretty,
        } => cmd_show(&settings, &id, database, pretty).await,
        Commands::Serve {
            host,
            port,
            database,
        } => cmd_serve(settings, host, port, database).await,
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn open_store(settings: &Settings, database: Option<PathBuf>) -> Result<SqliteFoodStore, ExitCode> {
    let path = match database {
        Some(path) => path,
        None => match settings.database.resolved_path() {
            Ok(path) => path,
            Err(e) => {
                eprintln!("Configuration error: {}", e);
                return Err(ExitCode::FAILURE);
            }
        },
    };

    SqliteFoodStore::open(&path).map_err(|e| {
        eprintln!("Error opening database '{}': {}", path.display(), e);
        ExitCode::FAILURE
    })
}

fn cmd_init(settings: &Settings, database: Option<PathBuf>) -> ExitCode {
    match open_store(settings, database) {
        Ok(_) => {
            println!("Database ready");
            ExitCode::SUCCESS
        }
        Err(code) => code,
    }
}

async fn cmd_seed(settings: &Settings, file: PathBuf, database: Option<PathBuf>) -> ExitCode {
    let seed = match Seed::from_file(&file) {
        Ok(seed) => seed,
        Err(e) => {
            eprintln!("Error reading seed '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let store = match open_store(settings, database) {
        Ok(store) => store,
        Err(code) => return code,
    };

    match store.load_seed(&seed).await {
        Ok(summary) => {
            println!(
                "Loaded {} foods, {} measurements, {} nutrients, {} references, {} LanguaL codes",
                summary.foods,
                summary.measurements,
                summary.nutrients,
                summary.references,
                summary.langual_codes
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Seed failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn cmd_show(
    settings: &Settings,
    id: &str,
    database: Option<PathBuf>,
    pretty: bool,
) -> ExitCode {
    let store = match open_store(settings, database) {
        Ok(store) => store,
        Err(code) => return code,
    };

    let document = match fetch_food_document(&store, id).await {
        Ok(document) => document,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let json = if pretty {
        serde_json::to_string_pretty(&document)
    } else {
        serde_json::to_string(&document)
    };

    match json {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "server"))]
async fn cmd_serve(
    _settings: Settings,
    _host: Option<String>,
    _port: Option<u16>,
    _database: Option<PathBuf>,
) -> ExitCode {
    eprintln!("foodcomp was built without the `server` feature");
    ExitCode::FAILURE
}

#[cfg(feature = "server")]
async fn cmd_serve(
    mut settings: Settings,
    host: Option<String>,
    port: Option<u16>,
    database: Option<PathBuf>,
) -> ExitCode {
    if let Some(host) = host {
        settings.server.host = host;
    }
    if let Some(port) = port {
        settings.server.port = port;
    }

    let store = match open_store(&settings, database) {
        Ok(store) => store,
        Err(code) => return code,
    };

    match foodcomp::web::serve(&settings.server, std::sync::Arc::new(store)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
