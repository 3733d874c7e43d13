//! radhoc CLI - compile and run ad-hoc query specs
//!
//! Usage:
//!   radhoc compile <spec.yaml> [--catalog <file>] [--database <file>] [--dialect <dialect>]
//!   radhoc run <spec.yaml> [--database <file>] [--catalog <file>] [--raw]
//!
//! Examples:
//!   radhoc compile queries/tracks.yaml --catalog catalog.toml --dialect postgres
//!   radhoc run queries/tracks.yaml --database music.db
//!   radhoc run queries/tracks.yaml --database music.db --raw
//!
//! Defaults come from radhoc.toml (see `radhoc::config::Settings`); flags win.

use clap::{Parser, Subcommand, ValueEnum};
use radhoc::catalog::introspect_sqlite;
use radhoc::config::Settings;
use radhoc::sql::render;
use radhoc::{Dialect, Engine, InMemoryCatalog, QuerySpec, SqliteExecutor};
use rusqlite::Connection;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "radhoc")]
#[command(about = "radhoc - declarative ad-hoc queries over a relational schema")]
#[command(version)]
struct Cli {
    /// Path to a radhoc.toml settings file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a query spec to SQL without running it
    Compile {
        /// Path to the query spec (.yaml or .json)
        spec: PathBuf,

        /// Catalog file (.toml or .json)
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// SQLite database to introspect when no catalog file is given
        #[arg(long)]
        database: Option<PathBuf>,

        /// SQL dialect to generate
        #[arg(short, long)]
        dialect: Option<DialectArg>,
    },

    /// Run a query spec against a SQLite database and print JSON
    Run {
        /// Path to the query spec (.yaml or .json)
        spec: PathBuf,

        /// SQLite database file
        #[arg(long)]
        database: Option<PathBuf>,

        /// Catalog file (.toml or .json); introspected from the database if omitted
        #[arg(short, long)]
        catalog: Option<PathBuf>,

        /// Return rows keyed by native column names
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DialectArg {
    Sqlite,
    Postgres,
    Mysql,
    Duckdb,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Sqlite => Dialect::Sqlite,
            DialectArg::Postgres => Dialect::Postgres,
            DialectArg::Mysql => Dialect::MySql,
            DialectArg::Duckdb => Dialect::DuckDb,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RADHOC_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Commands::Compile {
            spec,
            catalog,
            database,
            dialect,
        } => cmd_compile(&settings, spec, catalog, database, dialect),
        Commands::Run {
            spec,
            database,
            catalog,
            raw,
        } => cmd_run(&settings, spec, database, catalog, raw),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn cmd_compile(
    settings: &Settings,
    spec: PathBuf,
    catalog: Option<PathBuf>,
    database: Option<PathBuf>,
    dialect: Option<DialectArg>,
) -> CliResult {
    let spec = QuerySpec::from_file(&spec)?;
    let catalog = load_catalog(settings, catalog, database)?;
    let dialect = dialect.map(Dialect::from).unwrap_or(settings.sql.dialect);

    let plan = radhoc::planner::QueryAssembler::new(&catalog).assemble(&spec)?;
    let statement = render(&plan, dialect, settings.sql.join_type);

    println!("{};", statement.sql);
    for (i, param) in statement.params.iter().enumerate() {
        println!("-- {}: {}", dialect.placeholder(i + 1), param);
    }
    Ok(())
}

fn cmd_run(
    settings: &Settings,
    spec: PathBuf,
    database: Option<PathBuf>,
    catalog: Option<PathBuf>,
    raw: bool,
) -> CliResult {
    let spec = QuerySpec::from_file(&spec)?;
    let database = database_path(settings, database)?;
    let conn = Connection::open(&database)?;
    let catalog = match catalog_path(settings, catalog)? {
        Some(path) => InMemoryCatalog::from_file(path)?,
        None => introspect_sqlite(&conn)?,
    };

    let executor = SqliteExecutor::new(&conn).with_join_type(settings.sql.join_type);
    let engine = Engine::new(&catalog, executor).with_labels(settings.labels.clone());

    let json = if raw {
        serde_json::to_string_pretty(&engine.run_raw(&spec)?)?
    } else {
        serde_json::to_string_pretty(&engine.run(&spec)?)?
    };
    println!("{}", json);
    Ok(())
}

fn load_catalog(
    settings: &Settings,
    catalog: Option<PathBuf>,
    database: Option<PathBuf>,
) -> Result<InMemoryCatalog, Box<dyn std::error::Error>> {
    if let Some(path) = catalog_path(settings, catalog)? {
        return Ok(InMemoryCatalog::from_file(path)?);
    }
    let database = database_path(settings, database)?;
    let conn = Connection::open(&database)?;
    Ok(introspect_sqlite(&conn)?)
}

fn catalog_path(
    settings: &Settings,
    flag: Option<PathBuf>,
) -> Result<Option<PathBuf>, Box<dyn std::error::Error>> {
    match flag {
        Some(path) => Ok(Some(path)),
        None => Ok(settings.storage.catalog_path()?),
    }
}

fn database_path(
    settings: &Settings,
    flag: Option<PathBuf>,
) -> Result<PathBuf, Box<dyn std::error::Error>> {
    match flag {
        Some(path) => Ok(path),
        None => settings
            .storage
            .database_path()?
            .ok_or_else(|| "No database given (use --database or [storage] database)".into()),
    }
}
