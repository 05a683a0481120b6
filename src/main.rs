use anyhow::Result;
use chrono::Local;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

mod config;
mod document_writer;
mod errors;
mod generator;
mod loader;
mod models;
mod template;
mod traits;

const DEFAULT_LOG_FILTER: &str = "info";

/// Fills an HTML template with organization and trip records, one document
/// per record and day.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Args {
    /// Path to local database
    #[arg(long, default_value_os_t = Path::new("local").join("org.csv"))]
    pub db: PathBuf,

    /// Path to template file
    #[arg(long, default_value_os_t = Path::new("local").join("tpl.html"))]
    pub tpl: PathBuf,

    /// Path to output directory
    #[arg(long, default_value_os_t = Path::new(".").join("out"))]
    pub out: PathBuf,

    /// How many days need to print
    #[arg(long, default_value_t = 1)]
    pub days: u32,
}

fn main() -> Result<()> {
    let env =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse_from(config::normalize_legacy_args(std::env::args_os()));

    run(&args).inspect_err(|err| error!("{err:#}"))
}

fn run(args: &Args) -> Result<()> {
    let config = config::Config::from_args(args)?;

    let source = loader::CsvTableSource::new();
    let sink = document_writer::FsDocumentSink::new();
    let mut engine = generator::Engine::new(&config, source, sink);

    engine.run(Local::now().date_naive())?;

    Ok(())
}
