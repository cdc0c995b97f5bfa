use anyhow::Result;
use clap::Parser;
use songplays_etl::config::{FileConfig, Settings};
use songplays_etl::{pipeline, Warehouse};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "songplays-etl",
    about = "Load song metadata and play event logs into a star-schema SQLite database"
)]
struct CliArgs {
    /// Path to the SQLite database file (default: sparkify.db).
    #[clap(long)]
    pub db_path: Option<PathBuf>,

    /// Root directory of the song metadata files (default: data/song_data).
    #[clap(long)]
    pub song_data: Option<PathBuf>,

    /// Root directory of the event log files (default: data/log_data).
    #[clap(long)]
    pub log_data: Option<PathBuf>,

    /// Path to an optional TOML config file.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Keep the existing tables instead of dropping and recreating them,
    /// so a re-run can top up an earlier, partially completed load.
    #[clap(long, default_value_t = false)]
    pub keep_schema: bool,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => FileConfig::load(path)?,
        None => FileConfig::default(),
    };
    let settings = Settings::resolve(
        cli_args.db_path,
        cli_args.song_data,
        cli_args.log_data,
        file_config,
    );

    info!("Database: {}", settings.db_path.display());
    info!("Song data root: {}", settings.song_data.display());
    info!("Log data root: {}", settings.log_data.display());

    let warehouse = Warehouse::open(&settings.db_path)?;
    if cli_args.keep_schema {
        warehouse.ensure_schema()?;
    } else {
        warehouse.reset_schema()?;
    }

    pipeline::run(&warehouse, &settings.song_data, &settings.log_data)?;

    info!("Load complete");
    Ok(())
}
