use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use housing_cleaner::app::clean_use_case::CleanTableUseCase;
use housing_cleaner::config::{Config, DEFAULT_CONFIG_PATH};
use housing_cleaner::error::CleanerError;
use housing_cleaner::infra::{csv_source, CsvCleanOutput, MarClient};
use housing_cleaner::logging;
use housing_cleaner::meta::MetaCatalog;
use housing_cleaner::metrics;
use housing_cleaner::pipeline::clean::crosswalk::TractCrosswalk;
use housing_cleaner::pipeline::clean::{CleanerContext, CleanerRegistry};

#[derive(Parser)]
#[command(name = "housing_cleaner")]
#[command(about = "Cleans raw DC housing source tables for loading")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean one source CSV with the cleaner its table declares
    Clean {
        /// Destination table name as listed in the meta file
        #[arg(long)]
        table: String,
        /// Raw source CSV
        #[arg(long)]
        input: PathBuf,
        /// Config file (defaults to ./config.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Expose Prometheus metrics while the run is in progress
        #[arg(long)]
        metrics: bool,
    },
    /// List tables and their cleaners
    Tables {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Ok(Config::load_from(path)?),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => Ok(Config::load()?),
        None => {
            let mut config = Config::default();
            config.apply_overrides(|key| std::env::var(key).ok())?;
            Ok(config)
        }
    }
}

async fn clean_table(config: &Config, table: &str, input: &Path) -> anyhow::Result<()> {
    let catalog = MetaCatalog::load(&config.pipeline.meta_path)?;
    let crosswalk = TractCrosswalk::from_path(&config.pipeline.crosswalk_path)
        .with_context(|| format!("loading {}", config.pipeline.crosswalk_path.display()))?;
    info!("Loaded {} tract crosswalk entries", crosswalk.len());

    let lookup = Arc::new(MarClient::new(&config.mar)?);
    let ctx = CleanerContext::new(crosswalk).with_lookup(lookup);
    let registry = CleanerRegistry::from_catalog(&catalog, &ctx)?;
    if registry.get(table).is_none() {
        return Err(CleanerError::UnknownTable(table.to_string()).into());
    }

    let rows = csv_source::read_rows(input)?;
    let output = Arc::new(CsvCleanOutput::create(&config.pipeline.output_dir, table)?);
    let use_case = CleanTableUseCase::new(Arc::new(registry), output)
        .with_concurrency(config.pipeline.concurrency);

    let summary = use_case.run(table, rows).await?;
    println!("\n📊 Cleaning results for {}:", table);
    println!("   Total rows: {}", summary.total);
    println!("   Cleaned: {}", summary.cleaned);
    println!("   Dropped: {}", summary.dropped);
    println!("   Failed: {}", summary.failed);
    println!("   Output dir: {}", config.pipeline.output_dir.display());
    Ok(())
}

fn list_tables(config: &Config) -> anyhow::Result<()> {
    let catalog = MetaCatalog::load(&config.pipeline.meta_path)?;
    for (table, meta) in catalog.tables() {
        println!("{:<40} {}", table, meta.cleaner);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Clean {
            table,
            input,
            config,
            metrics: with_metrics,
        } => {
            let config = load_config(config.as_deref())?;
            let _guard = logging::init_logging(&config.pipeline.log_dir);
            if with_metrics {
                metrics::init_metrics();
            }

            let result = clean_table(&config, &table, &input).await;
            if let Some(snapshot) = metrics::render() {
                debug!("Final metrics snapshot:\n{}", snapshot);
            }
            if let Err(e) = result {
                error!("Cleaning run for {} failed: {:#}", table, e);
                return Err(e);
            }
        }
        Commands::Tables { config } => {
            let config = load_config(config.as_deref())?;
            list_tables(&config)?;
        }
    }
    Ok(())
}
