use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use atus_balance::config::SEX_FEMALE;
use atus_balance::{BalanceConfig, ColumnMap, OutputFormat, pipeline};
use clap::Parser;
use log::info;

/// Time-use balance table of respondents with and without a young child
#[derive(Parser, Debug)]
#[command(name = "balance-analysis")]
#[command(version)]
#[command(about, long_about = None)]
struct Cli {
    /// Sex code to analyse (1 = male, 2 = female)
    #[arg(short, long, default_value_t = SEX_FEMALE)]
    sex: i64,

    /// Diary extract, CSV or Parquet
    #[arg(short, long = "ifile", value_name = "FILE")]
    input: PathBuf,

    /// Destination of the rendered table
    #[arg(short, long = "ofile", value_name = "FILE")]
    output: PathBuf,

    /// JSON file mapping canonical fields to extract column names
    #[arg(long, value_name = "JSON")]
    columns: Option<PathBuf>,

    /// Output format (tex, csv or json); inferred from the output extension by default
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Estimate categories sequentially
    #[arg(long)]
    no_parallel: bool,

    /// Show a progress bar during estimation
    #[arg(long)]
    progress: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    println!("Sex is {}", cli.sex);
    println!("Input file is {}", cli.input.display());
    println!("Output file is {}", cli.output.display());

    let columns = match &cli.columns {
        Some(path) => ColumnMap::from_json_file(path)
            .with_context(|| format!("Failed to load column map {}", path.display()))?,
        None => ColumnMap::default(),
    };
    let config = BalanceConfig::new()
        .with_sex(cli.sex)
        .with_columns(columns)
        .with_parallel(!cli.no_parallel)
        .with_progress(cli.progress);
    let format = cli
        .format
        .unwrap_or_else(|| OutputFormat::from_path(&cli.output));

    let start = Instant::now();
    let outcome = pipeline::run_to_file(&cli.input, &cli.output, format, &config)
        .with_context(|| format!("Failed to build balance table from {}", cli.input.display()))?;

    println!("{}", outcome.table);
    if !outcome.ambiguity.is_empty() {
        info!(
            "Excluded {} respondents whose children are all aged 6 to 17",
            outcome.ambiguity.count()
        );
    }
    info!("Finished in {:?}", start.elapsed());
    Ok(())
}
