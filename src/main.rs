use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use log::{info, warn};
use trade_reshape::algorithm::taxonomy::update_product_ids;
use trade_reshape::{
    BatchReport, PipelineConfig, combine_years, convert_to_csv, exclude_by_product_id,
    split_in_data_root,
};

/// Reshape per-year, per-country trade tables
#[derive(Debug, Parser)]
#[command(name = "trade-reshape", version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct GlobalArgs {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root directory for reference tables and location splitting
    #[arg(long, global = true)]
    data_root: Option<PathBuf>,

    /// Process entity directories in parallel
    #[arg(long, global = true)]
    parallel: bool,

    /// Worker threads for --parallel
    #[arg(long, global = true)]
    threads: Option<usize>,

    /// Do not write the leading row-index column
    #[arg(long, global = true)]
    no_index: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Hide the progress bar
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Combine data from different years into one csv file per entity
    #[command(name = "combine_years", alias = "combine-years")]
    CombineYears {
        /// Input directory path
        #[arg(short, long)]
        dir: PathBuf,

        /// Also merge <entity>_hs4_ partitions
        #[arg(long)]
        include_hs4: bool,
    },

    /// Keep the rows of one year and write them in the fixed layout
    #[command(name = "convert_to_csv", alias = "convert-to-csv")]
    ConvertToCsv {
        /// Input file
        #[arg(short, long)]
        input: PathBuf,

        /// Year to keep
        #[arg(short, long)]
        year: i64,

        /// Output CSV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Exclude rows of data by product category
    #[command(name = "exclude_by_product_id", alias = "exclude-by-product-id")]
    ExcludeByProductId {
        /// Input directory path
        #[arg(short, long)]
        dir: PathBuf,

        /// Category reference table (default: <data-root>/hs_product.csv)
        #[arg(long)]
        product_file: Option<PathBuf>,

        /// Root categories to exclude (default: 2,3,6,7,8)
        #[arg(long, value_delimiter = ',')]
        roots: Option<Vec<i64>>,
    },

    /// Split data to separate CSV files by location_id
    #[command(name = "split_by_locations", alias = "split-by-locations")]
    SplitByLocations {
        /// Input CSV filename (not path), resolved against the data root
        #[arg(short, long)]
        input: String,

        /// Location reference table (default: <data-root>/location.csv)
        #[arg(long)]
        location_file: Option<PathBuf>,
    },

    /// Re-parent level-4 categories onto their grandparents
    #[command(name = "update_product_ids", alias = "update-product-ids")]
    UpdateProductIds {
        /// Source category table (default: <data-root>/hs_product_copy.csv)
        #[arg(long)]
        source: Option<PathBuf>,

        /// Output category table (default: <data-root>/hs_product_new.csv)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Root categories (default: 2,3,6,7,8)
        #[arg(long, value_delimiter = ',')]
        roots: Option<Vec<i64>>,
    },
}

fn build_config(global: &GlobalArgs) -> anyhow::Result<PipelineConfig> {
    let mut config = match &global.config {
        Some(path) => PipelineConfig::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    if let Some(root) = &global.data_root {
        config.data_root.clone_from(root);
    }
    if global.parallel {
        config.parallel = true;
    }
    if global.threads.is_some() {
        config.threads = global.threads;
    }
    if global.no_index {
        config.write_index = false;
    }
    config.progress = !global.quiet;
    config.validate()?;
    Ok(config)
}

fn finish_batch(report: BatchReport) -> anyhow::Result<()> {
    for (entity, error) in report.failed() {
        warn!("{entity}: {error}");
    }
    let summary = report.to_string();
    report.into_result().map(|_| ()).context(summary)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let default_level = if cli.global.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let mut config = build_config(&cli.global)?;
    let start = Instant::now();

    match cli.command {
        Command::CombineYears { dir, include_hs4 } => {
            if include_hs4 && !config.partition_prefixes.iter().any(|p| p == "hs4") {
                config.partition_prefixes.push("hs4".to_string());
            }
            let report = combine_years(&dir, &config)
                .with_context(|| format!("combine_years failed for {}", dir.display()))?;
            finish_batch(report)?;
        }
        Command::ConvertToCsv {
            input,
            year,
            output,
        } => {
            let rows = convert_to_csv(&input, year, &output, config.write_index)
                .with_context(|| format!("convert_to_csv failed for {}", input.display()))?;
            info!("Wrote {rows} rows to {}", output.display());
        }
        Command::ExcludeByProductId {
            dir,
            product_file,
            roots,
        } => {
            if product_file.is_some() {
                config.product_file = product_file;
            }
            if let Some(roots) = roots {
                config.root_categories = roots;
            }
            let report = exclude_by_product_id(&dir, &config)
                .with_context(|| format!("exclude_by_product_id failed for {}", dir.display()))?;
            finish_batch(report)?;
        }
        Command::SplitByLocations {
            input,
            location_file,
        } => {
            if location_file.is_some() {
                config.location_file = location_file;
            }
            let outputs = split_in_data_root(&input, &config)
                .with_context(|| format!("split_by_locations failed for {input}"))?;
            info!("Wrote {} location files", outputs.len());
        }
        Command::UpdateProductIds {
            source,
            output,
            roots,
        } => {
            if source.is_some() {
                config.product_source_file = source;
            }
            if output.is_some() {
                config.product_output_file = output;
            }
            if let Some(roots) = roots {
                config.root_categories = roots;
            }
            let source = config.product_source_path();
            let output = config.product_output_path();
            let update = update_product_ids(
                &source,
                &output,
                &config.root_categories,
                config.write_index,
            )
            .with_context(|| format!("update_product_ids failed for {}", source.display()))?;
            info!(
                "Wrote {} categories ({} re-parented) to {}",
                update.rows,
                update.index.level4().len(),
                output.display()
            );
        }
    }

    info!("Done in {:?}", start.elapsed());
    Ok(())
}
