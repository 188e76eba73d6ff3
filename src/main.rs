use std::path::PathBuf;

use anyhow::{Context as _, bail};
use clap::{Parser, Subcommand};
use log::info;
use regdump::config::DatasetMetadata;
use regdump::{DATASET_NAMES, IngestConfig, build_catalog, dataset_from_name, run_dataset, run_datasets};

#[derive(Parser)]
#[command(name = "regdump", version, about = "Convert public registry dumps into entity graphs")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available datasets
    List,
    /// Parse one or more datasets
    Run {
        /// Dataset names, e.g. gb_coh_psc
        #[arg(required = true)]
        datasets: Vec<String>,
        /// Directory with one sub-directory of source files per dataset
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Directory receiving one sub-directory of output per dataset
        #[arg(long, default_value = "export")]
        output_dir: PathBuf,
        /// Download missing source files
        #[arg(long)]
        fetch: bool,
        /// Do not draw progress spinners
        #[arg(long)]
        no_progress: bool,
        /// YAML file overriding the dataset metadata (single dataset only)
        #[arg(long)]
        metadata: Option<PathBuf>,
    },
    /// Combine dataset indexes into one catalog
    Catalog {
        /// Text file with one index URL or path per line
        input: PathBuf,
        /// Catalog file to write
        #[arg(long, default_value = "catalog.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::List => {
            for name in DATASET_NAMES {
                let dataset = dataset_from_name(name)?;
                println!("{name}\t{}", dataset.metadata().title);
            }
        }
        Command::Run {
            datasets,
            data_dir,
            output_dir,
            fetch,
            no_progress,
            metadata,
        } => {
            let config = IngestConfig::new(data_dir, output_dir)
                .with_fetch(fetch)
                .with_progress(!no_progress);
            let summaries = match metadata {
                Some(path) => {
                    let [name] = datasets.as_slice() else {
                        bail!("--metadata can only be used with a single dataset");
                    };
                    let overlay = DatasetMetadata::from_path(&path)
                        .with_context(|| format!("loading metadata from {}", path.display()))?;
                    let dataset = dataset_from_name(name)?;
                    vec![run_dataset(dataset.as_ref(), &config, Some(overlay))?]
                }
                None => run_datasets(&datasets, &config)?,
            };
            for summary in &summaries {
                info!("{}: {} entities", summary.dataset, summary.entities);
                for (schema, count) in &summary.schemata {
                    info!("  {schema}: {count}");
                }
            }
        }
        Command::Catalog { input, output } => {
            let catalog = build_catalog(&input, &output)
                .with_context(|| format!("building catalog from {}", input.display()))?;
            info!("Catalog lists {} datasets", catalog.datasets.len());
        }
    }
    Ok(())
}
