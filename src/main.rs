use deep_dive_kit::catalog::{sequence_label, ReportCatalog};
use deep_dive_kit::config::DeepDiveConfig;
use deep_dive_kit::staging::WriterSink;
use deep_dive_kit::wizard::DeepDiveSession;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "deep-dive")]
#[command(about = "Stage core report slices for the Deep Dive template")]
#[command(version)]
struct Args {
    /// Directory holding the pre-processed report exports
    #[arg(long)]
    reports_dir: Option<PathBuf>,

    /// Path to a JSON config file
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the selectable period tokens found in report filenames
    Sequences,
    /// List the selectable reports, optionally restricted to a period token
    Files {
        /// 6-digit period token, e.g. 062024
        sequence: Option<String>,
    },
    /// Step 1: write the selected report as a paste-ready grid
    Stage {
        /// Report filename inside the reports directory
        file: String,
    },
    /// Step 2: write the vendor ranking for the selected report
    Vendors {
        /// Report filename inside the reports directory
        file: String,
    },
    /// Step 3: write the associate ranking for the selected report
    Agents {
        /// Report filename inside the reports directory
        file: String,
    },
    /// Step 4: re-aggregate a grid pasted on stdin into the top-associate summary
    Reagg {
        /// Vendor whose volume share is broken out
        #[arg(long)]
        target_vendor: Option<String>,

        /// Number of associates to keep
        #[arg(long)]
        top: Option<usize>,
    },
}

fn load_config(args: &Args) -> Result<DeepDiveConfig> {
    let mut config = match &args.config {
        Some(path) => DeepDiveConfig::load(path)?,
        None => DeepDiveConfig::default(),
    };
    if let Some(dir) = &args.reports_dir {
        config.reports_dir = dir.clone();
    }
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    match args.command {
        Commands::Sequences => {
            let catalog = ReportCatalog::new(config.reports_dir.clone());
            for sequence in catalog.sequences()? {
                println!("{}\t{}", sequence, sequence_label(&sequence));
            }
        }
        Commands::Files { sequence } => {
            let catalog = ReportCatalog::new(config.reports_dir.clone());
            for file in catalog.files(sequence.as_deref())? {
                println!("{}\t{}", file.display_name, file.file_name);
            }
        }
        Commands::Stage { file } => {
            let mut session = DeepDiveSession::new(config, stdout_sink());
            session.select_report(&file)?;
            session.stage_report()?;
        }
        Commands::Vendors { file } => {
            let mut session = DeepDiveSession::new(config, stdout_sink());
            session.select_report(&file)?;
            session.rank_vendors()?;
        }
        Commands::Agents { file } => {
            let mut session = DeepDiveSession::new(config, stdout_sink());
            session.select_report(&file)?;
            session.rank_agents()?;
        }
        Commands::Reagg { target_vendor, top } => {
            let mut config = config;
            if let Some(vendor) = target_vendor {
                config.target_vendor = vendor;
            }
            if let Some(top) = top {
                config.top_n = top;
            }

            info!("Reading pasted grid from stdin");
            let mut pasted = String::new();
            std::io::stdin().read_to_string(&mut pasted)?;

            let mut session = DeepDiveSession::new(config, stdout_sink());
            session.re_aggregate_pasted(&pasted)?;
        }
    }

    Ok(())
}

fn stdout_sink() -> WriterSink<std::io::Stdout> {
    WriterSink::new(std::io::stdout())
}
