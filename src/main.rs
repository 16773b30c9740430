mod bookmarklet;
mod config;
mod export;
mod extract;
mod models;
mod page;
mod pipeline;
mod settle;
mod utils;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, CellQuoting};
use crate::page::HtmlPage;
use crate::pipeline::{ExportOutcome, Exporter, EMPTY_NOTICE};

#[derive(Parser)]
#[command(name = "ws-tx-export", about = "Wealthsimple activity page → CSV", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Export the transactions on a saved activity page to CSV
    Export {
        /// Saved HTML of the activity page
        page: PathBuf,

        /// Directory for the CSV file (default from config: current directory)
        #[arg(short, long)]
        out_dir: Option<PathBuf>,

        /// Write `wealthsimple-transactions.csv` instead of a timestamped name
        #[arg(long)]
        literal_name: bool,

        /// Quote cells as JSON string literals
        #[arg(long)]
        json_cells: bool,
    },

    /// Wrap a compiled script into a `javascript:` bookmarklet
    Wrap {
        #[arg(short, long, default_value = bookmarklet::DEFAULT_INPUT)]
        input: PathBuf,

        #[arg(short, long, default_value = bookmarklet::DEFAULT_OUTPUT)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "ws_tx_export=info,warn",
        1 => "ws_tx_export=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;

    match cli.command {
        Command::Export {
            page,
            out_dir,
            literal_name,
            json_cells,
        } => {
            let _t = utils::Timer::start("Export");
            if let Some(dir) = out_dir {
                config.export.out_dir = dir;
            }
            if literal_name {
                config.export.timestamped = false;
            }
            if json_cells {
                config.export.quoting = CellQuoting::Json;
            }

            let snapshot = HtmlPage::open(&page, &config.page)?;
            info!("Loaded page snapshot {:?}", page);

            match Exporter::new(config).run(&snapshot).await? {
                ExportOutcome::Saved { path, count } => {
                    println!("Exported {} transactions to {}", count, path.display());
                }
                ExportOutcome::Empty => {
                    eprintln!("{}", EMPTY_NOTICE);
                }
            }
        }

        Command::Wrap { input, output } => {
            let _t = utils::Timer::start("Wrap");
            bookmarklet::wrap_file(&input, &output)?;
            println!("Bookmarklet created at {}", output.display());
        }
    }

    Ok(())
}
