mod commands;
mod output;
mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use vinha_core::model::ReportKind;

use commands::serve::ServeArgs;
use commands::UpstreamArgs;

#[derive(Parser)]
#[command(
    name = "vinha",
    version,
    about = "Brazilian wine statistics from Embrapa Vitibrasil, as JSON"
)]
struct Cli {
    /// Log level (trace, debug, info, warn, error). RUST_LOG takes precedence.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the authenticated HTTP API
    Serve(ServeArgs),
    /// Fetch one report from the upstream site and print it
    Fetch {
        /// Report: production, processing, commercialization, import, export
        report: ReportKind,

        /// Year of the data (e.g. 2023)
        year: i32,

        /// Sub-report category (required for processing, import and export)
        category: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,

        #[command(flatten)]
        upstream: UpstreamArgs,
    },
    /// Parse a saved report page without touching the network
    Parse {
        /// Path to a downloaded Vitibrasil HTML page
        html_file: PathBuf,

        /// Report the page belongs to
        report: ReportKind,

        /// Year of the data
        year: i32,

        /// Sub-report category, if the report has them
        category: Option<String>,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| cli.log_level.parse().unwrap_or_default()),
        )
        .init();

    let result = match cli.command {
        Commands::Serve(args) => commands::serve::run(args),
        Commands::Fetch {
            report,
            year,
            category,
            output,
            upstream,
        } => commands::fetch::run(report, year, category.as_deref(), &output, &upstream)
            .map_err(Into::into),
        Commands::Parse {
            html_file,
            report,
            year,
            category,
            output,
        } => commands::parse::run(html_file, report, year, category.as_deref(), &output)
            .map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
