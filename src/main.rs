use std::path::PathBuf;

use clap::{Parser, Subcommand};

use atlas_bsc::error::AppResult;
use atlas_bsc::models::scorecard::{display_attainment, Perspective};
use atlas_bsc::services::report_aggregator::ReportAggregator;
use atlas_bsc::services::report_exporter::ReportExporter;
use atlas_bsc::services::scorecard_api::{ScorecardApi, DEFAULT_API_BASE_URL};
use atlas_bsc::services::scorecard_store::PerspectiveStore;
use atlas_bsc::utils::logger;

#[derive(Parser)]
#[command(name = "atlas-bsc")]
#[command(about = "Balanced-scorecard tracking and report export", long_about = None)]
#[command(version)]
struct Cli {
    /// Base URL of the persistence API
    #[arg(long, env = "ATLAS_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    api_base_url: String,

    /// Directory for the rolling file log; console-only when omitted
    #[arg(long)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print one perspective's live scorecard
    List {
        /// Department whose entries are listed
        #[arg(long)]
        department: i64,

        /// financial | stakeholder | internal | learning
        #[arg(long, value_parser = parse_perspective)]
        perspective: Perspective,
    },
    /// Aggregate all four perspectives and export the PDF report
    Report {
        /// Department the report covers
        #[arg(long)]
        department: i64,

        /// Directory the report.pdf artifact is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
}

fn parse_perspective(raw: &str) -> Result<Perspective, String> {
    Perspective::from_str(raw)
}

#[tokio::main]
async fn main() {
    if let Err(error) = try_run().await {
        eprintln!("atlas-bsc: {error}");
        std::process::exit(1);
    }
}

async fn try_run() -> AppResult<()> {
    let cli = Cli::parse();

    logger::init_logging(cli.log_dir.as_deref())?;

    let api = ScorecardApi::new(&cli.api_base_url)?;

    match cli.command {
        Commands::List {
            department,
            perspective,
        } => {
            let mut store = PerspectiveStore::new(api, perspective, department);
            store.load().await?;

            println!(
                "{} scorecard, department {department} ({} entries)",
                perspective.as_str(),
                store.entries().len()
            );
            for entry in store.entries() {
                let attainment = entry
                    .attainment()
                    .map(|raw| format!("{}%", display_attainment(raw)))
                    .unwrap_or_else(|| "N/A".to_string());
                println!(
                    "{}: {} | {} | target {} | {} | {}",
                    entry.target_code,
                    entry.display_office_target(),
                    entry.metric.as_str(),
                    entry.target_performance.as_deref().unwrap_or("N/A"),
                    attainment,
                    entry.status.as_str()
                );
            }
        }
        Commands::Report {
            department,
            out_dir,
        } => {
            let aggregator = ReportAggregator::new(api);
            let report = aggregator.aggregate(department).await;

            for failure in &report.failures {
                eprintln!(
                    "warning: {} perspective unavailable: {}",
                    failure.perspective.as_str(),
                    failure.message
                );
            }

            let exporter = ReportExporter::new();
            let path = exporter.export_to_file(&report.sections(), &out_dir)?;
            println!(
                "report written to {} ({} rows)",
                path.display(),
                report.total_rows()
            );
        }
    }

    Ok(())
}
