use clap::{Args, ValueEnum};
use lead_scoring::config::AppConfig;
use lead_scoring::dashboard::{render_markdown, LeadDashboard};
use lead_scoring::error::AppError;
use lead_scoring::ingest::LeadImporter;
use lead_scoring::telemetry;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum ReportFormat {
    #[default]
    Markdown,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ScoreReportArgs {
    /// Spreadsheet export to score (.xlsx or .csv)
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Output format for the scored dashboard
    #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
    pub(crate) format: ReportFormat,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

pub(crate) fn run_score_report(args: ScoreReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let output = build_score_report(&args)?;
    match args.out {
        Some(path) => {
            std::fs::write(&path, output)?;
            info!(path = %path.display(), "lead report written");
            println!("Report written to {}.", path.display());
        }
        None => print!("{output}"),
    }

    Ok(())
}

pub(crate) fn build_score_report(args: &ScoreReportArgs) -> Result<String, AppError> {
    let records = LeadImporter::from_path(&args.input)?;
    let summary = LeadDashboard::build(&records).summary();

    match args.format {
        ReportFormat::Markdown => Ok(render_markdown(&summary)),
        ReportFormat::Json => serde_json::to_string_pretty(&summary)
            .map(|mut json| {
                json.push('\n');
                json
            })
            .map_err(|err| AppError::Io(err.into())),
    }
}
