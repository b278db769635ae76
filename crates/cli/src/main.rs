//! CLI tool for turning transaction exports into analysis reports.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use report_core::{
    ReportConfig, ReportDispatcher, ReportStore, ReportSummary, StorageConfig, UploadedFile,
};
use report_pdf::PdfRenderer;
use report_pptx::PptxRenderer;
use std::path::PathBuf;

/// Generate analysis reports from spreadsheet transaction exports.
#[derive(Parser, Debug)]
#[command(name = "report-gen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a slide deck or PDF report from a spreadsheet
    Generate {
        /// Input spreadsheet (.xlsx, .xls, .ods)
        file: PathBuf,

        /// Output format: "pdf" for a PDF, anything else for a slide deck
        #[arg(short, long, default_value = "pptx")]
        format: String,

        /// Directory uploads are staged in
        #[arg(long, env = "REPORT_UPLOAD_DIR", default_value = "uploads")]
        upload_dir: PathBuf,

        /// Directory reports are written to
        #[arg(short, long, env = "REPORT_OUTPUT_DIR", default_value = "reports")]
        output_dir: PathBuf,

        /// Currency symbol used in money lines
        #[arg(short, long)]
        currency: Option<String>,

        /// Sheet to read (default: the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,

        /// Print the full path of the report instead of its file name
        #[arg(short, long)]
        print_path: bool,
    },

    /// Print metrics and advice for a spreadsheet as JSON
    Summary {
        /// Input spreadsheet (.xlsx, .xls, .ods)
        file: PathBuf,

        /// Sheet to read (default: the first sheet)
        #[arg(short, long)]
        sheet: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let output = run(cli.command)?;
    println!("{}", output);
    Ok(())
}

/// Execute a subcommand and return what it prints.
fn run(command: Command) -> Result<String> {
    match command {
        Command::Generate {
            file,
            format,
            upload_dir,
            output_dir,
            currency,
            sheet,
            print_path,
        } => {
            let mut config = ReportConfig::new().with_sheet(sheet);
            if let Some(symbol) = currency {
                config = config.with_currency_symbol(symbol);
            }

            let store = ReportStore::open(&StorageConfig::new(upload_dir, output_dir))
                .context("Failed to prepare storage directories")?;
            let dispatcher = ReportDispatcher::new(store, config, PptxRenderer::new(), PdfRenderer::new());

            let upload = UploadedFile::from_path(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let artifact = dispatcher
                .dispatch(Some(&upload), &format)
                .with_context(|| format!("Failed to generate report from {}", file.display()))?;

            log::debug!("Report {} written", artifact.id);
            if print_path {
                Ok(artifact.path().display().to_string())
            } else {
                Ok(artifact.file_name())
            }
        }
        Command::Summary { file, sheet } => {
            let config = ReportConfig::new().with_sheet(sheet);
            let summary = ReportSummary::from_path(&file, &config)
                .with_context(|| format!("Failed to summarize {}", file.display()))?;
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")
        }
    }
}
