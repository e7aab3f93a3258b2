//! CLI argument parsing.
use crate::loader::DEFAULT_DATA_PATH;
use crate::pdf::DEFAULT_OUTPUT_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Root CLI entrypoint: one invocation, one PDF.
#[derive(Parser, Debug)]
#[command(
    name = "resume-pdf",
    version,
    about = "Render resume_data.yaml into a PDF resume",
    after_help = "Environment:\n  GITHUB_TOKEN        Token for higher GitHub API rate limits\n  RESUME_PDF_ENGINE   HTML-to-PDF command (default: weasyprint, then wkhtmltopdf)\n  RUST_LOG            Log filter (overrides --verbose)\n\nExamples:\n  resume-pdf\n  resume-pdf --data me.yaml --out build/cv.pdf\n  resume-pdf --skip-github --engine \"wkhtmltopdf --dpi 300\""
)]
pub struct RootArgs {
    /// Resume data file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATA_PATH)]
    pub data: PathBuf,

    /// Output PDF path; parent directories are created
    #[arg(long, value_name = "PATH", default_value = DEFAULT_OUTPUT_PATH)]
    pub out: PathBuf,

    /// HTML-to-PDF command line, overriding RESUME_PDF_ENGINE
    #[arg(long, value_name = "CMD")]
    pub engine: Option<String>,

    /// Do not fetch GitHub projects even when the data lists none
    #[arg(long)]
    pub skip_github: bool,

    /// Log pipeline details to stderr
    #[arg(long)]
    pub verbose: bool,
}
