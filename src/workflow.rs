//! The resume pipeline: load, enrich, render, write.
//!
//! A single pass with no retries. Enrichment is best-effort; only loading,
//! rendering, and writing can fail the run.
use crate::error::PipelineError;
use crate::github::ProjectSource;
use crate::loader::load_data;
use crate::model::ResumeData;
use crate::pdf::{write_pdf, PdfEngine};
use crate::render::render_html;
use std::env;
use std::path::PathBuf;

/// Optional credential forwarded to the project source.
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Inputs for one generation run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub data_path: PathBuf,
    pub out_path: PathBuf,
    /// Never contact the project source, even when projects are missing.
    pub skip_enrichment: bool,
    /// Credential forwarded to the project source, if any.
    pub github_token: Option<String>,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Projects attached by enrichment; `None` when enrichment did not run.
    pub projects_added: Option<usize>,
    pub output_path: PathBuf,
    pub bytes_written: u64,
}

/// Run the pipeline end to end.
pub fn generate(
    options: &GenerateOptions,
    source: &dyn ProjectSource,
    engine: &dyn PdfEngine,
) -> Result<GenerationReport, PipelineError> {
    let mut data = load_data(&options.data_path)?;
    println!("Loaded resume data from {}", options.data_path.display());

    let projects_added = if options.skip_enrichment {
        None
    } else {
        enrich(&mut data, source, options.github_token.as_deref())
    };

    let html = render_html(&data)?;
    let bytes_written = write_pdf(&html, &options.out_path, engine)?;
    println!("PDF generated at {}", options.out_path.display());

    Ok(GenerationReport {
        projects_added,
        output_path: options.out_path.clone(),
        bytes_written,
    })
}

/// GitHub identifier to enrich from, when the data has no projects of its own.
///
/// Any non-empty project list disables enrichment, whatever its length.
pub fn enrichment_target(data: &ResumeData) -> Option<&str> {
    if !data.projects.is_empty() {
        return None;
    }
    data.github_identifier()
}

/// Token from the environment; unset or blank means anonymous access.
pub fn github_token_from_env() -> Option<String> {
    non_blank(env::var(GITHUB_TOKEN_ENV).ok())
}

fn non_blank(raw: Option<String>) -> Option<String> {
    raw.filter(|token| !token.trim().is_empty())
}

fn enrich(
    data: &mut ResumeData,
    source: &dyn ProjectSource,
    token: Option<&str>,
) -> Option<usize> {
    let identifier = enrichment_target(data)?.to_string();
    println!("Fetching GitHub projects for PDF...");
    let projects = source.fetch_projects(&identifier, token);
    let count = projects.len();
    if count > 0 {
        println!("Added {count} GitHub projects to PDF");
    } else {
        println!("No GitHub projects found for PDF");
    }
    data.projects = projects;
    Some(count)
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
