//! Error types for each pipeline stage.
//!
//! Loading and writing are fatal; enrichment failures never leave the
//! enricher (see `github`).
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("read resume data {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse resume data {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("no GitHub username in {0:?}")]
    Username(String),

    #[error("GitHub request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("GitHub response was not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
#[error("render resume template: {0}")]
pub struct RenderError(#[from] pub tera::Error);

#[derive(Debug, Error)]
pub enum DocumentWriteError {
    #[error("create output directory {}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no PDF engine found on PATH (tried {tried}); install weasyprint or set RESUME_PDF_ENGINE")]
    EngineNotFound { tried: String },

    #[error("invalid PDF engine command {raw:?}: {detail}")]
    InvalidEngine { raw: String, detail: String },

    #[error("PDF engine {engine} failed: {detail}")]
    Conversion { engine: String, detail: String },

    #[error("PDF engine output is not a PDF document ({bytes} bytes)")]
    InvalidOutput { bytes: u64 },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("persist PDF to {}", path.display())]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DocumentWriteError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        DocumentWriteError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Union of the fatal failures a `generate` run can report.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Load(#[from] DataLoadError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Write(#[from] DocumentWriteError),
}
