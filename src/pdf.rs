//! HTML to PDF conversion through a system engine.
//!
//! Output is staged next to the destination and renamed into place only after
//! the engine produced a real PDF, so a failed run never leaves a truncated
//! file behind.
use crate::error::DocumentWriteError;
use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Instant;

pub const DEFAULT_OUTPUT_PATH: &str = "html/cv.pdf";
/// Environment override for the engine command line.
pub const ENGINE_ENV: &str = "RESUME_PDF_ENGINE";
/// Engines probed on `PATH`, in order of preference.
pub const KNOWN_ENGINES: [&str; 2] = ["weasyprint", "wkhtmltopdf"];

/// A4 with 2cm margins; weasyprint reads the same geometry from `@page`.
const WKHTMLTOPDF_PAGE_ARGS: [&str; 11] = [
    "--quiet",
    "--page-size",
    "A4",
    "--margin-top",
    "20mm",
    "--margin-bottom",
    "20mm",
    "--margin-left",
    "20mm",
    "--margin-right",
    "20mm",
];

/// Converts an HTML file on disk into a PDF file.
pub trait PdfEngine {
    fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), DocumentWriteError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    Weasyprint,
    Wkhtmltopdf,
    /// Invoked as `<argv…> <input.html> <output.pdf>`.
    Generic,
}

/// A concrete engine command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineCommand {
    argv: Vec<String>,
    kind: EngineKind,
}

impl EngineCommand {
    /// Parse a shell-style command such as `"wkhtmltopdf --dpi 300"`.
    pub fn parse(raw: &str) -> Result<Self, DocumentWriteError> {
        let argv = shell_words::split(raw).map_err(|err| DocumentWriteError::InvalidEngine {
            raw: raw.to_string(),
            detail: err.to_string(),
        })?;
        if argv.is_empty() {
            return Err(DocumentWriteError::InvalidEngine {
                raw: raw.to_string(),
                detail: "command is empty".to_string(),
            });
        }
        let kind = kind_for_program(&argv[0]);
        Ok(Self { argv, kind })
    }

    fn from_program(program: &Path) -> Self {
        let program = program.display().to_string();
        let kind = kind_for_program(&program);
        Self {
            argv: vec![program],
            kind,
        }
    }

    pub fn kind(&self) -> EngineKind {
        self.kind
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Arguments following the program name for one conversion.
    pub fn args_for(&self, html_path: &Path, pdf_path: &Path) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.argv[1..].iter().map(OsString::from).collect();
        if self.kind == EngineKind::Wkhtmltopdf {
            args.extend(WKHTMLTOPDF_PAGE_ARGS.iter().map(OsString::from));
        }
        args.push(html_path.as_os_str().to_owned());
        args.push(pdf_path.as_os_str().to_owned());
        args
    }
}

impl PdfEngine for EngineCommand {
    fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), DocumentWriteError> {
        let engine = self.program().to_string();
        let start = Instant::now();
        let output = Command::new(self.program())
            .args(self.args_for(html_path, pdf_path))
            .output()
            .map_err(|err| DocumentWriteError::Conversion {
                engine: engine.clone(),
                detail: format!("could not start: {err}"),
            })?;
        let elapsed_ms = start.elapsed().as_millis();

        tracing::info!(
            engine = %engine,
            elapsed_ms,
            stderr_bytes = output.stderr.len(),
            "PDF engine finished"
        );

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr_line = stderr
                .lines()
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or_default();
            let detail = if stderr_line.is_empty() {
                format!("status {}", output.status)
            } else {
                stderr_line.to_string()
            };
            return Err(DocumentWriteError::Conversion { engine, detail });
        }
        Ok(())
    }
}

fn kind_for_program(program: &str) -> EngineKind {
    let stem = Path::new(program)
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    if stem.starts_with("weasyprint") {
        EngineKind::Weasyprint
    } else if stem.starts_with("wkhtmltopdf") {
        EngineKind::Wkhtmltopdf
    } else {
        EngineKind::Generic
    }
}

/// Engine chosen at conversion time: an explicit command, or the first known
/// engine found on `PATH`.
#[derive(Debug, Clone, Default)]
pub struct SystemEngine {
    explicit: Option<String>,
}

impl SystemEngine {
    pub fn new(explicit: Option<String>) -> Self {
        Self { explicit }
    }

    pub fn resolve(&self) -> Result<EngineCommand, DocumentWriteError> {
        if let Some(raw) = self.explicit.as_deref() {
            return EngineCommand::parse(raw);
        }
        KNOWN_ENGINES
            .iter()
            .find_map(|name| which::which(name).ok())
            .map(|path| EngineCommand::from_program(&path))
            .ok_or_else(|| DocumentWriteError::EngineNotFound {
                tried: KNOWN_ENGINES.join(", "),
            })
    }
}

impl PdfEngine for SystemEngine {
    fn convert(&self, html_path: &Path, pdf_path: &Path) -> Result<(), DocumentWriteError> {
        let command = self.resolve()?;
        tracing::debug!(
            engine = command.program(),
            kind = ?command.kind(),
            "resolved PDF engine"
        );
        command.convert(html_path, pdf_path)
    }
}

/// Convert `html` to a PDF at `out_path`, creating parent directories.
///
/// Returns the size of the written document. An existing file at `out_path`
/// is replaced only on success.
pub fn write_pdf(
    html: &str,
    out_path: &Path,
    engine: &dyn PdfEngine,
) -> Result<u64, DocumentWriteError> {
    let dir = output_dir(out_path);
    fs::create_dir_all(&dir).map_err(|source| DocumentWriteError::CreateDir {
        path: dir.clone(),
        source,
    })?;

    let mut html_file = tempfile::Builder::new()
        .prefix("resume-")
        .suffix(".html")
        .tempfile()
        .map_err(|err| DocumentWriteError::io("create temporary HTML file", err))?;
    html_file
        .write_all(html.as_bytes())
        .and_then(|()| html_file.flush())
        .map_err(|err| DocumentWriteError::io("write temporary HTML file", err))?;

    let staged = tempfile::Builder::new()
        .prefix(".cv-")
        .suffix(".pdf")
        .tempfile_in(&dir)
        .map_err(|err| {
            DocumentWriteError::io(format!("stage PDF in {}", dir.display()), err)
        })?;

    engine.convert(html_file.path(), staged.path())?;

    let bytes = verify_pdf(staged.path())?;
    set_readable(staged.path())?;
    staged
        .persist(out_path)
        .map_err(|err| DocumentWriteError::Persist {
            path: out_path.to_path_buf(),
            source: err.error,
        })?;
    Ok(bytes)
}

fn output_dir(out_path: &Path) -> PathBuf {
    match out_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn verify_pdf(path: &Path) -> Result<u64, DocumentWriteError> {
    let contents = fs::read(path)
        .map_err(|err| DocumentWriteError::io(format!("read {}", path.display()), err))?;
    let bytes = contents.len() as u64;
    if !contents.starts_with(b"%PDF") {
        return Err(DocumentWriteError::InvalidOutput { bytes });
    }
    Ok(bytes)
}

/// Staged temp files are owner-only; published PDFs follow the usual 0644.
#[cfg(unix)]
fn set_readable(path: &Path) -> Result<(), DocumentWriteError> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
        .map_err(|err| DocumentWriteError::io(format!("chmod {}", path.display()), err))
}

#[cfg(not(unix))]
fn set_readable(_path: &Path) -> Result<(), DocumentWriteError> {
    Ok(())
}

#[cfg(test)]
#[path = "pdf_tests.rs"]
mod tests;
