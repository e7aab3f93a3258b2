//! Resume data loading.
use crate::error::DataLoadError;
use crate::model::ResumeData;
use std::fs;
use std::path::Path;

/// Conventional data file name, resolved against the working directory.
pub const DEFAULT_DATA_PATH: &str = "resume_data.yaml";

/// Read and parse the resume data file at `path`.
///
/// An empty document loads as the all-default record tree; missing sections
/// are left to the renderer's conditional output.
pub fn load_data(path: &Path) -> Result<ResumeData, DataLoadError> {
    let content = fs::read_to_string(path).map_err(|source| DataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    if content.trim().is_empty() {
        return Ok(ResumeData::default());
    }
    let data: Option<ResumeData> =
        serde_yaml::from_str(&content).map_err(|source| DataLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    let data = data.unwrap_or_default();

    tracing::debug!(
        path = %path.display(),
        companies = data.experience.corporate.len(),
        other_items = data.experience.other.len(),
        projects = data.projects.len(),
        "loaded resume data"
    );
    Ok(data)
}

#[cfg(test)]
#[path = "loader_tests.rs"]
mod tests;
