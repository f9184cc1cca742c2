use crate::extract::Record;
use crate::output::OutputError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One entity kind's records keyed by entity name
///
/// Sorted by name so a regenerated dataset diffs cleanly against the last one.
pub type Dataset = BTreeMap<String, Record>;

/// Renders a dataset as pretty-printed JSON
pub fn render_dataset(dataset: &Dataset) -> Result<String, OutputError> {
    let mut json = serde_json::to_string_pretty(dataset)?;
    json.push('\n');
    Ok(json)
}

/// Writes a dataset, replacing any previous file atomically
///
/// The JSON goes to a hidden sibling file first and is renamed over the
/// target, so a failed write never leaves a truncated dataset behind. The
/// parent directory is created when absent.
pub fn write_dataset(path: &Path, dataset: &Dataset) -> Result<(), OutputError> {
    let json = render_dataset(dataset)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let temp = temp_path(path)?;
    std::fs::write(&temp, json)?;
    if let Err(e) = std::fs::rename(&temp, path) {
        let _ = std::fs::remove_file(&temp);
        return Err(OutputError::Write {
            path: path.display().to_string(),
            message: e.to_string(),
        });
    }

    tracing::debug!("Wrote {} record(s) to {}", dataset.len(), path.display());
    Ok(())
}

fn temp_path(path: &Path) -> Result<PathBuf, OutputError> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| OutputError::Write {
            path: path.display().to_string(),
            message: "not a file path".to_string(),
        })?;
    Ok(path.with_file_name(format!(".{}.tmp", file_name)))
}
