//! Export of collected posts to a JSON file.

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::PostRecord;
use crate::error::TrendError;

/// File name used for a search phrase's export. Path separators in the query
/// are replaced so the file always lands in the output directory.
pub fn export_filename(query: &str) -> String {
    let safe: String = query
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    format!("tweet_root ({}).json", safe)
}

/// Writes `records` as a two-space indented JSON array into `dir`, replacing
/// any earlier export of the same query. Non-ASCII text is written as-is.
///
/// # Returns
///
/// The path of the written file.
pub fn write_export(dir: &Path, query: &str, records: &[PostRecord]) -> Result<PathBuf, TrendError> {
    let path = dir.join(export_filename(query));
    let mut json = serde_json::to_string_pretty(records)?;
    json.push('\n');
    fs::write(&path, json)?;
    info!("Wrote {} tweets to {}", records.len(), path.display());
    Ok(path)
}

/// Reads an export file back into records.
pub fn read_export(path: &Path) -> Result<Vec<PostRecord>, TrendError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
