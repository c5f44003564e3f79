//! Report export
//!
//! Clipboard copy uses the OSC 52 terminal escape so it works over SSH and
//! without a display server. Downloads write the report text verbatim.
//! None of these touch workflow state.

use std::io::Write;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use crossterm::execute;
use crossterm::style::Print;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::GeneratedReport;

/// Errors from export actions
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy to clipboard: {0}")]
    Clipboard(#[source] std::io::Error),
}

/// `ai-report-<YYYY-MM-DD>.md`
pub fn report_filename(date: NaiveDate) -> String {
    format!("ai-report-{}.md", date.format("%Y-%m-%d"))
}

/// Write the report text into `dir`, creating it if needed
///
/// The file holds exactly `report.text`; an existing file of the same name
/// is replaced.
pub fn download(report: &GeneratedReport, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
    debug!(?dir, %date, "download: called");
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let path = dir.join(report_filename(date));
    std::fs::write(&path, report.text.as_bytes()).map_err(|source| ExportError::Io {
        path: path.clone(),
        source,
    })?;
    info!(?path, bytes = report.text.len(), "download: report written");
    Ok(path)
}

/// OSC 52 "set clipboard" escape for `text`
pub fn osc52_sequence(text: &str) -> String {
    let encoded = STANDARD.encode(text.as_bytes());
    format!("\x1b]52;c;{encoded}\x1b\\")
}

/// Ask the terminal behind `out` to put `text` on the clipboard
pub fn copy_to_clipboard<W: Write>(out: &mut W, text: &str) -> Result<(), ExportError> {
    debug!(len = text.len(), "copy_to_clipboard: called");
    execute!(out, Print(osc52_sequence(text))).map_err(ExportError::Clipboard)
}

/// Link shared for a plan's report
///
/// The `file://` URL of the last download when there is one, otherwise a
/// `sitereport://plans/<id>` reference.
pub fn share_link(plan_id: &str, last_download: Option<&Path>) -> String {
    match last_download {
        Some(path) => {
            let absolute = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
            format!("file://{}", absolute.display())
        }
        None => format!("sitereport://plans/{}", plan_id),
    }
}

/// Share a report
///
/// Terminals have no share sheet, so sharing always falls back to copying
/// the link to the clipboard. Returns the link that was copied.
pub fn share<W: Write>(out: &mut W, plan_id: &str, last_download: Option<&Path>) -> Result<String, ExportError> {
    debug!(%plan_id, ?last_download, "share: called");
    let link = share_link(plan_id, last_download);
    copy_to_clipboard(out, &link)?;
    info!(%link, "share: link copied");
    Ok(link)
}
