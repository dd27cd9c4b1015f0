//! One-shot commands run without the TUI.

use std::fs::File;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::api::{AnalysisReport, ApiError, HistoryEntry, SelectedVideo, WorkoutBackend};
use crate::history::{self, HistoryRow};
use crate::upload::{self, UploadError, UPLOAD_FAILURE};

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Rejected(#[from] UploadError),

    #[error("{0}")]
    Backend(String),

    #[error("Cannot write {path}: {source}")]
    Export { path: PathBuf, source: csv::Error },
}

/// Validate and analyze one video; the backend is only called for valid input
pub async fn analyze_file(
    backend: &dyn WorkoutBackend,
    path: &Path,
) -> Result<AnalysisReport, CommandError> {
    let video = SelectedVideo::from_path(path).map_err(|source| CommandError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let video = upload::validate(Some(&video))?.clone();

    log::info!("analyzing {} ({} bytes)", video.file_name, video.size);
    backend.analyze(video).await.map_err(|err| {
        log::error!("upload error: {err}");
        CommandError::Backend(err.describe(&UPLOAD_FAILURE))
    })
}

pub async fn fetch_history(backend: &dyn WorkoutBackend) -> Result<Vec<HistoryEntry>, CommandError> {
    backend.history().await.map_err(|err: ApiError| {
        log::error!("history loading error: {err}");
        CommandError::Backend("Error loading workout history.".to_string())
    })
}

/// Plain-text rendering of the history table for stdout
pub fn history_text(entries: &[HistoryEntry]) -> String {
    let mut out = format!(
        "{:<21}{:>8}{:>10}{:>11}\n",
        "Date", "Reps", "Calories", "Duration"
    );
    for row in entries.iter().map(HistoryRow::from) {
        out.push_str(&format!(
            "{:<21}{:>8}{:>10}{:>11}\n",
            row.when, row.reps, row.calories, row.duration
        ));
    }
    out
}

pub fn export_csv(entries: &[HistoryEntry], path: &Path) -> Result<(), CommandError> {
    let export_err = |source: csv::Error| CommandError::Export {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(|e| export_err(e.into()))?;
    history::write_csv(entries, file).map_err(export_err)
}
