use thiserror::Error;

use crate::api::{FailureText, SelectedVideo};

/// Largest video accepted for analysis (100 MiB)
pub const MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

pub const NO_FILE_LABEL: &str = "Choose a video file";

pub const UPLOAD_FAILURE: FailureText = FailureText {
    status: "Failed to analyze video",
    rejected: "Analysis failed",
    transport: "Error analyzing video. Please try again.",
    status_body: true,
};

/// Rejections raised before anything is sent to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Please select a video file.")]
    NoFile,

    #[error("File size too large. Maximum size is 100MB.")]
    TooLarge { size: u64 },
}

/// Client-side guard run before every submission
pub fn validate(video: Option<&SelectedVideo>) -> Result<&SelectedVideo, UploadError> {
    let video = video.ok_or(UploadError::NoFile)?;
    if video.size > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge { size: video.size });
    }
    Ok(video)
}
