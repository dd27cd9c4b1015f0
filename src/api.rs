//! Wire types and client for the workout backend.
//!
//! Every call goes through [`WorkoutBackend`] so the controller can be driven
//! against the real HTTP server or an in-process fake.

use std::path::PathBuf;

use async_trait::async_trait;
use reqwest::{multipart, Body, Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

const ANALYZE_PATH: &str = "analyze";
const START_PATH: &str = "start-camera";
const STOP_PATH: &str = "stop-workout";
const LIVE_STATS_PATH: &str = "live-stats";
const HISTORY_PATH: &str = "history";

/// Failure of a single backend call
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("server returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },

    #[error("server reported failure")]
    Rejected { message: Option<String> },

    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("could not read video: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Generic texts used when the server did not supply its own error message
#[derive(Debug, Clone, Copy)]
pub struct FailureText {
    pub status: &'static str,
    pub rejected: &'static str,
    pub transport: &'static str,
    /// Show the `error` body of a non-2xx reply instead of `status`
    pub status_body: bool,
}

impl ApiError {
    /// The `error` text the backend attached, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } | ApiError::Rejected { message } => {
                message.as_deref().filter(|m| !m.trim().is_empty())
            }
            _ => None,
        }
    }

    /// Text shown to the user for this failure
    pub fn describe(&self, text: &FailureText) -> String {
        let use_server = match self {
            ApiError::Status { .. } => text.status_body,
            _ => true,
        };
        if let Some(message) = self.server_message().filter(|_| use_server) {
            return message.to_string();
        }
        match self {
            ApiError::Status { .. } => text.status,
            ApiError::Rejected { .. } => text.rejected,
            ApiError::Transport(_) | ApiError::Decode(_) | ApiError::Io(_) => text.transport,
        }
        .to_string()
    }
}

/// Reply of `POST /analyze`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisReport {
    pub message: String,
    pub timestamp: Option<String>,
    pub reps: u32,
    pub calories: f64,
    pub duration: f64,
}

/// Reply of `GET /start-camera`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartReply {
    pub message: Option<String>,
}

/// Reply of `GET /stop-workout`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StopReply {
    pub message: Option<String>,
    pub status: Option<String>,
    pub reps: u32,
    pub calories: f64,
    pub duration: f64,
}

/// Snapshot of the running session, reported by `GET /live-stats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveStats {
    pub reps: u32,
    pub calories: f64,
    pub duration: f64,
}

/// One finished session as listed by `GET /history`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    #[serde(default)]
    pub reps: u32,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub summary: Option<String>,
}

/// A video chosen for upload
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedVideo {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl SelectedVideo {
    /// Stat the file at `path`; fails if it does not exist or is not a file
    pub fn from_path<P: Into<PathBuf>>(path: P) -> std::io::Result<Self> {
        let path = path.into();
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("{} is not a file", path.display()),
            ));
        }
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            path,
            file_name,
            size: metadata.len(),
        })
    }
}

/// The backend calls the client depends on.
///
/// Implementations report `success: false` replies as [`ApiError::Rejected`],
/// so an `Ok` always means the backend accepted the request.
#[async_trait]
pub trait WorkoutBackend: Send + Sync {
    async fn analyze(&self, video: SelectedVideo) -> Result<AnalysisReport, ApiError>;
    async fn start_camera(&self) -> Result<StartReply, ApiError>;
    async fn stop_workout(&self) -> Result<StopReply, ApiError>;
    async fn live_stats(&self) -> Result<LiveStats, ApiError>;
    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError>;
}

/// Envelope shared by the acknowledging endpoints
#[derive(Debug, Deserialize)]
struct Ack<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(flatten)]
    body: T,
}

impl<T> Ack<T> {
    fn into_result(self) -> Result<T, ApiError> {
        if self.success {
            Ok(self.body)
        } else {
            Err(ApiError::Rejected {
                message: self.error,
            })
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// [`WorkoutBackend`] over HTTP
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base: Url,
}

impl HttpBackend {
    pub fn new(server_url: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(server_url)
            .map_err(|e| ApiError::Transport(format!("invalid server url {server_url}: {e}")))?;
        // Url::join drops the last path segment unless the base ends with a slash
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().build()?;
        Ok(Self { client, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|e| ApiError::Transport(format!("invalid endpoint {path}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        log::debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        read_body(response).await
    }
}

/// Decode a reply, turning non-2xx statuses into [`ApiError::Status`]
async fn read_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let status = response.status();
    let bytes = response.bytes().await?;
    if !status.is_success() {
        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .unwrap_or_default()
            .error;
        return Err(ApiError::Status {
            status: status.as_u16(),
            message,
        });
    }
    Ok(serde_json::from_slice(&bytes)?)
}

#[async_trait]
impl WorkoutBackend for HttpBackend {
    async fn analyze(&self, video: SelectedVideo) -> Result<AnalysisReport, ApiError> {
        let url = self.endpoint(ANALYZE_PATH)?;
        let file = tokio::fs::File::open(&video.path).await?;
        let part = multipart::Part::stream_with_length(Body::from(file), video.size)
            .file_name(video.file_name.clone())
            .mime_str("video/mp4")?;
        let form = multipart::Form::new().part("video", part);

        log::debug!("POST {url} ({} bytes)", video.size);
        let response = self.client.post(url).multipart(form).send().await?;
        read_body::<Ack<AnalysisReport>>(response).await?.into_result()
    }

    async fn start_camera(&self) -> Result<StartReply, ApiError> {
        self.get::<Ack<StartReply>>(START_PATH).await?.into_result()
    }

    async fn stop_workout(&self) -> Result<StopReply, ApiError> {
        self.get::<Ack<StopReply>>(STOP_PATH).await?.into_result()
    }

    async fn live_stats(&self) -> Result<LiveStats, ApiError> {
        self.get(LIVE_STATS_PATH).await
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>, ApiError> {
        self.get(HISTORY_PATH).await
    }
}
