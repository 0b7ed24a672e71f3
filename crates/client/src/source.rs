//! Where the dashboards get their telemetry from.
//!
//! The solver service publishes every payload as an [`Envelope`] under
//! `/api/<domain>`. [`HttpSource`] reads them from a running service and
//! [`FileSource`] reads the raw schedule exports from a data directory when
//! no service is available.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CACHE_CONTROL;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use timetable_board_core::errors::{BoardError, BoardResult};
use timetable_board_core::models::entry::object_rows;
use timetable_board_core::models::{Envelope, RawEntry, SchedulePayload, TelemetryDomain};

pub const LAB_SCHEDULE_FILE: &str = "lab_schedule.json";
pub const THEORY_SCHEDULE_FILE: &str = "theory_schedule.json";

#[async_trait]
pub trait TelemetrySource: Send + Sync {
    /// The raw lab and theory exports.
    async fn schedule(&self) -> BoardResult<Envelope<SchedulePayload>>;

    /// Any other telemetry payload, left undecoded.
    async fn telemetry(&self, domain: TelemetryDomain) -> BoardResult<Envelope<Value>>;
}

/// Reads telemetry from the solver service over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: String,
}

impl HttpSource {
    /// Creates a source for the service at `base_url`.
    ///
    /// Without a timeout, requests wait as long as the transport allows.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> BoardResult<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| BoardError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch<T>(&self, domain: TelemetryDomain) -> BoardResult<T>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, domain.path());
        debug!("Fetching {} telemetry from {}", domain.slug(), url);

        let mut request = self.client.get(&url);
        if domain.is_volatile() {
            request = request.header(CACHE_CONTROL, "no-store");
        }
        let response = request.send().await.map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            warn!("{} returned {}: {}", url, status, detail);
            return Err(upstream_error(status, detail));
        }

        let body = response.bytes().await.map_err(transport_error)?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl TelemetrySource for HttpSource {
    async fn schedule(&self) -> BoardResult<Envelope<SchedulePayload>> {
        self.fetch(TelemetryDomain::Schedule).await
    }

    async fn telemetry(&self, domain: TelemetryDomain) -> BoardResult<Envelope<Value>> {
        into_envelope(self.fetch(domain).await?)
    }
}

/// Most payloads come wrapped in an envelope; the room export is a bare
/// object and becomes the envelope's data.
fn into_envelope(body: Value) -> BoardResult<Envelope<Value>> {
    if body.get("data").is_some() || body.get("snapshot").is_some() {
        return Ok(serde_json::from_value(body)?);
    }
    if body.is_null() || body.as_object().is_some_and(|fields| fields.is_empty()) {
        return Ok(Envelope::default());
    }
    Ok(Envelope {
        data: body,
        snapshot: None,
    })
}

fn transport_error(err: reqwest::Error) -> BoardError {
    if err.is_decode() {
        BoardError::Decode(err.to_string())
    } else {
        BoardError::Transport(err.to_string())
    }
}

/// The body text is the detail; an empty body falls back to the status reason.
fn upstream_error(status: StatusCode, detail: String) -> BoardError {
    let detail = if detail.trim().is_empty() {
        status.canonical_reason().unwrap_or_default().to_string()
    } else {
        detail
    };
    BoardError::Upstream {
        status: status.as_u16(),
        detail,
    }
}

/// Reads the static schedule exports from a directory.
///
/// Only the schedule is available this way; every other domain comes back
/// as an empty envelope with no snapshot.
#[derive(Debug, Clone)]
pub struct FileSource {
    data_dir: PathBuf,
}

impl FileSource {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    async fn read_entries(&self, file_name: &str) -> BoardResult<Vec<RawEntry>> {
        let path = self.data_dir.join(file_name);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(BoardError::NotFound(path.display().to_string()));
            }
            Err(e) => {
                let report = eyre::Report::new(e).wrap_err(format!("Failed to read {}", path.display()));
                return Err(report.into());
            }
        };

        // Anything other than an array means no entries.
        match serde_json::from_slice::<Value>(&bytes)? {
            Value::Array(items) => {
                let total = items.len();
                let entries = object_rows(items);
                if entries.len() < total {
                    warn!(
                        "Skipped {} non-object rows in {}",
                        total - entries.len(),
                        path.display()
                    );
                }
                Ok(entries)
            }
            _ => {
                warn!("{} is not a JSON array, treating it as empty", path.display());
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl TelemetrySource for FileSource {
    async fn schedule(&self) -> BoardResult<Envelope<SchedulePayload>> {
        let (lab_entries, theory_entries) = tokio::try_join!(
            self.read_entries(LAB_SCHEDULE_FILE),
            self.read_entries(THEORY_SCHEDULE_FILE),
        )?;
        debug!(
            "Loaded {} lab and {} theory entries from {}",
            lab_entries.len(),
            theory_entries.len(),
            self.data_dir.display()
        );

        Ok(Envelope {
            data: SchedulePayload {
                lab_entries,
                theory_entries,
            },
            snapshot: None,
        })
    }

    async fn telemetry(&self, domain: TelemetryDomain) -> BoardResult<Envelope<Value>> {
        debug!("{} telemetry is not available from static files", domain.slug());
        Ok(Envelope::default())
    }
}
