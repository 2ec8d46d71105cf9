//! Async HTTP client for the streaming import endpoint.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::decoder::EventDecoder;
use crate::error::ImportError;
use crate::event::ImportEvent;
use crate::session::{ImportOutcome, ImportSession};

/// Default base URL of the analysis service.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000/api";

/// Connection timeout for the initial request. The stream itself has no
/// overall deadline; imports legitimately run for minutes.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for uploading a refined CSV and consuming the progress stream.
#[derive(Debug, Clone)]
pub struct ImportClient {
    base_url: String,
    token: Option<String>,
    client: Client,
}

impl ImportClient {
    /// Create a client against the given service base URL.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ImportError> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(ImportError::Client)?;
        let base_url: String = base_url.into();
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
            client,
        })
    }

    /// Attach a bearer token to the import request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    /// Upload a CSV and consume the event stream to its terminal state.
    ///
    /// `on_event` sees every decoded event in stream order. The call
    /// resolves once a terminal event arrives (remaining body is not
    /// read; dropping the stream releases the connection), and fails with
    /// [`ImportError::Interrupted`] if the stream closes without one.
    pub async fn import_csv<F>(
        &self,
        file_name: &str,
        csv: Vec<u8>,
        mut on_event: F,
    ) -> Result<ImportOutcome, ImportError>
    where
        F: FnMut(&ImportEvent),
    {
        let part = Part::bytes(csv)
            .file_name(file_name.to_string())
            .mime_str("text/csv")
            .map_err(ImportError::Client)?;
        let form = Form::new().part("file", part);

        let url = format!("{}/analysis/import", self.base_url);
        info!(%url, "starting import upload");
        let mut request = self.client.post(&url).multipart(form);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await.map_err(ImportError::Connect)?;

        let status = response.status();
        if !status.is_success() {
            let detail = read_error_detail(response).await;
            return Err(ImportError::Status { status, detail });
        }

        let mut decoder = EventDecoder::new();
        let mut session = ImportSession::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(ImportError::Stream)?;
            debug!(bytes = chunk.len(), "received chunk");
            for event in decoder.push(&chunk) {
                on_event(&event);
                session.apply(event);
            }
            if session.is_terminal() {
                break;
            }
        }
        decoder.finish();
        session.into_outcome().ok_or(ImportError::Interrupted)
    }

    /// Run the import as a background task.
    ///
    /// Returns the job handle plus a channel of decoded events. The
    /// [`ImportJob`] is the explicit cancellation handle: aborting it
    /// drops the in-flight request and releases the stream immediately.
    #[must_use]
    pub fn spawn(
        &self,
        file_name: String,
        csv: Vec<u8>,
    ) -> (ImportJob, UnboundedReceiver<ImportEvent>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let client = self.clone();
        let handle = tokio::spawn(async move {
            client
                .import_csv(&file_name, csv, |event| {
                    let _ = events_tx.send(event.clone());
                })
                .await
        });
        (ImportJob { handle }, events_rx)
    }
}

/// Handle to a spawned import; owns cancellation.
#[derive(Debug)]
pub struct ImportJob {
    handle: JoinHandle<Result<ImportOutcome, ImportError>>,
}

impl ImportJob {
    /// Cancel the import. The underlying request future is dropped, which
    /// aborts the connection rather than letting an unobserved stream run
    /// to completion.
    pub fn abort(&self) {
        self.handle.abort();
    }

    /// Wait for the import to finish.
    pub async fn join(self) -> Result<ImportOutcome, ImportError> {
        match self.handle.await {
            Ok(result) => result,
            Err(join_error) if join_error.is_panic() => {
                std::panic::resume_unwind(join_error.into_panic())
            }
            Err(_) => Err(ImportError::Cancelled),
        }
    }
}

/// Pull the server-supplied detail string out of an error body, falling
/// back to the raw body or the status reason.
async fn read_error_detail(response: reqwest::Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(body) if !body.trim().is_empty() => serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or(body),
        _ => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    }
}
