//! Meal photo upload channel and scan session driver.
//!
//! A scan is one combined request: the photo goes up as a multipart body
//! and the response comes back as a server-sent-event stream of analysis
//! messages. A spawned consumer task owns that stream, decodes each
//! message, folds it through the `appetit-core` state machine, and
//! publishes every changed snapshot on a watch channel. The returned
//! [`ScanHandle`] is the consumer's side of the session: read or await
//! snapshots, and cancel — explicitly or by dropping the handle.
//!
//! Each session owns its connection and shares no state with other
//! sessions, so any number of scans can run concurrently.

use appetit_core::config::ClientConfig;
use appetit_core::error::{AppetitError, Result};
use appetit_core::scan::event::ScanEvent;
use appetit_core::scan::machine::ScanUpdate;
use appetit_core::scan::model::ScanSnapshot;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use std::path::Path;
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info_span, warn};
use uuid::Uuid;

const ANALYZE_PATH: &str = "/vision/analyze-image";
const IMAGE_FIELD: &str = "image";

/// A ready-to-upload encoded image.
///
/// Capture and resizing happen upstream; this type only carries the bytes
/// plus the metadata the multipart body needs. Immutable once created.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    bytes: Vec<u8>,
    filename: String,
    content_type: String,
}

impl ImagePayload {
    /// Wraps encoded image bytes. Rejects an empty payload.
    pub fn new(
        bytes: Vec<u8>,
        filename: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Result<Self> {
        if bytes.is_empty() {
            return Err(AppetitError::invalid_payload("empty image payload"));
        }
        Ok(Self {
            bytes,
            filename: filename.into(),
            content_type: content_type.into(),
        })
    }

    /// Reads an image from disk, deriving the content type from the file
    /// extension.
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        let content_type = mime_guess::from_path(path)
            .first()
            .map(|mime| mime.to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self::new(bytes, filename, content_type)
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Raw message sequence pulled from one open upload channel.
pub(crate) type MessageStream = BoxStream<'static, Result<String>>;

/// Client for the photo analysis endpoint.
#[derive(Clone)]
pub struct VisionClient {
    client: Client,
    base_url: String,
}

impl VisionClient {
    /// Creates a client from connection settings.
    ///
    /// Only the connect timeout applies here: the event stream stays open
    /// for as long as the analysis runs, so an overall request timeout
    /// would cut healthy scans short.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    /// Starts a scan session and returns the handle the presentation
    /// layer drives it through.
    ///
    /// Must be called from within a tokio runtime: the session runs on a
    /// spawned task that uploads the image, consumes the pushed events
    /// strictly in arrival order, and publishes snapshots until exactly
    /// one terminal snapshot ends the session.
    pub fn scan(&self, payload: ImagePayload) -> ScanHandle {
        let (tx, rx) = watch::channel(ScanSnapshot::new());
        let cancel = CancellationToken::new();
        let session_id = Uuid::new_v4();

        let client = self.clone();
        let token = cancel.clone();
        tokio::spawn(
            run_session(client, payload, tx, token)
                .instrument(info_span!("scan_session", id = %session_id)),
        );

        ScanHandle { rx, cancel }
    }

    /// Opens the combined upload/stream request. Exactly one open per
    /// session; dropping the returned stream aborts the connection.
    pub(crate) async fn open(&self, payload: ImagePayload) -> Result<MessageStream> {
        let ImagePayload {
            bytes,
            filename,
            content_type,
        } = payload;

        let part = Part::bytes(bytes)
            .file_name(filename)
            .mime_str(&content_type)
            .map_err(|err| {
                AppetitError::invalid_payload(format!(
                    "unusable content type '{}': {}",
                    content_type, err
                ))
            })?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let url = format!("{}{}", self.base_url, ANALYZE_PATH);
        debug!(%url, "opening scan upload channel");
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(AppetitError::http(status.as_u16(), body));
        }

        Ok(message_stream(response))
    }
}

/// Turns the streaming response body into complete SSE `data` payloads.
fn message_stream(response: reqwest::Response) -> MessageStream {
    let mut parser = crate::sse::SseParser::new();
    response
        .bytes_stream()
        .map(move |chunk| match chunk {
            Ok(bytes) => Ok(parser.push(&bytes)),
            Err(err) => Err(AppetitError::from(err)),
        })
        .flat_map(|result| match result {
            Ok(payloads) => stream::iter(payloads.into_iter().map(Ok).collect::<Vec<_>>()),
            Err(err) => stream::iter(vec![Err(err)]),
        })
        .boxed()
}

/// The consumer's side of one scan session.
///
/// Dropping the handle cancels the session: a discarded handle means the
/// consumer is no longer interested, and the connection must not outlive
/// it.
pub struct ScanHandle {
    rx: watch::Receiver<ScanSnapshot>,
    cancel: CancellationToken,
}

impl ScanHandle {
    /// The latest published snapshot.
    pub fn snapshot(&self) -> ScanSnapshot {
        self.rx.borrow().clone()
    }

    /// A watch receiver over the session's snapshots. The channel closes
    /// after the terminal snapshot is published, so no snapshot is ever
    /// observable past the terminal one.
    pub fn subscribe(&self) -> watch::Receiver<ScanSnapshot> {
        self.rx.clone()
    }

    /// Requests cancellation. Idempotent: safe to call any number of
    /// times, including after the session already reached a terminal
    /// phase (then it is a no-op).
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the terminal snapshot.
    pub async fn wait(&mut self) -> ScanSnapshot {
        loop {
            let current = self.rx.borrow_and_update().clone();
            if current.phase.is_terminal() {
                return current;
            }
            if self.rx.changed().await.is_err() {
                return self.rx.borrow().clone();
            }
        }
    }
}

impl Drop for ScanHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Owns one session end to end: upload, event loop, teardown.
async fn run_session(
    client: VisionClient,
    payload: ImagePayload,
    tx: watch::Sender<ScanSnapshot>,
    cancel: CancellationToken,
) {
    let snapshot = ScanSnapshot::new();

    let stream = tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            let _ = tx.send(snapshot.apply(&ScanUpdate::Cancel));
            return;
        }
        opened = client.open(payload) => match opened {
            Ok(stream) => stream,
            Err(err) => {
                warn!(error = %err, "scan upload failed");
                let _ = tx.send(snapshot.apply(&ScanUpdate::StreamError(err.to_string())));
                return;
            }
        },
    };

    pump(stream, &tx, &cancel, snapshot).await;
    // The stream drops here, which tears down the connection.
}

/// Consumes messages strictly sequentially and publishes every snapshot
/// change until a terminal phase is reached.
///
/// Cancellation takes priority over a ready message, so a message racing
/// the cancel signal is never applied.
async fn pump<S>(
    mut stream: S,
    tx: &watch::Sender<ScanSnapshot>,
    cancel: &CancellationToken,
    mut snapshot: ScanSnapshot,
) where
    S: futures::Stream<Item = Result<String>> + Unpin,
{
    loop {
        let update = tokio::select! {
            biased;
            _ = cancel.cancelled() => ScanUpdate::Cancel,
            message = stream.next() => match message {
                Some(Ok(raw)) => match ScanEvent::decode(&raw) {
                    Ok(event) => ScanUpdate::Event(event),
                    Err(err) => {
                        warn!(error = %err, "ignoring undecodable analysis message");
                        continue;
                    }
                },
                Some(Err(err)) => ScanUpdate::StreamError(err.to_string()),
                None => ScanUpdate::StreamEnd,
            },
        };

        let next = snapshot.apply(&update);
        if next != snapshot {
            debug!(phase = %next.phase, items = next.detected_items.len(), "snapshot updated");
            snapshot = next;
            let _ = tx.send(snapshot.clone());
        }

        if snapshot.phase.is_terminal() {
            break;
        }
    }
}
