//! Background Source Loader
//!
//! Fetching a narration chunk means network I/O and a decoder probe, which
//! can take hundreds of milliseconds. The loader does both on its own thread
//! so the controller thread never blocks.
//!
//! ## Architecture
//!
//! ```text
//! Controller Thread              Loader Thread
//!        │                              │
//!        │  request(load#3, url)        │
//!        │─────────────────────────────>│
//!        │                              │ fetch bytes (HTTP or file)
//!        │                              │ probe decoder
//!        │                              │
//!        │  poll() -> [LoadResult]      │
//!        │<─────────────────────────────│
//!        │                              │
//! ```
//!
//! Results carry the [`LoadId`] they were requested with. The element
//! compares it with the load it currently wants and drops anything older.

use crate::error::{AudioError, Result};
use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use rodio::{Decoder, Source};
use std::io::Cursor;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tale_playback::LoadId;
use tracing::{debug, warn};

/// HTTP timeout for a single chunk
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Request to load a source
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub load: LoadId,
    pub url: String,
}

/// Encoded audio ready to be decoded into a sink
#[derive(Debug, Clone)]
pub struct LoadedSource {
    pub url: String,
    pub bytes: Arc<[u8]>,
    /// Length reported by the decoder, when the container knows it
    pub duration: Option<Duration>,
}

impl LoadedSource {
    /// Create a fresh decoder over the bytes
    pub fn decoder(&self) -> Result<Decoder<Cursor<Arc<[u8]>>>> {
        Decoder::new(Cursor::new(Arc::clone(&self.bytes))).map_err(|e| AudioError::Decode {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }
}

/// Result of loading a source
#[derive(Debug)]
pub struct LoadResult {
    pub load: LoadId,
    pub outcome: Result<LoadedSource>,
}

/// Background source loader
///
/// Dropping the loader closes the request channel, which ends the thread.
pub struct SourceLoader {
    request_tx: Sender<LoadRequest>,
    result_rx: Receiver<LoadResult>,
    _thread_handle: JoinHandle<()>,
}

impl SourceLoader {
    /// Spawn the loader thread
    pub fn new() -> Result<Self> {
        let (request_tx, request_rx) = unbounded::<LoadRequest>();
        let (result_tx, result_rx) = unbounded::<LoadResult>();

        let thread_handle = thread::Builder::new()
            .name("tale-source-loader".to_string())
            .spawn(move || Self::loader_thread(&request_rx, &result_tx))
            .map_err(|_| AudioError::LoaderStopped)?;

        Ok(Self {
            request_tx,
            result_rx,
            _thread_handle: thread_handle,
        })
    }

    /// Queue a load
    pub fn request(&self, load: LoadId, url: &str) -> Result<()> {
        self.request_tx
            .send(LoadRequest {
                load,
                url: url.to_string(),
            })
            .map_err(|_| AudioError::LoaderStopped)
    }

    /// Results finished since the last poll
    pub fn poll(&self) -> Vec<LoadResult> {
        self.result_rx.try_iter().collect()
    }

    /// Block until the next result arrives
    pub fn wait(&self, timeout: Duration) -> Option<LoadResult> {
        match self.result_rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    fn loader_thread(request_rx: &Receiver<LoadRequest>, result_tx: &Sender<LoadResult>) {
        debug!("Source loader started");

        let client = match reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("CodeTales/", env!("CARGO_PKG_VERSION")))
            .build()
        {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "HTTP client unavailable, only local files can be loaded");
                None
            }
        };

        while let Ok(mut request) = request_rx.recv() {
            // Only the newest queued request is still wanted
            for newer in request_rx.try_iter() {
                debug!(skipped = %request.load, "Skipping superseded load");
                request = newer;
            }

            let start = Instant::now();
            let outcome = load_source(client.as_ref(), &request.url);

            match &outcome {
                Ok(source) => debug!(
                    load = %request.load,
                    url = %request.url,
                    bytes = source.bytes.len(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Source loaded"
                ),
                Err(e) => warn!(load = %request.load, error = %e, "Source failed to load"),
            }

            let result = LoadResult {
                load: request.load,
                outcome,
            };
            if result_tx.send(result).is_err() {
                break;
            }
        }

        debug!("Source loader exiting");
    }
}

/// Fetch and probe one source
fn load_source(client: Option<&reqwest::blocking::Client>, url: &str) -> Result<LoadedSource> {
    let bytes: Arc<[u8]> = fetch(client, url)?.into();

    let source = LoadedSource {
        url: url.to_string(),
        bytes,
        duration: None,
    };
    let duration = source.decoder()?.total_duration();

    Ok(LoadedSource { duration, ..source })
}

fn fetch(client: Option<&reqwest::blocking::Client>, url: &str) -> Result<Vec<u8>> {
    let fetch_error = |reason: String| AudioError::Fetch {
        url: url.to_string(),
        reason,
    };

    if url.starts_with("http://") || url.starts_with("https://") {
        let client = client.ok_or_else(|| fetch_error("HTTP client unavailable".into()))?;
        let response = client
            .get(url)
            .send()
            .and_then(reqwest::blocking::Response::error_for_status)
            .map_err(|e| fetch_error(e.to_string()))?;
        let body = response.bytes().map_err(|e| fetch_error(e.to_string()))?;
        return Ok(body.to_vec());
    }

    let path = url.strip_prefix("file://").unwrap_or(url);
    std::fs::read(path).map_err(|e| fetch_error(e.to_string()))
}
