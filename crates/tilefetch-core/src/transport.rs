//! Streaming HTTP GET.
//!
//! The body is handed to a sink in chunks of at most [`CHUNK_SIZE`] bytes;
//! empty chunks are never passed on. Runs in the current thread.

use crate::config::HttpConfig;
use std::io;
use std::time::Duration;
use thiserror::Error;

/// Largest chunk handed to a sink. Also the libcurl receive buffer size.
pub const CHUNK_SIZE: usize = 1024;

/// Receives body chunks in order. Returning an error aborts the transfer.
pub type ChunkSink<'a> = dyn FnMut(&[u8]) -> io::Result<()> + 'a;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP {0}")]
    Status(u32),
    #[error(transparent)]
    Curl(#[from] curl::Error),
    #[error("writing response body failed")]
    Sink(#[source] io::Error),
}

/// HTTP collaborator used by the fetcher for `http:`/`https:` resources.
pub trait HttpTransport {
    /// Performs a GET on `url` and streams the body into `sink`.
    /// Non-2xx responses are reported as [`TransportError::Status`].
    /// Returns the number of body bytes delivered.
    fn get(&self, url: &str, sink: &mut ChunkSink<'_>) -> Result<u64, TransportError>;
}

/// libcurl-backed transport.
#[derive(Debug, Clone, Default)]
pub struct CurlTransport {
    config: HttpConfig,
}

impl CurlTransport {
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }
}

impl HttpTransport for CurlTransport {
    fn get(&self, url: &str, sink: &mut ChunkSink<'_>) -> Result<u64, TransportError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.max_redirections(self.config.max_redirections)?;
        easy.useragent(&self.config.user_agent)?;
        easy.connect_timeout(Duration::from_secs(self.config.connect_timeout_secs))?;
        easy.buffer_size(CHUNK_SIZE)?;
        // Error statuses abort before their body reaches the sink.
        easy.fail_on_error(true)?;

        let (delivered, result) = stream_body(&mut easy, sink);
        match result {
            Err(TransportError::Curl(e)) if e.is_http_returned_error() => {
                return Err(TransportError::Status(easy.response_code().unwrap_or(0)));
            }
            Err(e) => return Err(e),
            Ok(()) => {}
        }

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(TransportError::Status(code));
        }
        tracing::debug!(url, bytes = delivered, "GET complete");
        Ok(delivered)
    }
}

/// Runs the transfer configured on `easy`, forwarding the body to `sink` in
/// chunks of at most [`CHUNK_SIZE`] bytes. Returns the bytes delivered and the
/// transfer outcome; a sink failure is reported as [`TransportError::Sink`].
pub(crate) fn stream_body(
    easy: &mut curl::easy::Easy,
    sink: &mut ChunkSink<'_>,
) -> (u64, Result<(), TransportError>) {
    let mut delivered: u64 = 0;
    let mut sink_err: Option<io::Error> = None;

    let mut transfer = easy.transfer();
    let registered = transfer.write_function(|data| match forward_chunks(data, &mut *sink) {
        Ok(n) => {
            delivered += n;
            Ok(data.len())
        }
        Err((n, e)) => {
            tracing::warn!("body write failed: {}", e);
            delivered += n;
            sink_err = Some(e);
            Ok(0) // abort transfer
        }
    });
    let performed = match registered {
        Ok(()) => transfer.perform(),
        Err(e) => Err(e),
    };
    drop(transfer);

    let result = match (sink_err, performed) {
        (Some(e), _) => Err(TransportError::Sink(e)),
        (None, Err(e)) => Err(TransportError::Curl(e)),
        (None, Ok(())) => Ok(()),
    };
    (delivered, result)
}

/// Hands `data` to `sink` in pieces of at most [`CHUNK_SIZE`] bytes. An empty
/// buffer produces no pieces, so the sink never sees an empty chunk. On
/// failure the bytes delivered before the failing piece are returned with the error.
fn forward_chunks(data: &[u8], sink: &mut ChunkSink<'_>) -> Result<u64, (u64, io::Error)> {
    let mut delivered: u64 = 0;
    for chunk in data.chunks(CHUNK_SIZE) {
        sink(chunk).map_err(|e| (delivered, e))?;
        delivered += chunk.len() as u64;
    }
    Ok(delivered)
}
