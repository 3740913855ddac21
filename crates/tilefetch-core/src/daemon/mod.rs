//! Docker image export through the local daemon.
//!
//! Talks to the Engine API (`GET /images/{name}/get`) over the unix socket or
//! tcp address named by `DOCKER_HOST`, using the same libcurl stack as HTTP
//! downloads. The archive is streamed verbatim into a sink.

mod endpoint;

pub use endpoint::{DaemonEndpoint, DEFAULT_SOCKET};

use crate::resource::ImageRef;
use crate::transport::{stream_body, ChunkSink, TransportError};
use std::io;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DaemonError {
    /// Connection parameters are missing or unusable.
    #[error("{0}")]
    NotConfigured(String),
    /// The daemon could not be reached or the request failed mid-way.
    #[error("docker request failed: {0}")]
    Request(#[from] curl::Error),
    /// The daemon answered with an error status (404 for unknown images).
    #[error("docker daemon returned HTTP {0}")]
    Status(u32),
    #[error("writing image archive failed: {0}")]
    Sink(#[source] io::Error),
}

impl From<TransportError> for DaemonError {
    fn from(e: TransportError) -> Self {
        match e {
            TransportError::Status(code) => DaemonError::Status(code),
            TransportError::Curl(e) => DaemonError::Request(e),
            TransportError::Sink(e) => DaemonError::Sink(e),
        }
    }
}

/// Container-daemon collaborator used by the fetcher for image resources.
pub trait ImageSource {
    /// Streams the archive of `image` into `sink`. Returns the bytes delivered.
    fn export_image(&self, image: &ImageRef, sink: &mut ChunkSink<'_>) -> Result<u64, DaemonError>;
}

/// Engine API client. The endpoint is resolved on every export, so a daemon
/// started after construction is still picked up.
#[derive(Debug, Clone, Default)]
pub struct DockerDaemon {
    host_override: Option<String>,
}

impl DockerDaemon {
    /// `host_override` takes precedence over `DOCKER_HOST` when set.
    pub fn new(host_override: Option<String>) -> Self {
        Self { host_override }
    }
}

impl ImageSource for DockerDaemon {
    fn export_image(&self, image: &ImageRef, sink: &mut ChunkSink<'_>) -> Result<u64, DaemonError> {
        let endpoint = DaemonEndpoint::resolve(self.host_override.as_deref())?;
        // ImageRef only admits characters that are valid unescaped in a path.
        let url = format!("{}/images/{}/get", endpoint.base_url(), image.as_str());
        tracing::debug!(%image, ?endpoint, "exporting image from docker daemon");

        let mut easy = curl::easy::Easy::new();
        if let DaemonEndpoint::Unix(path) = &endpoint {
            easy.unix_socket(&path.to_string_lossy())?;
        }
        easy.url(&url)?;
        easy.connect_timeout(Duration::from_secs(10))?;
        easy.fail_on_error(true)?;

        let (delivered, result) = stream_body(&mut easy, sink);
        match result {
            Err(TransportError::Curl(e)) if e.is_http_returned_error() => {
                return Err(DaemonError::Status(easy.response_code().unwrap_or(0)));
            }
            Err(e) => return Err(e.into()),
            Ok(()) => {}
        }
        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(DaemonError::Status(code));
        }
        Ok(delivered)
    }
}
