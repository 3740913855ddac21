//! Error type returned by [`crate::Fetcher::fetch`].
//!
//! Image fetch failures keep the three causes apart (daemon not configured,
//! image not available, image missing from the cache) so the hosting
//! application can choose how to report them or whether to exit.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    /// Docker connection parameters are missing or unusable, and no cache directory was given.
    #[error("docker not configured on this machine (or environment variables are not properly set): {reason}")]
    DaemonNotConfigured { reason: String },

    /// The daemon could not export the image, and no cache directory was given.
    #[error("{image} not found on local machine: {reason}")]
    ImageNotFound { image: String, reason: String },

    /// The daemon could not export the image and the cache directory has no copy of it.
    #[error("{image} not found in cache {}", .cache_dir.display())]
    ImageNotCached { image: String, cache_dir: PathBuf },

    /// The server answered a GET with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u32 },

    /// The GET could not be completed (DNS, connection, TLS, aborted transfer).
    #[error("GET {url} failed")]
    Transport {
        url: String,
        #[source]
        source: curl::Error,
    },

    /// A local read, write, copy or rename failed.
    #[error("{op} {}", .path.display())]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid image reference {reference:?}: {reason}")]
    InvalidImageRef {
        reference: String,
        reason: &'static str,
    },
}

impl FetchError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>, source: io::Error) -> Self {
        FetchError::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// True for the image failures a packaging run cannot continue past
    /// (daemon not configured, image not found, image not cached).
    pub fn is_image_unavailable(&self) -> bool {
        matches!(
            self,
            FetchError::DaemonNotConfigured { .. }
                | FetchError::ImageNotFound { .. }
                | FetchError::ImageNotCached { .. }
        )
    }
}
