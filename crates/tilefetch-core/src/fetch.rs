//! Fetch a resource into a local target file, preferring a cached copy.
//!
//! - URLs and paths: a matching file in the cache directory short-circuits
//!   the fetch; otherwise URLs are streamed with a GET and paths are copied.
//! - Images: the daemon is asked first; the cache directory is only a
//!   fallback when the daemon cannot deliver the image.

use crate::config::TilefetchConfig;
use crate::daemon::{DaemonError, DockerDaemon, ImageSource};
use crate::error::FetchError;
use crate::resource::{ImageRef, Resource};
use crate::storage::StorageWriter;
use crate::transport::{CurlTransport, HttpTransport, TransportError};
use std::fs;
use std::path::{Path, PathBuf};

/// Per-call fetch options.
#[derive(Debug, Clone, Default)]
pub struct FetchOptions {
    /// Directory consulted for a cached copy of the resource.
    pub cache_dir: Option<PathBuf>,
}

impl FetchOptions {
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }
}

/// How the target file was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Streamed from an HTTP(S) URL.
    Downloaded { bytes: u64 },
    /// Copied from a local path.
    Copied { bytes: u64 },
    /// Exported from the Docker daemon.
    Exported { bytes: u64 },
    /// Copied from the cache directory.
    Cached { path: PathBuf, bytes: u64 },
}

/// Fetches resources through an HTTP transport and an image source.
pub struct Fetcher<T = CurlTransport, D = DockerDaemon> {
    transport: T,
    images: D,
}

impl Fetcher {
    /// libcurl transport and Docker daemon configured from `cfg`.
    pub fn from_config(cfg: &TilefetchConfig) -> Self {
        Fetcher::with_parts(
            CurlTransport::new(cfg.http.clone()),
            DockerDaemon::new(cfg.docker_host.clone()),
        )
    }
}

impl<T: HttpTransport, D: ImageSource> Fetcher<T, D> {
    pub fn with_parts(transport: T, images: D) -> Self {
        Self { transport, images }
    }

    /// Produces `target` from `resource`. See the module docs for the order in
    /// which the cache, the network and the daemon are consulted.
    pub fn fetch(
        &self,
        resource: &Resource,
        target: &Path,
        opts: &FetchOptions,
    ) -> Result<FetchOutcome, FetchError> {
        let cache_dir = opts.cache_dir.as_deref();
        match resource {
            Resource::Image(image) => self.fetch_image(image, target, cache_dir),
            Resource::Url(url) => match from_cache(resource, target, cache_dir)? {
                Some(outcome) => Ok(outcome),
                None => self.download(url, target),
            },
            Resource::Path(source) => match from_cache(resource, target, cache_dir)? {
                Some(outcome) => Ok(outcome),
                None => {
                    let bytes = copy_file(source, target)?;
                    tracing::info!("copied {} to {}", source.display(), target.display());
                    Ok(FetchOutcome::Copied { bytes })
                }
            },
        }
    }

    fn download(&self, url: &str, target: &Path) -> Result<FetchOutcome, FetchError> {
        let mut writer =
            StorageWriter::create(target).map_err(|e| FetchError::io("create", target, e))?;
        let temp = writer.temp_path().to_path_buf();

        let mut sink = |chunk: &[u8]| writer.write_chunk(chunk);
        self.transport
            .get(url, &mut sink)
            .map_err(|e| match e {
                TransportError::Status(status) => FetchError::HttpStatus {
                    url: url.to_string(),
                    status,
                },
                TransportError::Curl(source) => FetchError::Transport {
                    url: url.to_string(),
                    source,
                },
                TransportError::Sink(source) => FetchError::io("write", &temp, source),
            })?;

        let bytes = writer
            .finalize()
            .map_err(|e| FetchError::io("finalize", target, e))?;
        tracing::info!("downloaded {} ({} bytes) to {}", url, bytes, target.display());
        Ok(FetchOutcome::Downloaded { bytes })
    }

    fn fetch_image(
        &self,
        image: &ImageRef,
        target: &Path,
        cache_dir: Option<&Path>,
    ) -> Result<FetchOutcome, FetchError> {
        let err = match self.export(image, target) {
            Ok(outcome) => return Ok(outcome),
            Err(e) => e,
        };
        tracing::warn!(%image, "docker export failed: {}", err);

        if let Some(cache_dir) = cache_dir {
            let cached = cache_dir.join(image.cache_filename());
            if cached.is_file() {
                tracing::info!("using cached version of {}", image);
                return copy_cached(&cached, target);
            }
            return Err(FetchError::ImageNotCached {
                image: image.to_string(),
                cache_dir: cache_dir.to_path_buf(),
            });
        }

        Err(match err {
            DaemonError::NotConfigured(reason) => FetchError::DaemonNotConfigured { reason },
            other => FetchError::ImageNotFound {
                image: image.to_string(),
                reason: other.to_string(),
            },
        })
    }

    fn export(&self, image: &ImageRef, target: &Path) -> Result<FetchOutcome, DaemonError> {
        let mut writer = StorageWriter::create(target).map_err(DaemonError::Sink)?;
        let mut sink = |chunk: &[u8]| writer.write_chunk(chunk);
        self.images.export_image(image, &mut sink)?;
        let bytes = writer.finalize().map_err(DaemonError::Sink)?;
        tracing::info!("exported {} ({} bytes) to {}", image, bytes, target.display());
        Ok(FetchOutcome::Exported { bytes })
    }
}

/// Copies the cached copy of a URL or path resource to `target`, if the cache has one.
fn from_cache(
    resource: &Resource,
    target: &Path,
    cache_dir: Option<&Path>,
) -> Result<Option<FetchOutcome>, FetchError> {
    let Some(cache_dir) = cache_dir else {
        return Ok(None);
    };
    let Some(name) = resource.cache_filename(target) else {
        return Ok(None);
    };
    let cached = cache_dir.join(&name);
    if !cached.is_file() {
        tracing::debug!("{} not in cache {}", name, cache_dir.display());
        return Ok(None);
    }
    tracing::info!("using cached version of {}", name);
    copy_cached(&cached, target).map(Some)
}

fn copy_cached(cached: &Path, target: &Path) -> Result<FetchOutcome, FetchError> {
    let bytes = copy_file(cached, target)?;
    Ok(FetchOutcome::Cached {
        path: cached.to_path_buf(),
        bytes,
    })
}

/// Copies `source` over `target`. When both name the same file the copy is
/// skipped: `fs::copy` would truncate it before reading.
fn copy_file(source: &Path, target: &Path) -> Result<u64, FetchError> {
    if is_same_file(source, target) {
        let bytes = fs::metadata(source)
            .map_err(|e| FetchError::io("stat", source, e))?
            .len();
        tracing::debug!("{} is already the target, not copying", source.display());
        return Ok(bytes);
    }
    fs::copy(source, target).map_err(|e| FetchError::io("copy", source, e))
}

#[cfg(unix)]
fn is_same_file(a: &Path, b: &Path) -> bool {
    use std::os::unix::fs::MetadataExt;
    match (fs::metadata(a), fs::metadata(b)) {
        (Ok(a), Ok(b)) => a.dev() == b.dev() && a.ino() == b.ino(),
        _ => false,
    }
}

#[cfg(not(unix))]
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
