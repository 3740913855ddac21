//! Resource references and cache filename derivation.
//!
//! A resource is what `fetch` is asked to produce locally: an HTTP(S) URL, a
//! filesystem path, or a container image. Each maps deterministically to one
//! file name inside a cache directory.

mod image;
mod path;

pub use image::ImageRef;
pub use path::{basename_of_path, filename_from_url_path};

use crate::error::FetchError;
use std::fmt;
use std::path::{Path, PathBuf};

/// Prefixes that mark a reference string as a container image.
const IMAGE_PREFIXES: [&str; 2] = ["docker://", "docker:"];

/// What to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resource {
    /// `http:` or `https:` reference, fetched with a streaming GET.
    Url(String),
    /// Local file, copied as-is.
    Path(PathBuf),
    /// Container image, exported from the local Docker daemon.
    Image(ImageRef),
}

impl Resource {
    /// Classifies a reference string.
    ///
    /// `docker://name:tag` and `docker:name:tag` are images, strings starting
    /// with `http:` or `https:` are URLs, everything else is a local path.
    pub fn parse(reference: &str) -> Result<Self, FetchError> {
        for prefix in IMAGE_PREFIXES {
            if let Some(rest) = reference.strip_prefix(prefix) {
                return Ok(Resource::Image(ImageRef::parse(rest)?));
            }
        }
        if is_http(reference) {
            return Ok(Resource::Url(reference.to_string()));
        }
        Ok(Resource::Path(PathBuf::from(reference)))
    }

    /// Builds an image resource from a bare `repository[:tag]` reference.
    pub fn image(reference: &str) -> Result<Self, FetchError> {
        Ok(Resource::Image(ImageRef::parse(reference)?))
    }

    /// File name looked up in a cache directory for this resource.
    ///
    /// URLs use their last path segment and paths their file name; when neither
    /// yields a name, the target's basename is used. Images use the sanitized
    /// form described on [`ImageRef::cache_filename`].
    pub fn cache_filename(&self, target: &Path) -> Option<String> {
        match self {
            Resource::Url(url) => {
                filename_from_url_path(url).or_else(|| basename_of_path(target))
            }
            Resource::Path(p) => basename_of_path(p).or_else(|| basename_of_path(target)),
            Resource::Image(image) => Some(image.cache_filename()),
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Url(url) => f.write_str(url),
            Resource::Path(p) => write!(f, "{}", p.display()),
            Resource::Image(image) => write!(f, "{}", image),
        }
    }
}

fn is_http(reference: &str) -> bool {
    reference.starts_with("http:") || reference.starts_with("https:")
}
