//! Container image references (`repository[:tag][@digest]`).

use crate::error::FetchError;
use std::fmt;

/// Suffix of image archives stored in a cache directory.
const CACHE_SUFFIX: &str = ".tgz";

/// A parsed image reference. Keeps the original text, which is what the
/// daemon is asked for and what the cache file name is derived from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    raw: String,
    repository: String,
    tag: Option<String>,
    digest: Option<String>,
}

impl ImageRef {
    /// Parses `repository[:tag][@digest]`.
    ///
    /// The tag separator is the last `:` after the last `/`, so a registry
    /// port (`host:5000/app`) is not mistaken for a tag.
    pub fn parse(reference: &str) -> Result<Self, FetchError> {
        let invalid = |reason: &'static str| FetchError::InvalidImageRef {
            reference: reference.to_string(),
            reason,
        };

        if reference.is_empty() {
            return Err(invalid("empty reference"));
        }
        if let Some(c) = reference.chars().find(|c| !is_reference_char(*c)) {
            tracing::debug!(%reference, bad = ?c, "rejecting image reference");
            return Err(invalid("contains characters not allowed in an image reference"));
        }

        let (name, digest) = match reference.split_once('@') {
            Some((_, "")) => return Err(invalid("empty digest")),
            Some((name, digest)) => (name, Some(digest.to_string())),
            None => (reference, None),
        };

        let last_slash = name.rfind('/').map_or(0, |i| i + 1);
        let (repository, tag) = match name[last_slash..].rfind(':') {
            Some(i) => {
                let split = last_slash + i;
                let tag = &name[split + 1..];
                if tag.is_empty() {
                    return Err(invalid("empty tag"));
                }
                (&name[..split], Some(tag.to_string()))
            }
            None => (name, None),
        };

        if repository.is_empty() || repository.ends_with('/') || repository.starts_with('/') {
            return Err(invalid("empty repository name"));
        }

        Ok(ImageRef {
            raw: reference.to_string(),
            repository: repository.to_string(),
            tag,
            digest,
        })
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    /// The reference exactly as given.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Cache file name: lower-cased reference with `/` and `:` replaced by `-`,
    /// suffixed `.tgz`. `cfplatformeng/App:1.0` → `cfplatformeng-app-1.0.tgz`.
    pub fn cache_filename(&self) -> String {
        let mut name: String = self
            .raw
            .to_lowercase()
            .chars()
            .map(|c| if c == '/' || c == ':' { '-' } else { c })
            .collect();
        name.push_str(CACHE_SUFFIX);
        name
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn is_reference_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '/' | ':' | '@')
}
