//! `tilefetch fetch <resource> <target>` – URL, local file or docker:// image, cache first.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tilefetch_core::config::TilefetchConfig;
use tilefetch_core::{FetchOptions, FetchOutcome, Fetcher, Resource};

pub fn run_fetch(
    cfg: &TilefetchConfig,
    resource: &str,
    target: &Path,
    cache: Option<PathBuf>,
) -> Result<()> {
    let resource = Resource::parse(resource)?;
    let opts = FetchOptions {
        cache_dir: cache.or_else(|| default_cache_dir(cfg, &resource)),
    };
    let outcome = Fetcher::from_config(cfg)
        .fetch(&resource, target, &opts)
        .with_context(|| format!("fetch {}", resource))?;

    match outcome {
        FetchOutcome::Cached { path, .. } => {
            println!("using cached version of {}", path.display());
        }
        FetchOutcome::Downloaded { bytes }
        | FetchOutcome::Copied { bytes }
        | FetchOutcome::Exported { bytes } => {
            println!("{} -> {} ({} bytes)", resource, target.display(), bytes);
        }
    }
    Ok(())
}

/// Configured cache for `resource` when `--cache` is not given: images use
/// `docker_cache_dir`, URLs and paths use `cache_dir`.
fn default_cache_dir(cfg: &TilefetchConfig, resource: &Resource) -> Option<PathBuf> {
    match resource {
        Resource::Image(_) => cfg.docker_cache_dir.clone(),
        Resource::Url(_) | Resource::Path(_) => cfg.cache_dir.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> TilefetchConfig {
        TilefetchConfig {
            cache_dir: Some(PathBuf::from("/var/cache/files")),
            docker_cache_dir: Some(PathBuf::from("/var/cache/images")),
            ..TilefetchConfig::default()
        }
    }

    #[test]
    fn image_resource_uses_docker_cache_dir() {
        let resource = Resource::parse("docker://redis:7").unwrap();
        assert_eq!(
            default_cache_dir(&cfg(), &resource),
            Some(PathBuf::from("/var/cache/images"))
        );
    }

    #[test]
    fn url_and_path_use_cache_dir() {
        for r in ["https://example.com/r.tgz", "resources/app.zip"] {
            let resource = Resource::parse(r).unwrap();
            assert_eq!(
                default_cache_dir(&cfg(), &resource),
                Some(PathBuf::from("/var/cache/files"))
            );
        }
    }

    #[test]
    fn image_without_docker_cache_has_no_default() {
        let cfg = TilefetchConfig {
            cache_dir: Some(PathBuf::from("/var/cache/files")),
            ..TilefetchConfig::default()
        };
        let resource = Resource::parse("docker://redis:7").unwrap();
        assert_eq!(default_cache_dir(&cfg, &resource), None);
    }
}
