//! `tilefetch fetch-image <image> <target>` – export from the Docker daemon,
//! falling back to a cache directory.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tilefetch_core::config::TilefetchConfig;
use tilefetch_core::{FetchError, FetchOptions, FetchOutcome, Fetcher, Resource};

pub fn run_fetch_image(
    cfg: &TilefetchConfig,
    image: &str,
    target: &Path,
    docker_cache: Option<PathBuf>,
) -> Result<()> {
    let resource = Resource::image(image)?;
    let opts = FetchOptions {
        cache_dir: docker_cache.or_else(|| cfg.docker_cache_dir.clone()),
    };

    match Fetcher::from_config(cfg).fetch(&resource, target, &opts) {
        Ok(FetchOutcome::Cached { .. }) => {
            println!("using cached version of {}", image);
            Ok(())
        }
        Ok(_) => {
            println!("{} -> {}", image, target.display());
            Ok(())
        }
        Err(e) => {
            if e.is_image_unavailable() {
                tracing::error!(%image, "image unavailable: {}", e);
            }
            if matches!(e, FetchError::ImageNotFound { .. }) {
                eprintln!(
                    "you must either pull the image, or download it and use the --docker-cache option"
                );
            }
            Err(e.into())
        }
    }
}
