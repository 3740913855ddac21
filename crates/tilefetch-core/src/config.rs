use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// HTTP transport parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connect timeout in seconds. The transfer itself has no timeout.
    pub connect_timeout_secs: u64,
    /// Value sent in the `User-Agent` header.
    pub user_agent: String,
    /// Maximum number of redirects followed per GET.
    pub max_redirections: u32,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            user_agent: "tilefetch".to_string(),
            max_redirections: 10,
        }
    }
}

/// Global configuration loaded from `~/.config/tilefetch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TilefetchConfig {
    /// Cache directory consulted for URL and path fetches when `--cache` is not given.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    /// Cache directory consulted for image fetches when `--docker-cache` is not given.
    #[serde(default)]
    pub docker_cache_dir: Option<PathBuf>,
    /// Docker daemon address (`unix:///path` or `tcp://host:port`). Overrides `DOCKER_HOST`.
    #[serde(default)]
    pub docker_host: Option<String>,
    #[serde(default)]
    pub http: HttpConfig,
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("tilefetch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<TilefetchConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = TilefetchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: TilefetchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
