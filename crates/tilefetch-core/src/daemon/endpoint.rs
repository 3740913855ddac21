//! Docker daemon address resolution from `DOCKER_HOST`.

use super::DaemonError;
use std::path::{Path, PathBuf};

/// Socket used when `DOCKER_HOST` is not set.
pub const DEFAULT_SOCKET: &str = "/var/run/docker.sock";

/// Engine API port used for `tcp://` hosts without an explicit port.
const DEFAULT_TCP_PORT: u16 = 2375;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DaemonEndpoint {
    Unix(PathBuf),
    Tcp { host: String, port: u16 },
}

impl DaemonEndpoint {
    /// Resolves the endpoint from an explicit override or the process environment.
    pub fn resolve(host_override: Option<&str>) -> Result<Self, DaemonError> {
        Self::resolve_with(host_override, |key| std::env::var(key).ok())
    }

    /// Like [`resolve`](Self::resolve) with a custom environment lookup.
    ///
    /// `DOCKER_TLS_VERIFY` is ignored: the daemon is always spoken to in plain
    /// HTTP, matching how local packaging hosts expose it.
    pub fn resolve_with<F>(host_override: Option<&str>, lookup: F) -> Result<Self, DaemonError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = lookup("DOCKER_HOST").filter(|h| !h.trim().is_empty());
        let endpoint = match host_override.map(str::to_string).or(from_env) {
            Some(host) => Self::parse(host.trim())?,
            None => DaemonEndpoint::Unix(PathBuf::from(DEFAULT_SOCKET)),
        };
        if lookup("DOCKER_TLS_VERIFY").is_some_and(|v| !v.is_empty()) {
            tracing::debug!("DOCKER_TLS_VERIFY is set; talking plain HTTP to the daemon anyway");
        }

        if let DaemonEndpoint::Unix(path) = &endpoint {
            if !Path::new(path).exists() {
                return Err(DaemonError::NotConfigured(format!(
                    "docker socket {} does not exist",
                    path.display()
                )));
            }
        }
        Ok(endpoint)
    }

    /// Parses a `DOCKER_HOST` value: `unix:///path/to/sock` or `tcp://host[:port]`.
    pub fn parse(host: &str) -> Result<Self, DaemonError> {
        if let Some(path) = host.strip_prefix("unix://") {
            if path.is_empty() {
                return Err(DaemonError::NotConfigured(format!(
                    "DOCKER_HOST {host:?} has no socket path"
                )));
            }
            return Ok(DaemonEndpoint::Unix(PathBuf::from(path)));
        }
        if host.starts_with("tcp://") {
            let parsed = url::Url::parse(host).map_err(|e| {
                DaemonError::NotConfigured(format!("DOCKER_HOST {host:?} is not a valid address: {e}"))
            })?;
            let Some(h) = parsed.host_str().filter(|h| !h.is_empty()) else {
                return Err(DaemonError::NotConfigured(format!(
                    "DOCKER_HOST {host:?} has no host"
                )));
            };
            return Ok(DaemonEndpoint::Tcp {
                host: h.to_string(),
                port: parsed.port().unwrap_or(DEFAULT_TCP_PORT),
            });
        }
        Err(DaemonError::NotConfigured(format!(
            "unsupported DOCKER_HOST {host:?} (expected unix:// or tcp://)"
        )))
    }

    /// Base URL for Engine API requests. Unix sockets use a placeholder host;
    /// the socket itself is set on the curl handle.
    pub(crate) fn base_url(&self) -> String {
        match self {
            DaemonEndpoint::Unix(_) => "http://localhost".to_string(),
            DaemonEndpoint::Tcp { host, port } => format!("http://{host}:{port}"),
        }
    }
}
