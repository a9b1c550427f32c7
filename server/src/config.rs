use anyhow::Context;
use f1core::upstream::DEFAULT_BASE_URL;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 9000))
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub bind: SocketAddr,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Serve drivers and stints from this JSON file instead of the live API.
    pub fixture: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            bind: default_bind_address(),
            api_base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            fixture: None,
        }
    }
}

impl DashboardConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading dashboard config {}", path_ref.display()))?;
        let config: DashboardConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing dashboard config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        bind: SocketAddr,
        api_base_url: String,
        request_timeout_secs: u64,
        fixture: Option<PathBuf>,
    ) -> Self {
        Self {
            bind,
            api_base_url,
            request_timeout_secs,
            fixture,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"bind: 0.0.0.0:8080\napi_base_url: http://localhost:5000/v1\n")
            .unwrap();
        let path = temp.into_temp_path();
        let cfg = DashboardConfig::load(&path).unwrap();
        assert_eq!(cfg.bind.port(), 8080);
        assert_eq!(cfg.api_base_url, "http://localhost:5000/v1");
        assert_eq!(cfg.request_timeout_secs, 10);
        assert!(cfg.fixture.is_none());
    }

    #[test]
    fn config_load_reports_bad_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"bind: [not, an, address]\n").unwrap();
        let path = temp.into_temp_path();
        let err = DashboardConfig::load(&path).unwrap_err();
        assert!(err.to_string().starts_with("parsing dashboard config"));
    }

    #[test]
    fn timeout_is_at_least_one_second() {
        let cfg = DashboardConfig::from_args(default_bind_address(), DEFAULT_BASE_URL.into(), 0, None);
        assert_eq!(cfg.request_timeout(), Duration::from_secs(1));
    }
}
