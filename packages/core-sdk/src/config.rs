use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};

use crate::{credential::Credential, upstream::{Endpoints, UpstreamClient}};

pub const DEFAULT_ADDR: &str = "127.0.0.1:3001";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/**
 * \brief Runtime settings for the HTTP service.
 */
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /** \brief Listen address, e.g. "127.0.0.1:3001" */
    pub addr: String,
    /** \brief Built single-page client; `ui_fallback_dir` is used when it does not exist. */
    pub ui_dir: PathBuf,
    pub ui_fallback_dir: PathBuf,
    pub endpoints: Endpoints,
    /** \brief Per upstream request, applied by the HTTP client. */
    pub timeout_secs: u64,
    /** \brief Operator key for `GET /api/prompt`; client keys are never used there. */
    pub server_openrouter_key: Option<String>,
    pub telemetry_enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            ui_dir: PathBuf::from("packages/ui/dist"),
            ui_fallback_dir: PathBuf::from("web"),
            endpoints: Endpoints::default(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            server_openrouter_key: None,
            telemetry_enabled: false,
        }
    }
}

impl ServerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn build_client(&self) -> Result<UpstreamClient> {
        UpstreamClient::new(self.endpoints.clone(), self.timeout())
            .context("build upstream http client failed")
    }

    pub fn server_credential(&self) -> Option<Credential> {
        Credential::from_input(self.server_openrouter_key.as_deref())
    }

    pub fn static_root(&self) -> PathBuf {
        if self.ui_dir.exists() {
            self.ui_dir.clone()
        } else {
            self.ui_fallback_dir.clone()
        }
    }
}
