use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::client::Endpoint;

pub const DEFAULT_ORIGIN: &str = "http://127.0.0.1:5000";
pub const DEFAULT_PRODUCTION_URL: &str = "https://white-char-finder.run.app/analyze";

/// Client configuration. Every key is optional in config sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Host the client runs against; decides local vs production endpoint.
    pub origin: String,
    pub production_url: String,
    /// Theme preference file; platform config dir when unset.
    pub theme_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            origin: DEFAULT_ORIGIN.to_string(),
            production_url: DEFAULT_PRODUCTION_URL.to_string(),
            theme_file: None,
        }
    }
}

impl Settings {
    pub fn endpoint(&self) -> Result<Endpoint> {
        let origin = Url::parse(self.origin.trim())
            .with_context(|| format!("invalid origin URL `{}`", self.origin))?;
        let production = Url::parse(self.production_url.trim())
            .with_context(|| format!("invalid production URL `{}`", self.production_url))?;
        Endpoint::resolve(&origin, &production)
    }
}
