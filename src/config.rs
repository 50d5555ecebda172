use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use ::config::{Config, Environment, File, FileFormat};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::ConfigError;
use crate::priority::ResumeRanking;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const SITE_CONFIG_PATH: &str = "data/site-config.yml";
const ENV_PREFIX: &str = "SITE_TILES";
const DEFAULT_SITE_TITLE: &str = "Portfolio";

/// Process-level settings resolved once in `main` and passed down.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub root: PathBuf,
    pub api_base: String,
    token: Option<String>,
    owner: Option<String>,
}

#[derive(Clone)]
pub struct GithubIdentity {
    pub token: String,
    pub owner: String,
}

impl fmt::Debug for GithubIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GithubIdentity")
            .field("token", &"<redacted>")
            .field("owner", &self.owner)
            .finish()
    }
}

impl AppConfig {
    /// Load `.env` from the site root if present, then read the process env.
    pub fn from_env(root: PathBuf) -> Self {
        let env_path = root.join(".env");
        if dotenvy::from_path(&env_path).is_ok() {
            info!("Loaded environment from: {}", env_path.display());
        }
        Self::from_lookup(root, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(root: PathBuf, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let owner = non_empty("GITHUB_REPOSITORY_OWNER").or_else(|| {
            non_empty("GITHUB_REPOSITORY").and_then(|full| {
                full.split_once('/')
                    .map(|(owner, _)| owner.to_string())
                    .filter(|o| !o.is_empty())
            })
        });

        AppConfig {
            root,
            api_base: non_empty("GITHUB_API_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token: non_empty("GITHUB_TOKEN"),
            owner,
        }
    }

    /// Credentials for the code host. Missing values are fatal for the
    /// projects run only.
    pub fn github_identity(&self) -> Result<GithubIdentity, ConfigError> {
        let token = self.token.clone().ok_or(ConfigError::MissingToken)?;
        let owner = self.owner.clone().ok_or(ConfigError::MissingOwner)?;
        Ok(GithubIdentity { token, owner })
    }
}

/// Site-level settings from `data/site-config.yml`, overridable through
/// `SITE_TILES__*` environment variables.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub curated_repos: Vec<String>,
    pub resume_source_url: Option<String>,
    pub site_title: String,
    pub resume_priority: ResumeRanking,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            curated_repos: Vec::new(),
            resume_source_url: None,
            site_title: DEFAULT_SITE_TITLE.to_string(),
            resume_priority: ResumeRanking::default(),
        }
    }
}

impl SiteConfig {
    pub fn load(root: &Path) -> Result<Self> {
        let path = root.join(SITE_CONFIG_PATH);
        let settings = Config::builder()
            .add_source(File::from(path.clone()).format(FileFormat::Yaml).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("curated_repos"),
            )
            .build()
            .with_context(|| format!("Failed to read {}", path.display()))?;
        settings
            .try_deserialize()
            .with_context(|| format!("Invalid site config {}", path.display()))
    }

    /// A missing or broken site config is never fatal: every field has a
    /// safe default (no curation, résumé disabled).
    pub fn load_or_default(root: &Path) -> Self {
        match Self::load(root) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Could not load site config, using defaults: {:#}", e);
                SiteConfig::default()
            }
        }
    }

    /// The résumé URL, unless unset or explicitly `DISABLED`.
    pub fn resume_url(&self) -> Option<&str> {
        self.resume_source_url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty() && *u != "DISABLED")
    }
}
