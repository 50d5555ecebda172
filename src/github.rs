use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::GithubIdentity;
use crate::tile::Traffic;

const PER_PAGE: u32 = 100;
const API_VERSION: &str = "2022-11-28";
const RATE_LIMIT_WARN_BELOW: u64 = 10;
const USER_AGENT: &str = concat!("site_tiles/", env!("CARGO_PKG_VERSION"));

/// One repository as returned by `GET /users/{owner}/repos`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRepo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub html_url: String,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub topics: Vec<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub pushed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrafficViews {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    uniques: u64,
}

/// Where pagination stopped early, if it did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFailure {
    pub page: u32,
    pub reason: String,
}

/// Everything gathered before pagination ended.
#[derive(Debug)]
pub struct RepoListing {
    pub repos: Vec<RawRepo>,
    pub failure: Option<PageFailure>,
}

impl RepoListing {
    /// Page 1 failed, so nothing usable came back.
    pub fn failed_outright(&self) -> bool {
        self.failure.as_ref().is_some_and(|f| f.page == 1)
    }
}

/// Remaining call budget when it has dropped below the warning threshold.
/// A missing or unreadable header means the host does not rate-limit.
fn low_rate_limit(headers: &HeaderMap) -> Option<u64> {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|remaining| *remaining < RATE_LIMIT_WARN_BELOW)
}

pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    owner: String,
}

impl GithubClient {
    pub fn new(api_base: &str, identity: &GithubIdentity) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", identity.token))
            .context("GITHUB_TOKEN contains characters not allowed in a header")?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert("X-GitHub-Api-Version", HeaderValue::from_static(API_VERSION));

        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(GithubClient {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            owner: identity.owner.clone(),
        })
    }

    pub fn listing_url(&self) -> String {
        format!("{}/users/{}/repos", self.api_base, self.owner)
    }

    /// Page through the owner's repositories until an empty page. A failed
    /// page ends pagination and keeps what was already fetched.
    pub async fn fetch_repos(&self) -> RepoListing {
        let url = self.listing_url();
        let mut repos = Vec::new();
        let mut page = 1u32;

        loop {
            info!("Fetching page {}...", page);
            match self.fetch_page(&url, page).await {
                Ok(batch) if batch.is_empty() => break,
                Ok(batch) => {
                    repos.extend(batch);
                    page += 1;
                }
                Err(e) => {
                    warn!("Repository listing failed on page {}: {:#}", page, e);
                    info!("Fetched {} repositories before the failure", repos.len());
                    return RepoListing {
                        repos,
                        failure: Some(PageFailure {
                            page,
                            reason: format!("{:#}", e),
                        }),
                    };
                }
            }
        }

        info!("Fetched {} repositories", repos.len());
        RepoListing {
            repos,
            failure: None,
        }
    }

    async fn fetch_page(&self, url: &str, page: u32) -> Result<Vec<RawRepo>> {
        let response = self
            .http
            .get(url)
            .query(&[
                ("per_page", PER_PAGE.to_string()),
                ("type", "owner".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("page", page.to_string()),
            ])
            .send()
            .await
            .context("request failed")?;

        if let Some(remaining) = low_rate_limit(response.headers()) {
            warn!("Only {} API calls remaining", remaining);
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("API request failed with status {}: {}", status, body.trim());
        }

        response
            .json::<Vec<RawRepo>>()
            .await
            .context("undecodable repository page")
    }

    /// 14-day view counts. Needs push access, so a 403 is routine for
    /// repositories the token cannot administer; every failure yields `None`.
    pub async fn fetch_traffic(&self, repo: &str) -> Option<Traffic> {
        let url = format!("{}/repos/{}/{}/traffic/views", self.api_base, self.owner, repo);
        let response = match self.http.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!("Traffic request for {} failed: {}", repo, e);
                return None;
            }
        };

        match response.status() {
            StatusCode::OK => match response.json::<TrafficViews>().await {
                Ok(views) => Some(Traffic {
                    views_14d: views.count,
                    unique_visitors_14d: views.uniques,
                }),
                Err(e) => {
                    debug!("Traffic body for {} unreadable: {}", repo, e);
                    None
                }
            },
            StatusCode::FORBIDDEN => {
                debug!("No traffic access for {}", repo);
                None
            }
            other => {
                debug!("Traffic for {} returned {}", repo, other);
                None
            }
        }
    }
}
