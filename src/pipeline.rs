use std::fmt;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, SiteConfig};
use crate::curation::filter_curated;
use crate::github::GithubClient;
use crate::normalize::{normalize_repo, normalize_resume, ImageProbe, ResumeTiles};
use crate::priority::{sort_by_priority, Scorer};
use crate::render;
use crate::resume::{self, ParseError, ResumeFetch};
use crate::store::{Document, OutputStore};
use crate::tile::{
    DetailsMetadata, ProjectsDocument, ProjectsMetadata, ResumeDetailsDocument,
    ResumeTilesDocument, ResumeTilesMetadata, SlugRegistry, Tile, TileKind, TileSummary,
};

pub const PROJECTS_PATH: &str = "data/github-projects.yml";
pub const RESUME_TILES_PATH: &str = "data/resume-tiles.yml";
pub const RESUME_DETAILS_PATH: &str = "data/resume-details.yml";

/// Linear run states. `Persisted` is only reached through the writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Fetched,
    Filtered,
    Normalized,
    Scored,
    Sorted,
    Persisted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Start => "start",
            Stage::Fetched => "fetched",
            Stage::Filtered => "filtered",
            Stage::Normalized => "normalized",
            Stage::Scored => "scored",
            Stage::Sorted => "sorted",
            Stage::Persisted => "persisted",
        };
        f.write_str(name)
    }
}

/// Why a run stopped before writing anything.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SkipReason {
    #[error("repository listing failed on the first page: {0}")]
    SourceUnavailable(String),
    #[error("resume source is not configured")]
    NotConfigured,
    #[error("resume document unavailable: {0}")]
    DocumentUnavailable(String),
    #[error("resume document could not be parsed: {0}")]
    Unparseable(#[from] ParseError),
    #[error("resume has no experience or education entries")]
    NoEntries,
}

#[derive(Debug)]
pub enum RunOutcome {
    /// The collection was replaced. `warnings` holds detail page failures.
    Published {
        tiles: Vec<Tile>,
        pages_written: usize,
        warnings: Vec<String>,
    },
    /// Ranked tiles that would have been published.
    DryRun(Vec<Tile>),
    /// Aborted with prior output untouched.
    Skipped { stage: Stage, reason: SkipReason },
}

fn reached(stage: Stage) {
    debug!("Stage: {}", stage);
}

fn skipped(stage: Stage, reason: SkipReason) -> RunOutcome {
    warn!("Run aborted after {}: {}", stage, reason);
    RunOutcome::Skipped { stage, reason }
}

fn timestamp(now: DateTime<Utc>) -> String {
    now.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-"),
    );
    pb
}

/// Score every tile against `now`, then order by priority.
fn rank(tiles: &mut [Tile], site: &SiteConfig, now: DateTime<Utc>) {
    Scorer::new(now, &site.resume_priority).assign(tiles);
    reached(Stage::Scored);
    sort_by_priority(tiles);
    reached(Stage::Sorted);
}

/// Code-host run: list, curate, enrich, normalize, rank, publish.
pub async fn run_projects(
    app: &AppConfig,
    site: &SiteConfig,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<RunOutcome> {
    let identity = app.github_identity()?;
    info!("Fetching repositories for {}", identity.owner);
    let client = GithubClient::new(&app.api_base, &identity)?;

    reached(Stage::Start);
    let listing = client.fetch_repos().await;
    if listing.failed_outright() {
        let reason = listing.failure.map(|f| f.reason).unwrap_or_default();
        return Ok(skipped(Stage::Start, SkipReason::SourceUnavailable(reason)));
    }
    if let Some(failure) = &listing.failure {
        warn!(
            "Continuing with {} repositories; page {} failed",
            listing.repos.len(),
            failure.page
        );
    }
    reached(Stage::Fetched);

    let repos = filter_curated(listing.repos, &site.curated_repos, |r| r.name.as_str());
    reached(Stage::Filtered);

    let images = ImageProbe::new(&app.root);
    let mut slugs = SlugRegistry::new();
    let mut tiles = Vec::with_capacity(repos.len());
    let pb = progress_bar(repos.len());
    for repo in &repos {
        pb.set_message(repo.name.clone());
        let traffic = client.fetch_traffic(&repo.name).await;
        tiles.push(normalize_repo(repo, &mut slugs, &images, traffic));
        pb.inc(1);
    }
    pb.finish_and_clear();
    reached(Stage::Normalized);

    rank(&mut tiles, site, now);
    if dry_run {
        return Ok(RunOutcome::DryRun(tiles));
    }

    let document = ProjectsDocument {
        metadata: ProjectsMetadata {
            generated_at: timestamp(now),
            source_api: client.listing_url(),
            total_repos: tiles.len(),
        },
        projects: &tiles,
    };
    let yaml = serde_yaml::to_string(&document).context("Failed to serialize projects")?;
    OutputStore::new(&app.root).publish(&[Document::new(PROJECTS_PATH, yaml)])?;
    reached(Stage::Persisted);

    Ok(RunOutcome::Published {
        tiles,
        pages_written: 0,
        warnings: Vec::new(),
    })
}

/// Résumé run: fetch, parse, normalize, rank, publish both YAML documents
/// together, then the detail pages.
pub async fn run_resume(
    app: &AppConfig,
    site: &SiteConfig,
    now: DateTime<Utc>,
    dry_run: bool,
) -> Result<RunOutcome> {
    site.resume_priority.validate()?;

    reached(Stage::Start);
    let Some(url) = site.resume_url() else {
        return Ok(skipped(Stage::Start, SkipReason::NotConfigured));
    };
    let html = match resume::fetch_document(url, resume::FETCH_TIMEOUT).await {
        ResumeFetch::Document(html) => html,
        ResumeFetch::Unavailable(reason) => {
            return Ok(skipped(Stage::Start, SkipReason::DocumentUnavailable(reason)));
        }
    };
    reached(Stage::Fetched);

    let parsed = match resume::parse(&html) {
        Ok(parsed) => parsed,
        Err(e) => return Ok(skipped(Stage::Fetched, e.into())),
    };
    if parsed.is_empty() {
        return Ok(skipped(Stage::Fetched, SkipReason::NoEntries));
    }
    reached(Stage::Filtered);

    let ResumeTiles { mut tiles, details } = normalize_resume(&parsed);
    reached(Stage::Normalized);

    rank(&mut tiles, site, now);
    if dry_run {
        return Ok(RunOutcome::DryRun(tiles));
    }

    let generated_at = timestamp(now);
    let tiles_doc = ResumeTilesDocument {
        metadata: ResumeTilesMetadata {
            generated_at: generated_at.clone(),
            source: "resume",
            total_tiles: tiles.len(),
        },
        tiles: &tiles,
    };
    let details_doc = ResumeDetailsDocument {
        metadata: DetailsMetadata { generated_at },
        experiences: details
            .iter()
            .filter(|d| d.kind() == TileKind::Experience)
            .collect(),
        education: details
            .iter()
            .filter(|d| d.kind() == TileKind::Education)
            .collect(),
    };

    let store = OutputStore::new(&app.root);
    store.publish(&[
        Document::new(
            RESUME_TILES_PATH,
            serde_yaml::to_string(&tiles_doc).context("Failed to serialize resume tiles")?,
        ),
        Document::new(
            RESUME_DETAILS_PATH,
            serde_yaml::to_string(&details_doc).context("Failed to serialize resume details")?,
        ),
    ])?;
    reached(Stage::Persisted);

    let pages: Vec<Document> = details
        .iter()
        .map(|d| Document::new(d.page_path(), render::detail_page(d, &site.site_title)))
        .collect();
    let warnings = store.write_pages(&pages);
    info!(
        "Generated {} of {} detail pages",
        pages.len() - warnings.len(),
        pages.len()
    );

    Ok(RunOutcome::Published {
        tiles,
        pages_written: pages.len() - warnings.len(),
        warnings,
    })
}

#[derive(Deserialize)]
struct PublishedProjects {
    #[serde(default)]
    projects: Vec<TileSummary>,
}

#[derive(Deserialize)]
struct PublishedResume {
    #[serde(default)]
    tiles: Vec<TileSummary>,
}

fn read_collection<T, F>(root: &Path, rel: &str, extract: F) -> Result<Vec<TileSummary>>
where
    T: for<'de> Deserialize<'de>,
    F: FnOnce(T) -> Vec<TileSummary>,
{
    let path = root.join(rel);
    if !path.exists() {
        debug!("{} not published yet", path.display());
        return Ok(Vec::new());
    }
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let doc: T = serde_yaml::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(extract(doc))
}

/// Every published tile, highest priority first.
pub fn read_published(root: &Path, kind: Option<TileKind>) -> Result<Vec<TileSummary>> {
    let mut tiles = read_collection(root, PROJECTS_PATH, |d: PublishedProjects| d.projects)?;
    tiles.extend(read_collection(root, RESUME_TILES_PATH, |d: PublishedResume| d.tiles)?);
    if let Some(kind) = kind {
        tiles.retain(|t| t.kind == kind);
    }
    tiles.sort_by(|a, b| b.priority.cmp(&a.priority));
    Ok(tiles)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::error::ConfigError;
    use crate::github::tests::repo_json;
    use crate::priority::OverrideRule;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    fn app(root: &Path, api: &str) -> AppConfig {
        let env: HashMap<&str, String> = [
            ("GITHUB_TOKEN", "test-token".to_string()),
            ("GITHUB_REPOSITORY_OWNER", "octo".to_string()),
            ("GITHUB_API_URL", api.to_string()),
        ]
        .into_iter()
        .collect();
        AppConfig::from_lookup(PathBuf::from(root), move |k| env.get(k).cloned())
    }

    async fn mount_repos(server: &MockServer, page1: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/users/octo/repos"))
            .and(query_param("page", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(page1))
            .mount(server)
            .await;
        Mock::given(method("GET"))
            .and(path("/users/octo/repos"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(server)
            .await;
    }

    async fn mount_resume(server: &MockServer, body: &str) {
        Mock::given(method("GET"))
            .and(path("/cv.html"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(server)
            .await;
    }

    fn resume_site(server: &MockServer) -> SiteConfig {
        SiteConfig {
            resume_source_url: Some(format!("{}/cv.html", server.uri())),
            ..SiteConfig::default()
        }
    }

    fn read(dir: &TempDir, rel: &str) -> String {
        std::fs::read_to_string(dir.path().join(rel)).unwrap()
    }

    fn ids(tiles: &[Tile]) -> Vec<&str> {
        tiles.iter().map(|t| t.id.as_str()).collect()
    }

    #[tokio::test]
    async fn projects_run_publishes_ranked_collection() {
        let server = MockServer::start().await;
        mount_repos(&server, json!([repo_json("alpha", 1), repo_json("beta", 5)])).await;
        let dir = TempDir::new().unwrap();

        let outcome = run_projects(&app(dir.path(), &server.uri()), &SiteConfig::default(), now(), false)
            .await
            .unwrap();

        let RunOutcome::Published { tiles, .. } = outcome else {
            panic!("expected publish, got {outcome:?}");
        };
        assert_eq!(ids(&tiles), ["beta", "alpha"]);
        assert_eq!(tiles[0].priority, 33);
        assert_eq!(tiles[1].priority, 21);

        let yaml = read(&dir, PROJECTS_PATH);
        assert!(yaml.starts_with("metadata:\n  generated_at: "));
        assert!(yaml.contains("2024-06-01T12:00:00Z"));
        assert!(yaml.contains(&format!("{}/users/octo/repos", server.uri())));
        assert!(yaml.contains("total_repos: 2"));
        assert!(yaml.find("id: beta").unwrap() < yaml.find("id: alpha").unwrap());
    }

    #[tokio::test]
    async fn identical_inputs_produce_identical_documents() {
        let server = MockServer::start().await;
        mount_repos(&server, json!([repo_json("alpha", 3), repo_json("beta", 3)])).await;
        let dir = TempDir::new().unwrap();
        let app = app(dir.path(), &server.uri());

        run_projects(&app, &SiteConfig::default(), now(), false).await.unwrap();
        let first = read(&dir, PROJECTS_PATH);
        run_projects(&app, &SiteConfig::default(), now(), false).await.unwrap();
        assert_eq!(read(&dir, PROJECTS_PATH), first);
    }

    #[tokio::test]
    async fn equal_priorities_keep_listing_order() {
        let server = MockServer::start().await;
        mount_repos(
            &server,
            json!([repo_json("zeta", 2), repo_json("alpha", 2), repo_json("mid", 2)]),
        )
        .await;
        let dir = TempDir::new().unwrap();

        let outcome = run_projects(&app(dir.path(), &server.uri()), &SiteConfig::default(), now(), true)
            .await
            .unwrap();
        let RunOutcome::DryRun(tiles) = outcome else {
            panic!("expected dry run, got {outcome:?}");
        };
        assert_eq!(ids(&tiles), ["zeta", "alpha", "mid"]);
        assert!(!dir.path().join(PROJECTS_PATH).exists());
    }

    #[tokio::test]
    async fn first_page_failure_leaves_output_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join(PROJECTS_PATH), "previous: true\n").unwrap();

        let outcome = run_projects(&app(dir.path(), &server.uri()), &SiteConfig::default(), now(), false)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Skipped {
                stage: Stage::Start,
                reason: SkipReason::SourceUnavailable(_)
            }
        ));
        assert_eq!(read(&dir, PROJECTS_PATH), "previous: true\n");
    }

    #[tokio::test]
    async fn curation_that_matches_nothing_publishes_empty_collection() {
        let server = MockServer::start().await;
        mount_repos(&server, json!([repo_json("alpha", 1)])).await;
        let dir = TempDir::new().unwrap();
        let site = SiteConfig {
            curated_repos: vec!["zeta".into()],
            ..SiteConfig::default()
        };

        run_projects(&app(dir.path(), &server.uri()), &site, now(), false)
            .await
            .unwrap();

        let yaml = read(&dir, PROJECTS_PATH);
        assert!(yaml.contains("total_repos: 0"));
        assert!(yaml.contains("projects: []"));
    }

    #[tokio::test]
    async fn missing_token_is_fatal() {
        let dir = TempDir::new().unwrap();
        let app = AppConfig::from_lookup(dir.path().to_path_buf(), |_| None);
        let err = run_projects(&app, &SiteConfig::default(), now(), false)
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<ConfigError>(), Some(&ConfigError::MissingToken));
    }

    #[tokio::test]
    async fn resume_run_publishes_tiles_details_and_pages() {
        let server = MockServer::start().await;
        let html = std::fs::read_to_string("tests/fixtures/resume.html").unwrap();
        mount_resume(&server, &html).await;
        let dir = TempDir::new().unwrap();

        let outcome = run_resume(&app(dir.path(), &server.uri()), &resume_site(&server), now(), false)
            .await
            .unwrap();

        let RunOutcome::Published {
            tiles,
            pages_written,
            warnings,
        } = outcome
        else {
            panic!("expected publish, got {outcome:?}");
        };
        let ranked: Vec<_> = tiles.iter().map(|t| (t.id.as_str(), t.priority)).collect();
        assert_eq!(
            ranked,
            [
                ("experience-halo-robotics", 90),
                ("experience-amplitude", 89),
                ("experience-mast-material", 88),
                ("education-community-college", 80),
                ("education-university-of-wisconsin-madison", 79),
            ]
        );
        assert_eq!(pages_written, 5);
        assert!(warnings.is_empty());

        let tiles_yaml = read(&dir, RESUME_TILES_PATH);
        assert!(tiles_yaml.contains("source: resume"));
        assert!(tiles_yaml.contains("total_tiles: 5"));
        let details_yaml = read(&dir, RESUME_DETAILS_PATH);
        assert!(details_yaml.contains("experiences:"));
        assert!(details_yaml.contains("slug: amplitude"));

        let page = read(&dir, "writing/education/university-of-wisconsin-madison.html");
        assert!(page.contains("GPA: 3.8"));
        assert!(page.contains("Portfolio"));
    }

    #[tokio::test]
    async fn identical_resume_runs_produce_identical_output() {
        let server = MockServer::start().await;
        let html = std::fs::read_to_string("tests/fixtures/resume.html").unwrap();
        mount_resume(&server, &html).await;
        let dir = TempDir::new().unwrap();
        let app = app(dir.path(), &server.uri());
        let site = resume_site(&server);
        let outputs = [
            RESUME_TILES_PATH,
            RESUME_DETAILS_PATH,
            "writing/experience/halo-robotics.html",
            "writing/experience/mast-material.html",
            "writing/education/university-of-wisconsin-madison.html",
        ];

        run_resume(&app, &site, now(), false).await.unwrap();
        let first: Vec<String> = outputs.iter().map(|rel| read(&dir, rel)).collect();
        run_resume(&app, &site, now(), false).await.unwrap();
        let second: Vec<String> = outputs.iter().map(|rel| read(&dir, rel)).collect();

        assert_eq!(first, second);
        let pages = std::fs::read_dir(dir.path().join("writing/experience"))
            .unwrap()
            .count();
        assert_eq!(pages, 3);
    }

    #[tokio::test]
    async fn unparseable_resume_keeps_previous_output() {
        for body in ["404: Not Found", "   \n"] {
            let server = MockServer::start().await;
            mount_resume(&server, body).await;
            let dir = TempDir::new().unwrap();
            std::fs::create_dir_all(dir.path().join("data")).unwrap();
            std::fs::write(dir.path().join(RESUME_TILES_PATH), "tiles: []\n").unwrap();

            let outcome =
                run_resume(&app(dir.path(), &server.uri()), &resume_site(&server), now(), false)
                    .await
                    .unwrap();

            assert!(
                matches!(
                    outcome,
                    RunOutcome::Skipped {
                        stage: Stage::Fetched,
                        reason: SkipReason::Unparseable(_)
                    }
                ),
                "body {body:?} gave {outcome:?}"
            );
            assert_eq!(read(&dir, RESUME_TILES_PATH), "tiles: []\n");
            assert!(!dir.path().join(RESUME_DETAILS_PATH).exists());
        }
    }

    #[tokio::test]
    async fn resume_override_beats_position() {
        let server = MockServer::start().await;
        let html = std::fs::read_to_string("tests/fixtures/resume.html").unwrap();
        mount_resume(&server, &html).await;
        let dir = TempDir::new().unwrap();
        let mut site = resume_site(&server);
        site.resume_priority.overrides.push(OverrideRule {
            kind: TileKind::Experience,
            keyword: "amplitude".into(),
            priority: 100,
        });

        let outcome = run_resume(&app(dir.path(), &server.uri()), &site, now(), true)
            .await
            .unwrap();
        let RunOutcome::DryRun(tiles) = outcome else {
            panic!("expected dry run, got {outcome:?}");
        };
        assert_eq!(tiles[0].id, "experience-amplitude");
        assert_eq!(tiles[0].priority, 100);
        assert!(!dir.path().join(RESUME_TILES_PATH).exists());
    }

    #[tokio::test]
    async fn resume_without_entries_aborts_without_touching_files() {
        let server = MockServer::start().await;
        mount_resume(
            &server,
            r#"<html><body><section class="experience"><h2>Experience</h2></section></body></html>"#,
        )
        .await;
        let dir = TempDir::new().unwrap();

        let outcome = run_resume(&app(dir.path(), &server.uri()), &resume_site(&server), now(), false)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Skipped {
                reason: SkipReason::NoEntries,
                ..
            }
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn unavailable_resume_keeps_previous_output() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join(RESUME_TILES_PATH), "tiles: []\n").unwrap();

        let outcome = run_resume(&app(dir.path(), &server.uri()), &resume_site(&server), now(), false)
            .await
            .unwrap();

        assert!(matches!(
            outcome,
            RunOutcome::Skipped {
                reason: SkipReason::DocumentUnavailable(_),
                ..
            }
        ));
        assert_eq!(read(&dir, RESUME_TILES_PATH), "tiles: []\n");
    }

    #[tokio::test]
    async fn unconfigured_or_disabled_resume_is_skipped() {
        let dir = TempDir::new().unwrap();
        let app = app(dir.path(), "http://127.0.0.1:9");
        for url in [None, Some("DISABLED".to_string())] {
            let site = SiteConfig {
                resume_source_url: url,
                ..SiteConfig::default()
            };
            let outcome = run_resume(&app, &site, now(), false).await.unwrap();
            assert!(matches!(
                outcome,
                RunOutcome::Skipped {
                    reason: SkipReason::NotConfigured,
                    ..
                }
            ));
        }
    }

    #[tokio::test]
    async fn override_inside_band_is_fatal() {
        let dir = TempDir::new().unwrap();
        let mut site = SiteConfig::default();
        site.resume_priority.overrides.push(OverrideRule {
            kind: TileKind::Education,
            keyword: "state".into(),
            priority: 60,
        });
        let err = run_resume(&app(dir.path(), "http://127.0.0.1:9"), &site, now(), false)
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::OverlappingBand { .. })
        ));
    }

    #[test]
    fn published_tiles_are_merged_and_ranked() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(
            dir.path().join(PROJECTS_PATH),
            "metadata:\n  total_repos: 1\nprojects:\n- id: alpha\n  type: project\n  title: Alpha\n  priority: 12\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join(RESUME_TILES_PATH),
            "tiles:\n- id: experience-acme\n  type: experience\n  title: Acme\n  description: Engineer\n  priority: 90\n  featured: true\n",
        )
        .unwrap();

        let all = read_published(dir.path(), None).unwrap();
        let ids: Vec<_> = all.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["experience-acme", "alpha"]);

        let projects = read_published(dir.path(), Some(TileKind::Project)).unwrap();
        assert_eq!(projects.len(), 1);
        assert!(read_published(&dir.path().join("nowhere"), None).unwrap().is_empty());
    }
}
