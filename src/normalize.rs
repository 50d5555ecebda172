use std::path::{Path, PathBuf};

use tracing::debug;

use crate::github::RawRepo;
use crate::resume::ParsedResume;
use crate::tile::{
    slugify, title_from_name, DetailRecord, RepoFields, Signals, SlugRegistry, SourceFields, Tile,
    TileKind, Traffic, DEFAULT_SPAN,
};

pub const PROJECT_IMAGE_DIR: &str = "assets/images/projects";
/// Probed in this order; the first existing file wins.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];
/// Repositories with more stars than this are featured.
pub const FEATURED_STAR_THRESHOLD: u64 = 5;

/// Looks for a conventional project image under the site root.
pub struct ImageProbe {
    root: PathBuf,
}

impl ImageProbe {
    pub fn new(root: &Path) -> Self {
        ImageProbe {
            root: root.to_path_buf(),
        }
    }

    /// Site-relative path of the first image found for any candidate stem.
    pub fn find(&self, stems: &[&str]) -> Option<String> {
        let mut tried: Vec<&str> = Vec::with_capacity(stems.len());
        for stem in stems {
            if stem.is_empty() || tried.contains(stem) {
                continue;
            }
            tried.push(stem);
            for ext in IMAGE_EXTENSIONS {
                let rel = format!("{PROJECT_IMAGE_DIR}/{stem}.{ext}");
                if self.root.join(&rel).is_file() {
                    debug!("Found image: ./{}", rel);
                    return Some(format!("./{rel}"));
                }
            }
        }
        None
    }
}

fn present(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.trim().is_empty()).cloned()
}

/// Map one repository to a project tile. `priority` stays zero until the
/// scorer runs.
pub fn normalize_repo(
    repo: &RawRepo,
    slugs: &mut SlugRegistry,
    images: &ImageProbe,
    traffic: Option<Traffic>,
) -> Tile {
    let id = slugs.claim(&slugify(&repo.name));
    let description = repo.description.clone().unwrap_or_default();
    let language = present(&repo.language);

    let mut tags: Vec<String> = Vec::with_capacity(repo.topics.len() + 1);
    if let Some(lang) = &language {
        tags.push(lang.to_lowercase());
    }
    tags.extend(repo.topics.iter().map(|t| t.to_lowercase()));

    Tile {
        title: title_from_name(&repo.name),
        image: images.find(&[repo.name.as_str(), id.as_str()]),
        id,
        kind: TileKind::Project,
        name: repo.name.clone(),
        locator: repo.html_url.clone(),
        homepage: present(&repo.homepage),
        source: SourceFields::Repo(RepoFields {
            language,
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            topics: repo.topics.clone(),
            created_at: present(&repo.created_at),
            updated_at: present(&repo.updated_at),
            pushed_at: present(&repo.pushed_at),
            traffic,
        }),
        signals: Signals::Repo {
            stars: repo.stargazers_count,
            has_description: !description.is_empty(),
            pushed_at: present(&repo.pushed_at),
        },
        description,
        priority: 0,
        tags,
        featured: repo.stargazers_count > FEATURED_STAR_THRESHOLD,
        span_columns: DEFAULT_SPAN,
        span_rows: DEFAULT_SPAN,
    }
}

/// Tiles plus their one-to-one detail records.
#[derive(Debug)]
pub struct ResumeTiles {
    pub tiles: Vec<Tile>,
    pub details: Vec<DetailRecord>,
}

fn resume_tags(kind: TileKind) -> Vec<String> {
    let second = match kind {
        TileKind::Education => "academic",
        TileKind::Experience | TileKind::Project => "professional",
    };
    vec![kind.as_str().to_string(), second.to_string()]
}

/// Experience entries first, then education, each in document order.
pub fn normalize_resume(parsed: &ParsedResume) -> ResumeTiles {
    let total = parsed.experience.len() + parsed.education.len();
    let mut tiles = Vec::with_capacity(total);
    let mut details = Vec::with_capacity(total);

    for entries in [&parsed.experience, &parsed.education] {
        let mut slugs = SlugRegistry::new();
        for (position, entry) in entries.iter().enumerate() {
            let kind = entry.kind();
            let organization = entry.meta.organization();
            let detail = DetailRecord {
                slug: slugs.claim(&slugify(organization)),
                meta: entry.meta.clone(),
                description_html: entry.description_html.clone(),
            };

            tiles.push(Tile {
                id: format!("{}-{}", kind, detail.slug),
                kind,
                name: organization.to_string(),
                title: organization.to_string(),
                description: entry.meta.headline().to_string(),
                locator: format!("./{}", detail.page_path()),
                homepage: None,
                image: None,
                source: SourceFields::Resume {
                    meta: entry.meta.clone(),
                },
                priority: 0,
                tags: resume_tags(kind),
                featured: true,
                span_columns: DEFAULT_SPAN,
                span_rows: DEFAULT_SPAN,
                signals: Signals::Resume {
                    kind,
                    position,
                    affiliation: organization.to_string(),
                },
            });
            details.push(detail);
        }
    }

    ResumeTiles { tiles, details }
}
