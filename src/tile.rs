use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// Layout hint shared by every tile; the grid never computes spans.
pub const DEFAULT_SPAN: u8 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TileKind {
    Project,
    Experience,
    Education,
}

impl TileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TileKind::Project => "project",
            TileKind::Experience => "experience",
            TileKind::Education => "education",
        }
    }
}

impl fmt::Display for TileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Raw attributes the priority scorer reads. Never serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signals {
    Repo {
        stars: u64,
        has_description: bool,
        pushed_at: Option<String>,
    },
    Resume {
        kind: TileKind,
        /// Index among entries of the same kind, in document order.
        position: usize,
        affiliation: String,
    },
}

/// Canonical display unit written to the tile collections.
///
/// Field order here is the key order in the published YAML.
#[derive(Debug, Clone, Serialize)]
pub struct Tile {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub name: String,
    pub title: String,
    pub description: String,
    #[serde(rename = "url")]
    pub locator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(flatten)]
    pub source: SourceFields,
    pub priority: i64,
    pub tags: Vec<String>,
    pub featured: bool,
    pub span_columns: u8,
    pub span_rows: u8,
    #[serde(skip)]
    pub signals: Signals,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SourceFields {
    Repo(RepoFields),
    Resume { meta: EntryMeta },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepoFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub stars: u64,
    pub forks: u64,
    pub topics: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pushed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traffic: Option<Traffic>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Traffic {
    pub views_14d: u64,
    pub unique_visitors_14d: u64,
}

/// Header metadata of one résumé entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum EntryMeta {
    Job {
        company: String,
        title: String,
        location: String,
        dates: String,
    },
    Degree {
        school: String,
        degree: String,
        location: String,
        dates: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        gpa: Option<String>,
    },
}

impl EntryMeta {
    pub fn kind(&self) -> TileKind {
        match self {
            EntryMeta::Job { .. } => TileKind::Experience,
            EntryMeta::Degree { .. } => TileKind::Education,
        }
    }

    /// Company or school name.
    pub fn organization(&self) -> &str {
        match self {
            EntryMeta::Job { company, .. } => company,
            EntryMeta::Degree { school, .. } => school,
        }
    }

    /// Job title or degree, without dates.
    pub fn headline(&self) -> &str {
        match self {
            EntryMeta::Job { title, .. } => title,
            EntryMeta::Degree { degree, .. } => degree,
        }
    }

    pub fn location(&self) -> &str {
        match self {
            EntryMeta::Job { location, .. } | EntryMeta::Degree { location, .. } => location,
        }
    }

    pub fn dates(&self) -> &str {
        match self {
            EntryMeta::Job { dates, .. } | EntryMeta::Degree { dates, .. } => dates,
        }
    }

    pub fn gpa(&self) -> Option<&str> {
        match self {
            EntryMeta::Job { .. } => None,
            EntryMeta::Degree { gpa, .. } => gpa.as_deref(),
        }
    }
}

/// Narrative content behind one résumé tile's detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailRecord {
    pub slug: String,
    #[serde(flatten)]
    pub meta: EntryMeta,
    pub description_html: String,
}

impl DetailRecord {
    pub fn kind(&self) -> TileKind {
        self.meta.kind()
    }

    /// Site-relative path of the rendered page, keyed by `{kind}/{slug}`.
    pub fn page_path(&self) -> String {
        format!("writing/{}/{}.html", self.kind(), self.slug)
    }
}

/// Lowercase, collapse every run of non-alphanumerics into `-`, trim dashes.
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    NON_SLUG_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// "steam-hours" -> "Steam Hours". A letter following a non-letter is
/// upper-cased, every other letter lower-cased.
pub fn title_from_name(name: &str) -> String {
    let spaced = name.replace(['-', '_'], " ");
    let mut out = String::with_capacity(spaced.len());
    let mut prev_alpha = false;
    for c in spaced.chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Hands out slugs that are unique within one generation run.
#[derive(Debug, Default)]
pub struct SlugRegistry {
    taken: HashSet<String>,
}

impl SlugRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, base: &str) -> String {
        let base = if base.is_empty() { "untitled" } else { base };
        if self.taken.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2;
        loop {
            let candidate = format!("{base}-{n}");
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

// ── Published documents ──

#[derive(Debug, Serialize)]
pub struct ProjectsDocument<'a> {
    pub metadata: ProjectsMetadata,
    pub projects: &'a [Tile],
}

#[derive(Debug, Serialize)]
pub struct ProjectsMetadata {
    pub generated_at: String,
    pub source_api: String,
    pub total_repos: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeTilesDocument<'a> {
    pub metadata: ResumeTilesMetadata,
    pub tiles: &'a [Tile],
}

#[derive(Debug, Serialize)]
pub struct ResumeTilesMetadata {
    pub generated_at: String,
    pub source: &'static str,
    pub total_tiles: usize,
}

#[derive(Debug, Serialize)]
pub struct ResumeDetailsDocument<'a> {
    pub metadata: DetailsMetadata,
    pub experiences: Vec<&'a DetailRecord>,
    pub education: Vec<&'a DetailRecord>,
}

#[derive(Debug, Serialize)]
pub struct DetailsMetadata {
    pub generated_at: String,
}

/// Read-side view of a published tile, used by `list`.
#[derive(Debug, Clone, Deserialize)]
pub struct TileSummary {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: TileKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: i64,
    #[serde(default)]
    pub featured: bool,
}
