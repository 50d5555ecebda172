use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::ConfigError;
use crate::tile::{Signals, Tile, TileKind};

const STAR_WEIGHT: f64 = 3.0;
const RECENCY_WEIGHT: f64 = 2.0;
const RECENCY_MAX: f64 = 10.0;
/// One recency point is lost per this many days without a push.
const RECENCY_DECAY_DAYS: f64 = 30.0;

/// 0..=10, decaying linearly to zero over 300 days since the last push.
/// Missing or malformed timestamps score zero.
pub fn recency_score(pushed_at: Option<&str>, now: DateTime<Utc>) -> f64 {
    let Some(pushed) = pushed_at.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()) else {
        return 0.0;
    };
    let days = (now - pushed.with_timezone(&Utc)).num_days();
    (RECENCY_MAX - days as f64 / RECENCY_DECAY_DAYS).clamp(0.0, RECENCY_MAX)
}

/// `3*stars + 2*recency + has_description`, truncated toward zero.
pub fn repo_priority(
    stars: u64,
    has_description: bool,
    pushed_at: Option<&str>,
    now: DateTime<Utc>,
) -> i64 {
    let description = if has_description { 1.0 } else { 0.0 };
    let raw = STAR_WEIGHT * stars as f64
        + RECENCY_WEIGHT * recency_score(pushed_at, now)
        + description;
    raw.trunc() as i64
}

/// Positional priority range for one résumé kind: `max(top - index, floor)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PositionalBand {
    pub top: i64,
    pub floor: i64,
}

impl PositionalBand {
    pub fn priority(&self, position: usize) -> i64 {
        let position = i64::try_from(position).unwrap_or(i64::MAX);
        self.top.saturating_sub(position).max(self.floor)
    }

    pub fn contains(&self, priority: i64) -> bool {
        (self.floor..=self.top).contains(&priority)
    }
}

/// Pins entries whose organization contains `keyword` (case-insensitive)
/// to a fixed priority.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OverrideRule {
    pub kind: TileKind,
    pub keyword: String,
    pub priority: i64,
}

impl OverrideRule {
    fn matches(&self, kind: TileKind, affiliation: &str) -> bool {
        self.kind == kind && affiliation.to_lowercase().contains(&self.keyword.to_lowercase())
    }
}

/// Rank table for résumé tiles. Overrides are evaluated in order; the first
/// match wins, otherwise the kind's positional band applies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ResumeRanking {
    pub experience: PositionalBand,
    pub education: PositionalBand,
    pub overrides: Vec<OverrideRule>,
}

impl Default for ResumeRanking {
    fn default() -> Self {
        ResumeRanking {
            experience: PositionalBand { top: 90, floor: 60 },
            education: PositionalBand { top: 80, floor: 50 },
            overrides: Vec::new(),
        }
    }
}

impl ResumeRanking {
    fn band(&self, kind: TileKind) -> PositionalBand {
        match kind {
            TileKind::Education => self.education,
            TileKind::Experience | TileKind::Project => self.experience,
        }
    }

    /// Override priorities must stay outside every positional band. Both
    /// kinds are ranked in one collection, so an education override inside
    /// the experience band would tie with a positional experience entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (kind, band) in [
            (TileKind::Experience, self.experience),
            (TileKind::Education, self.education),
        ] {
            if band.top < band.floor {
                return Err(ConfigError::InvertedBand {
                    kind,
                    top: band.top,
                    floor: band.floor,
                });
            }
        }

        for rule in &self.overrides {
            if rule.kind == TileKind::Project {
                return Err(ConfigError::UnsupportedOverrideKind { kind: rule.kind });
            }
            if rule.keyword.trim().is_empty() {
                return Err(ConfigError::EmptyKeyword { kind: rule.kind });
            }
            for (band_kind, band) in [
                (TileKind::Experience, self.experience),
                (TileKind::Education, self.education),
            ] {
                if band.contains(rule.priority) {
                    return Err(ConfigError::OverlappingBand {
                        kind: rule.kind,
                        keyword: rule.keyword.clone(),
                        priority: rule.priority,
                        band: band_kind,
                        floor: band.floor,
                        top: band.top,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn priority(&self, kind: TileKind, position: usize, affiliation: &str) -> i64 {
        self.overrides
            .iter()
            .find(|rule| rule.matches(kind, affiliation))
            .map(|rule| rule.priority)
            .unwrap_or_else(|| self.band(kind).priority(position))
    }
}

/// Computes each tile's priority from its signals. Holds the run's "now" so
/// every tile in one run is scored against the same instant.
pub struct Scorer<'a> {
    now: DateTime<Utc>,
    ranking: &'a ResumeRanking,
}

impl<'a> Scorer<'a> {
    pub fn new(now: DateTime<Utc>, ranking: &'a ResumeRanking) -> Self {
        Scorer { now, ranking }
    }

    pub fn score(&self, signals: &Signals) -> i64 {
        match signals {
            Signals::Repo {
                stars,
                has_description,
                pushed_at,
            } => repo_priority(*stars, *has_description, pushed_at.as_deref(), self.now),
            Signals::Resume {
                kind,
                position,
                affiliation,
            } => self.ranking.priority(*kind, *position, affiliation),
        }
    }

    pub fn assign(&self, tiles: &mut [Tile]) {
        for tile in tiles.iter_mut() {
            tile.priority = self.score(&tile.signals);
        }
    }
}

/// Highest priority first. Stable, so ties keep normalization order.
pub fn sort_by_priority(tiles: &mut [Tile]) {
    tiles.sort_by(|a, b| b.priority.cmp(&a.priority));
}
