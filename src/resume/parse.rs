use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{info, warn};

use crate::tile::{EntryMeta, TileKind};

/// Class names that demarcate one résumé section and its entries.
struct EntrySelectors {
    label: &'static str,
    section: Selector,
    article: Selector,
    header: Selector,
    name: Selector,
    location: Selector,
    title: Selector,
    dates: Selector,
    gpa: Option<Selector>,
}

impl EntrySelectors {
    fn new(section: &'static str, entry: &'static str, with_gpa: bool) -> Self {
        let sel = |css: String| Selector::parse(&css).unwrap();
        EntrySelectors {
            label: section,
            section: sel(format!("section.{section}")),
            article: sel(format!("article.{entry}")),
            header: sel(format!("header.{entry}-header")),
            name: sel("h3".to_string()),
            location: sel(format!("div.{entry}-location")),
            title: sel(format!("div.{entry}-title")),
            dates: sel(format!("div.{entry}-dates")),
            gpa: with_gpa.then(|| sel("div.gpa".to_string())),
        }
    }
}

static EXPERIENCE: LazyLock<EntrySelectors> =
    LazyLock::new(|| EntrySelectors::new("experience", "job", false));
static EDUCATION: LazyLock<EntrySelectors> =
    LazyLock::new(|| EntrySelectors::new("education", "degree", true));

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("document is empty")]
    Empty,
    #[error("document contains no markup")]
    NotMarkup,
}

/// One scraped job or degree, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResumeEntry {
    pub meta: EntryMeta,
    /// Outer markup of every element after the entry header.
    pub description_html: String,
}

impl ResumeEntry {
    pub fn kind(&self) -> TileKind {
        self.meta.kind()
    }
}

#[derive(Debug, Default)]
pub struct ParsedResume {
    pub experience: Vec<ResumeEntry>,
    pub education: Vec<ResumeEntry>,
}

impl ParsedResume {
    pub fn is_empty(&self) -> bool {
        self.experience.is_empty() && self.education.is_empty()
    }
}

/// Extract the experience and education sections. A missing section is a
/// warning and yields no entries; articles without a header are skipped.
pub fn parse(html: &str) -> Result<ParsedResume, ParseError> {
    if html.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    if !html.contains('<') {
        return Err(ParseError::NotMarkup);
    }

    let document = Html::parse_document(html);

    let experience = extract_entries(&document, &EXPERIENCE, |header, s| EntryMeta::Job {
        company: field(header, &s.name),
        location: field(header, &s.location),
        title: field(header, &s.title),
        dates: field(header, &s.dates),
    });

    let education = extract_entries(&document, &EDUCATION, |header, s| EntryMeta::Degree {
        school: field(header, &s.name),
        location: field(header, &s.location),
        degree: field(header, &s.title),
        dates: field(header, &s.dates),
        gpa: s
            .gpa
            .as_ref()
            .map(|sel| field(header, sel))
            .filter(|g| !g.is_empty()),
    });

    Ok(ParsedResume {
        experience,
        education,
    })
}

fn extract_entries<F>(document: &Html, selectors: &EntrySelectors, build: F) -> Vec<ResumeEntry>
where
    F: Fn(ElementRef<'_>, &EntrySelectors) -> EntryMeta,
{
    let Some(section) = document.select(&selectors.section).next() else {
        warn!("No {} section found", selectors.label);
        return Vec::new();
    };

    let articles: Vec<ElementRef<'_>> = section.select(&selectors.article).collect();
    info!("Found {} {} entries", articles.len(), selectors.label);

    articles
        .into_iter()
        .filter_map(|article| {
            let header = article.select(&selectors.header).next()?;
            let meta = build(header, selectors);
            info!("  {} - {}", meta.organization(), meta.headline());
            Some(ResumeEntry {
                meta,
                description_html: body_markup(article),
            })
        })
        .collect()
}

/// Whitespace-normalized text of the first match, or empty.
fn field(scope: ElementRef<'_>, selector: &Selector) -> String {
    scope
        .select(selector)
        .next()
        .map(|el| {
            let text: String = el.text().collect();
            text.split_whitespace().collect::<Vec<_>>().join(" ")
        })
        .unwrap_or_default()
}

fn body_markup(article: ElementRef<'_>) -> String {
    article
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|el| el.value().name() != "header")
        .map(|el| el.html())
        .collect::<String>()
        .trim()
        .to_string()
}
