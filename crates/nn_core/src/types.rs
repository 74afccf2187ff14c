use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub name: &'static str,
    pub emoji: &'static str,
}

pub const NEPAL: Region = Region {
    name: "nepal",
    emoji: "🇳🇵",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
    pub homepage: &'static str,
}

/// The upstream sites the pipeline knows how to ingest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    #[serde(rename = "Ekantipur")]
    Ekantipur,
    #[serde(rename = "Onlinekhabar")]
    Onlinekhabar,
    #[serde(rename = "Nagarik News")]
    NagarikNews,
}

impl Source {
    pub const ALL: [Source; 3] = [Source::Ekantipur, Source::Onlinekhabar, Source::NagarikNews];

    pub fn metadata(&self) -> SourceMetadata {
        match self {
            Source::Ekantipur => SourceMetadata {
                name: "Ekantipur",
                emoji: "📰",
                region: NEPAL,
                homepage: "https://ekantipur.com/",
            },
            Source::Onlinekhabar => SourceMetadata {
                name: "Onlinekhabar",
                emoji: "🗞️",
                region: NEPAL,
                homepage: "https://www.onlinekhabar.com/",
            },
            Source::NagarikNews => SourceMetadata {
                name: "Nagarik News",
                emoji: "🏛️",
                region: NEPAL,
                homepage: "https://nagariknews.nagariknetwork.com/",
            },
        }
    }

    /// Display name, stored verbatim in `Article::source`.
    pub fn name(&self) -> &'static str {
        self.metadata().name
    }

    pub fn cli_name(&self) -> &'static str {
        match self {
            Source::Ekantipur => "ekantipur",
            Source::Onlinekhabar => "onlinekhabar",
            Source::NagarikNews => "nagarik",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Source {
    type Err = Error;

    /// Accepts `ekantipur`, `nepal/ekantipur` or the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        let needle = match needle.split_once('/') {
            Some((region, name)) if region == NEPAL.name => name.to_string(),
            Some(_) => return Err(Error::UnknownSource(s.to_string())),
            None => needle,
        };

        Source::ALL
            .into_iter()
            .find(|source| {
                source.cli_name() == needle || source.name().to_lowercase() == needle
            })
            .ok_or_else(|| Error::UnknownSource(s.to_string()))
    }
}

/// An article discovered on a homepage, not yet fetched in detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleCandidate {
    pub title: String,
    pub detail_url: String,
    pub summary: Option<String>,
}

/// Fields read from an article's own page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleDetail {
    pub author: Option<String>,
    /// Free-text timestamp as printed by the site.
    pub published_label: Option<String>,
    pub body_paragraphs: Vec<String>,
    pub image_url: Option<String>,
    pub lead: Option<String>,
}

impl ArticleDetail {
    /// Body paragraphs separated by a blank line.
    pub fn content(&self) -> String {
        self.body_paragraphs.join("\n\n")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub name: String,
    pub path: String,
}

/// An article assembled by the pipeline, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub created: String,
    pub source: Source,
    pub image: Option<ImageRef>,
}

impl NewArticle {
    pub fn assemble(
        source: Source,
        candidate: &ArticleCandidate,
        detail: &ArticleDetail,
        image: Option<ImageRef>,
    ) -> Self {
        let summary = candidate
            .summary
            .clone()
            .or_else(|| detail.lead.clone())
            .unwrap_or_default();

        Self {
            title: candidate.title.clone(),
            summary,
            content: detail.content(),
            author: detail.author.clone().unwrap_or_default(),
            created: detail.published_label.clone().unwrap_or_default(),
            source,
            image,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub author: String,
    pub created: String,
    pub created_at: DateTime<Utc>,
    pub source: Source,
    pub image: Option<ImageRef>,
}

impl Article {
    pub fn from_new(id: i64, article: NewArticle, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            title: article.title,
            summary: article.summary,
            content: article.content,
            author: article.author,
            created: article.created,
            created_at,
            source: article.source,
            image: article.image,
        }
    }
}

/// Counts reported when a source run finishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub source: Source,
    pub attempted: usize,
    pub persisted: usize,
    pub skipped: usize,
    pub duplicate: usize,
}

impl RunReport {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            attempted: 0,
            persisted: 0,
            skipped: 0,
            duplicate: 0,
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: attempted {}, persisted {}, skipped {}, duplicate {}",
            self.source.metadata().emoji,
            self.source,
            self.attempted,
            self.persisted,
            self.skipped,
            self.duplicate
        )
    }
}
