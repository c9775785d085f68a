//! Drama records produced by the extractors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use url::Url;

use crate::error::{AppError, Result};
use crate::utils::url::trailing_id;

/// Site rating: a score, or the `"-"` placeholder for unrated entries.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rating {
    Unrated,
    Score(f64),
}

impl Rating {
    pub const UNRATED: &'static str = "-";
    pub const MAX: f64 = 5.0;

    /// Parse the rating text shown on a page.
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        if text == Self::UNRATED {
            return Ok(Rating::Unrated);
        }
        let score: f64 = text
            .parse()
            .map_err(|e| AppError::malformed("rating", format!("'{text}': {e}")))?;
        if !(0.0..=Self::MAX).contains(&score) {
            return Err(AppError::malformed(
                "rating",
                format!("{score} outside 0.0..=5.0"),
            ));
        }
        Ok(Rating::Score(score))
    }
}

impl Serialize for Rating {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Rating::Unrated => serializer.serialize_str(Self::UNRATED),
            Rating::Score(s) => serializer.serialize_f64(*s),
        }
    }
}

/// Engagement counter embedded as JSON in `data-mark` / `data-clip`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct CountPayload {
    #[serde(rename = "drama_series_id")]
    pub series_id: u64,
    #[serde(rename = "drama_season_id")]
    pub season_id: u64,
    pub count: u64,
}

impl CountPayload {
    /// Decode the attribute value of a count badge.
    pub fn decode(field: &'static str, raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| AppError::malformed(field, e))
    }
}

/// A cast or crew member.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character: Option<String>,
    pub people_id: u64,
    pub link: String,
}

impl PersonInfo {
    /// Build from a profile href, resolving it against `base`.
    ///
    /// Fails when the link does not end in a numeric id.
    pub fn from_profile(
        name: &str,
        href: &str,
        character: Option<&str>,
        base: &Url,
    ) -> Result<Self> {
        let link = base.join(href)?;
        let people_id = trailing_id(&link)
            .ok_or_else(|| AppError::malformed("people_id", format!("no id in '{link}'")))?;
        Ok(Self {
            name: name.trim().to_string(),
            character: character
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            people_id,
            link: link.to_string(),
        })
    }
}

/// One result card from a search or listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchRecord {
    pub title: String,
    pub rating: Rating,
    pub mark_count: u64,
    pub clip_count: u64,
    pub series_id: u64,
    pub season_id: u64,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    pub is_airing: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scriptwriter: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<String>>,
}

/// Records wrapper, serialised as `{"dramas": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct SearchResults {
    pub dramas: Vec<SearchRecord>,
}

/// Extracted listing page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResultSet {
    pub query: String,
    pub page: u32,
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    pub results: SearchResults,
}

impl SearchResultSet {
    pub fn records(&self) -> &[SearchRecord] {
        &self.results.dramas
    }
}

/// Listing page stamped with its capture time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub result: SearchResultSet,
    pub scrape_date: DateTime<Utc>,
}

/// Fields of a drama detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailRecord {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    pub rating: Rating,
    pub mark_count: u64,
    pub clip_count: u64,
    pub link: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_year_series: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub production_year: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_of_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub playback_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synopsis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<Vec<PersonInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub director: Option<Vec<PersonInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scriptwriter: Option<Vec<PersonInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artist: Option<Vec<PersonInfo>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cast: Option<Vec<PersonInfo>>,
}

/// Detail page stamped with its ids and capture time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailResponse {
    pub series_id: u64,
    pub season_id: u64,
    pub data: DetailRecord,
    pub scrape_date: DateTime<Utc>,
}
