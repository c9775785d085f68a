// src/services/extract/search.rs

//! Search and listing page extraction.

use scraper::{Html, Selector};
use url::Url;

use super::dom::LabelMatch;
use super::parse_selector;
use super::rules::{self, Adjacent, FieldKey, FieldRule, RuleTable};
use crate::error::Result;
use crate::models::{ListingQuery, SearchRecord, SearchResultSet, SearchResults};
use crate::services::registry::EndpointRegistry;

const HEADING: &str = "h1.c-heading-1";
const CARDS: &str = "div.p-contents-grid div.js-cassette";
const OTHER_INFO: &str = "h4.p-content-cassette__other-info-title";
const GENRE: &str = "h4.p-content-cassette__genre-title";
const PEOPLE: &str = "h4.p-content-cassette__people-list-term";

/// Fields of a result card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Rating,
    MarkCount,
    ClipCount,
    Poster,
    ReleaseDate,
    IsAiring,
    CountryOfOrigin,
    PlaybackTime,
    Genre,
    Director,
    Scriptwriter,
    Cast,
}

impl FieldKey for SearchField {
    const ALL: &'static [Self] = &[
        SearchField::Title,
        SearchField::Rating,
        SearchField::MarkCount,
        SearchField::ClipCount,
        SearchField::Poster,
        SearchField::ReleaseDate,
        SearchField::IsAiring,
        SearchField::CountryOfOrigin,
        SearchField::PlaybackTime,
        SearchField::Genre,
        SearchField::Director,
        SearchField::Scriptwriter,
        SearchField::Cast,
    ];

    fn name(self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Rating => "rating",
            SearchField::MarkCount => "mark_count",
            SearchField::ClipCount => "clip_count",
            SearchField::Poster => "poster",
            SearchField::ReleaseDate => "release_date",
            SearchField::IsAiring => "is_airing",
            SearchField::CountryOfOrigin => "country_of_origin",
            SearchField::PlaybackTime => "playback_time",
            SearchField::Genre => "genre",
            SearchField::Director => "director",
            SearchField::Scriptwriter => "scriptwriter",
            SearchField::Cast => "cast",
        }
    }
}

/// Rules applied to each result card.
pub(super) fn card_rules(base: &Url) -> Result<RuleTable<SearchField>> {
    use SearchField::*;

    RuleTable::new(vec![
        FieldRule::required(Title, rules::text("h3.p-content-cassette__title")?),
        FieldRule::required(Rating, rules::rating("div.c-rating__score")?),
        FieldRule::required(MarkCount, rules::count("mark_count", None, "data-mark")?),
        FieldRule::required(ClipCount, rules::count("clip_count", None, "data-clip")?),
        FieldRule::optional(Poster, rules::url_attr("div.c2-poster-m img", "src", base)?),
        FieldRule::optional(
            ReleaseDate,
            rules::labeled_text(OTHER_INFO, LabelMatch::Exact("公開日："), Adjacent::Sibling("span"))?,
        ),
        FieldRule::optional(IsAiring, rules::flag(".p-content-cassette__on-air")?),
        FieldRule::optional(
            CountryOfOrigin,
            rules::labeled_text(OTHER_INFO, LabelMatch::Exact("製作国："), Adjacent::Next("a"))?,
        ),
        FieldRule::optional(
            PlaybackTime,
            rules::labeled_text(OTHER_INFO, LabelMatch::Exact("再生時間："), Adjacent::Sibling("span"))?,
        ),
        FieldRule::optional(Genre, rules::labeled_names(GENRE, LabelMatch::Prefix(""))?),
        FieldRule::optional(Director, rules::labeled_names(PEOPLE, LabelMatch::Exact("監督"))?),
        FieldRule::optional(Scriptwriter, rules::labeled_names(PEOPLE, LabelMatch::Exact("脚本"))?),
        FieldRule::optional(Cast, rules::labeled_names(PEOPLE, LabelMatch::Exact("出演者"))?),
    ])
}

/// Compiled listing page extractor.
#[derive(Debug)]
pub struct SearchExtractor {
    heading: Selector,
    cards: Selector,
    rules: RuleTable<SearchField>,
}

impl SearchExtractor {
    pub fn new(base: &Url) -> Result<Self> {
        Ok(Self {
            heading: parse_selector(HEADING)?,
            cards: parse_selector(CARDS)?,
            rules: card_rules(base)?,
        })
    }

    /// Extract at most `query.paging.limit` records from a listing page
    /// already known to be non-empty.
    pub fn extract(
        &self,
        document: &Html,
        query: &ListingQuery,
        registry: &EndpointRegistry,
    ) -> Result<SearchResultSet> {
        let limit = query.paging.limit as usize;
        let mut dramas = Vec::new();

        for (i, card) in document.select(&self.cards).take(limit).enumerate() {
            let mut fields = self.rules.apply(card)?;
            let clip = fields.count(SearchField::ClipCount)?;
            let mark = fields.count(SearchField::MarkCount)?;

            let record = SearchRecord {
                title: fields.text(SearchField::Title)?,
                rating: fields.rating(SearchField::Rating)?,
                mark_count: mark.count,
                clip_count: clip.count,
                series_id: clip.series_id,
                season_id: clip.season_id,
                link: registry.detail_link(clip.series_id, clip.season_id)?.to_string(),
                poster: fields.opt_text(SearchField::Poster)?,
                release_date: fields.opt_text(SearchField::ReleaseDate)?,
                is_airing: fields.flag(SearchField::IsAiring)?,
                country_of_origin: fields.opt_text(SearchField::CountryOfOrigin)?,
                playback_time: fields.opt_text(SearchField::PlaybackTime)?,
                genre: fields.names(SearchField::Genre)?,
                director: fields.names(SearchField::Director)?,
                scriptwriter: fields.names(SearchField::Scriptwriter)?,
                cast: fields.names(SearchField::Cast)?,
            };

            log::info!(
                "[{} | Query: {} | Page: {}] {} ({}/{})",
                i + 1,
                query.query,
                query.paging.page,
                record.title,
                record.series_id,
                record.season_id
            );
            dramas.push(record);
        }

        let heading = document
            .select(&self.heading)
            .next()
            .map(super::dom::text_of)
            .filter(|h| !h.is_empty());

        Ok(SearchResultSet {
            query: query.query.clone(),
            page: query.paging.page,
            limit: query.paging.limit,
            heading,
            results: SearchResults { dramas },
        })
    }
}

/// Result set for a page showing the zero-results marker.
pub fn empty_result(query: &ListingQuery) -> SearchResultSet {
    log::warn!(
        "[0 | Query: {} | Page: {}] no matching dramas",
        query.query,
        query.paging.page
    );
    SearchResultSet {
        query: query.query.clone(),
        page: query.paging.page,
        limit: query.paging.limit,
        heading: None,
        results: SearchResults::default(),
    }
}
