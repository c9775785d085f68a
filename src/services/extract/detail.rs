// src/services/extract/detail.rs

//! Drama detail page extraction.

use scraper::Html;
use url::Url;

use super::dom::LabelMatch;
use super::rules::{self, Adjacent, CastSelectors, FieldKey, FieldRule, RuleTable};
use crate::error::Result;
use crate::models::{DetailRecord, DramaIds};

const OTHER_INFO: &str = "h3.p-content-detail__other-info-title";
const PEOPLE: &str = "h3.p-content-detail__people-list-term";

const CAST: CastSelectors = CastSelectors {
    container: "div.p-people-list__casts",
    item: "h4.p-people-list__item",
    name: "div.c2-button-tertiary-s-multi-text__text",
    character: "div.c2-button-tertiary-s-multi-text__subtext",
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Title,
    OriginalTitle,
    Rating,
    MarkCount,
    ClipCount,
    Link,
    Poster,
    ProductionYearSeries,
    ProductionYear,
    ReleaseDate,
    CountryOfOrigin,
    PlaybackTime,
    Synopsis,
    Genre,
    Creator,
    Director,
    Scriptwriter,
    Artist,
    Cast,
}

impl FieldKey for DetailField {
    const ALL: &'static [Self] = &[
        DetailField::Title,
        DetailField::OriginalTitle,
        DetailField::Rating,
        DetailField::MarkCount,
        DetailField::ClipCount,
        DetailField::Link,
        DetailField::Poster,
        DetailField::ProductionYearSeries,
        DetailField::ProductionYear,
        DetailField::ReleaseDate,
        DetailField::CountryOfOrigin,
        DetailField::PlaybackTime,
        DetailField::Synopsis,
        DetailField::Genre,
        DetailField::Creator,
        DetailField::Director,
        DetailField::Scriptwriter,
        DetailField::Artist,
        DetailField::Cast,
    ];

    fn name(self) -> &'static str {
        match self {
            DetailField::Title => "title",
            DetailField::OriginalTitle => "original_title",
            DetailField::Rating => "rating",
            DetailField::MarkCount => "mark_count",
            DetailField::ClipCount => "clip_count",
            DetailField::Link => "link",
            DetailField::Poster => "poster",
            DetailField::ProductionYearSeries => "production_year_series",
            DetailField::ProductionYear => "production_year",
            DetailField::ReleaseDate => "release_date",
            DetailField::CountryOfOrigin => "country_of_origin",
            DetailField::PlaybackTime => "playback_time",
            DetailField::Synopsis => "synopsis",
            DetailField::Genre => "genre",
            DetailField::Creator => "creator",
            DetailField::Director => "director",
            DetailField::Scriptwriter => "scriptwriter",
            DetailField::Artist => "artist",
            DetailField::Cast => "cast",
        }
    }
}

pub(super) fn detail_rules(base: &Url) -> Result<RuleTable<DetailField>> {
    use DetailField::*;

    let year = LabelMatch::Prefix("製作年：");

    RuleTable::new(vec![
        FieldRule::required(Title, rules::text("h2.p-content-detail__title > span")?),
        FieldRule::optional(OriginalTitle, rules::text("p.p-content-detail__original")?),
        FieldRule::required(Rating, rules::rating("div.c2-rating-l__text")?),
        FieldRule::required(
            MarkCount,
            rules::count("mark_count", Some("div.c-content__counts > div.js-btn-mark"), "data-mark")?,
        ),
        FieldRule::required(
            ClipCount,
            rules::count("clip_count", Some("div.c-content__counts > div.js-btn-clip"), "data-clip")?,
        ),
        FieldRule::required(Link, rules::url_attr("link[rel=canonical]", "href", base)?),
        FieldRule::optional(Poster, rules::url_attr("div.c2-poster-l > img", "src", base)?),
        FieldRule::optional(ProductionYearSeries, rules::labeled_link(OTHER_INFO, year, base)?),
        FieldRule::optional(
            ProductionYear,
            rules::labeled_text(OTHER_INFO, year, Adjacent::Next("a"))?,
        ),
        FieldRule::optional(
            ReleaseDate,
            rules::labeled_text(OTHER_INFO, LabelMatch::Prefix("公開日："), Adjacent::Remainder)?,
        ),
        FieldRule::optional(
            CountryOfOrigin,
            rules::labeled_text(OTHER_INFO, LabelMatch::Prefix("製作国："), Adjacent::Next("a"))?,
        ),
        FieldRule::optional(
            PlaybackTime,
            rules::labeled_text(OTHER_INFO, LabelMatch::Prefix("再生時間："), Adjacent::Remainder)?,
        ),
        FieldRule::optional(
            Synopsis,
            rules::quoted_attr("#js-content-detail-synopsis", "content-detail-synopsis", ":outline")?,
        ),
        FieldRule::optional(
            Genre,
            rules::labeled_names("h3.p-content-detail__genre-title", LabelMatch::Prefix(""))?,
        ),
        FieldRule::optional(
            Creator,
            rules::labeled_people("creator", PEOPLE, LabelMatch::Exact("原作"), base)?,
        ),
        FieldRule::optional(
            Director,
            rules::labeled_people("director", PEOPLE, LabelMatch::Exact("監督"), base)?,
        ),
        FieldRule::optional(
            Scriptwriter,
            rules::labeled_people("scriptwriter", PEOPLE, LabelMatch::Exact("脚本"), base)?,
        ),
        FieldRule::optional(
            Artist,
            rules::labeled_people("artist", PEOPLE, LabelMatch::Exact("主題歌／挿入歌"), base)?,
        ),
        FieldRule::optional(Cast, rules::cast("cast", CAST, base)?),
    ])
}

/// Compiled detail page extractor.
#[derive(Debug)]
pub struct DetailExtractor {
    rules: RuleTable<DetailField>,
}

impl DetailExtractor {
    pub fn new(base: &Url) -> Result<Self> {
        Ok(Self {
            rules: detail_rules(base)?,
        })
    }

    /// Extract the detail record of a page already known to exist.
    pub fn extract(&self, document: &Html, ids: DramaIds) -> Result<DetailRecord> {
        let mut fields = self.rules.apply(document.root_element())?;
        let mark = fields.count(DetailField::MarkCount)?;
        let clip = fields.count(DetailField::ClipCount)?;

        for payload in [mark, clip] {
            if (payload.series_id, payload.season_id) != (ids.series_id, ids.season_id) {
                log::warn!(
                    "[Series ID: {}, Season ID: {}] page reports {}/{}, keeping requested ids",
                    ids.series_id,
                    ids.season_id,
                    payload.series_id,
                    payload.season_id
                );
                break;
            }
        }

        let record = DetailRecord {
            title: fields.text(DetailField::Title)?,
            original_title: fields.opt_text(DetailField::OriginalTitle)?,
            rating: fields.rating(DetailField::Rating)?,
            mark_count: mark.count,
            clip_count: clip.count,
            link: fields.text(DetailField::Link)?,
            poster: fields.opt_text(DetailField::Poster)?,
            production_year_series: fields.opt_text(DetailField::ProductionYearSeries)?,
            production_year: fields.opt_text(DetailField::ProductionYear)?,
            release_date: fields.opt_text(DetailField::ReleaseDate)?,
            country_of_origin: fields.opt_text(DetailField::CountryOfOrigin)?,
            playback_time: fields.opt_text(DetailField::PlaybackTime)?,
            synopsis: fields.opt_text(DetailField::Synopsis)?,
            genre: fields.names(DetailField::Genre)?,
            creator: fields.people(DetailField::Creator)?,
            director: fields.people(DetailField::Director)?,
            scriptwriter: fields.people(DetailField::Scriptwriter)?,
            artist: fields.people(DetailField::Artist)?,
            cast: fields.people(DetailField::Cast)?,
        };

        log::info!(
            "[Series ID: {}, Season ID: {}] {}",
            ids.series_id,
            ids.season_id,
            record.title
        );
        Ok(record)
    }
}
