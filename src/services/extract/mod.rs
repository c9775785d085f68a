// src/services/extract/mod.rs

//! Page extraction.
//!
//! One [`Extractor`] serves both page kinds. It classifies the page first,
//! then applies the rule table of the requested kind.

mod detail;
mod dom;
mod rules;
mod search;

use std::sync::Arc;

use scraper::{Html, Selector};

pub use detail::{DetailExtractor, DetailField};
pub use rules::FieldKey;
pub use search::{SearchExtractor, SearchField};

use crate::error::{AppError, Result};
use crate::models::{DetailRecord, DramaIds, ListingQuery, ParamBag, SearchResultSet};
use crate::services::classifier::PageClassifier;
use crate::services::registry::EndpointRegistry;

/// Compile a CSS selector, mapping failures onto [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

/// A parsed page and the parameters that produced it.
#[derive(Debug)]
pub struct RawPage {
    pub document: Html,
    pub params: ParamBag,
}

impl RawPage {
    pub fn parse(markup: &str, params: ParamBag) -> Self {
        Self {
            document: Html::parse_document(markup),
            params,
        }
    }
}

/// What a page is expected to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageRequest {
    Search(ListingQuery),
    Detail(DramaIds),
}

/// Output of one extraction.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Search(SearchResultSet),
    Detail(DetailRecord),
}

impl Extracted {
    pub fn into_search(self) -> Result<SearchResultSet> {
        match self {
            Extracted::Search(set) => Ok(set),
            Extracted::Detail(_) => Err(AppError::malformed("results", "expected a listing page")),
        }
    }

    pub fn into_detail(self) -> Result<DetailRecord> {
        match self {
            Extracted::Detail(record) => Ok(record),
            Extracted::Search(_) => Err(AppError::malformed("data", "expected a detail page")),
        }
    }
}

/// Classifier plus the compiled rule tables of every page kind.
#[derive(Debug)]
pub struct Extractor {
    registry: Arc<EndpointRegistry>,
    classifier: PageClassifier,
    search: SearchExtractor,
    detail: DetailExtractor,
}

impl Extractor {
    pub fn new(registry: Arc<EndpointRegistry>, classifier: PageClassifier) -> Result<Self> {
        let base = registry.base().clone();
        Ok(Self {
            search: SearchExtractor::new(&base)?,
            detail: DetailExtractor::new(&base)?,
            registry,
            classifier,
        })
    }

    /// Classify and extract a page.
    ///
    /// Missing resources fail with [`AppError::NotFound`] on both page kinds.
    /// Listing pages showing the zero-results marker yield an empty set.
    pub fn extract(&self, page: &RawPage, request: &PageRequest) -> Result<Extracted> {
        if self.classifier.is_resource_missing(&page.document) {
            return Err(AppError::NotFound(page.params.to_string()));
        }

        match request {
            PageRequest::Search(query) => {
                if self.classifier.is_result_set_empty(&page.document) {
                    return Ok(Extracted::Search(search::empty_result(query)));
                }
                self.search
                    .extract(&page.document, query, &self.registry)
                    .map(Extracted::Search)
            }
            PageRequest::Detail(ids) => self
                .detail
                .extract(&page.document, *ids)
                .map(Extracted::Detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use url::Url;

    use super::*;
    use crate::error::ErrorKind;
    use crate::models::Paging;

    const NOT_FOUND: &str = include_str!("../../../fixtures/not_found.html");
    const EMPTY: &str = include_str!("../../../fixtures/search_empty.html");
    const RESULTS: &str = include_str!("../../../fixtures/search_results.html");

    fn extractor() -> Extractor {
        let registry =
            EndpointRegistry::with_defaults(Url::parse("https://filmarks.com/").unwrap()).unwrap();
        Extractor::new(Arc::new(registry), PageClassifier::default()).unwrap()
    }

    fn listing(q: &str) -> PageRequest {
        PageRequest::Search(ListingQuery {
            query: q.to_string(),
            paging: Paging::default(),
        })
    }

    #[test]
    fn invalid_selector_is_reported() {
        let err = parse_selector("div[").unwrap_err();
        assert!(matches!(err, AppError::Selector { ref selector, .. } if selector == "div["));
    }

    #[test]
    fn missing_page_is_not_found_for_both_kinds() {
        let page = RawPage::parse(NOT_FOUND, ParamBag::new().with("series_id", 0));
        let extractor = extractor();
        for request in [
            listing("x"),
            PageRequest::Detail(DramaIds {
                series_id: 0,
                season_id: 0,
            }),
        ] {
            let err = extractor.extract(&page, &request).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn empty_listing_is_success() {
        let page = RawPage::parse(EMPTY, ParamBag::new());
        let set = extractor()
            .extract(&page, &listing("\".*&^"))
            .unwrap()
            .into_search()
            .unwrap();
        assert!(set.records().is_empty());
        assert!(set.heading.is_none());
    }

    #[test]
    fn extraction_is_repeatable() {
        let page = RawPage::parse(RESULTS, ParamBag::new());
        let extractor = extractor();
        let first = extractor.extract(&page, &listing("あなたの番です")).unwrap();
        let second = extractor.extract(&page, &listing("あなたの番です")).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn wrong_variant_is_rejected() {
        let page = RawPage::parse(RESULTS, ParamBag::new());
        let extracted = extractor().extract(&page, &listing("x")).unwrap();
        assert!(extracted.into_detail().is_err());
    }
}
