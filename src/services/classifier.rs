// src/services/classifier.rs

//! Page classifier.
//!
//! Recognises error pages and empty result pages from their markup alone.

use scraper::{Html, Selector};

use crate::error::Result;
use crate::models::PageMarkers;
use crate::services::extract::parse_selector;

/// Compiled page markers.
#[derive(Debug)]
pub struct PageClassifier {
    not_found: Selector,
    not_found_text: String,
    zero_results: Selector,
}

impl PageClassifier {
    pub fn new(markers: &PageMarkers) -> Result<Self> {
        Ok(Self {
            not_found: parse_selector(&markers.not_found_selector)?,
            not_found_text: markers.not_found_text.trim().to_string(),
            zero_results: parse_selector(&markers.zero_results_selector)?,
        })
    }

    /// True when the status message element reads as "not found".
    pub fn is_resource_missing(&self, document: &Html) -> bool {
        document.select(&self.not_found).any(|el| {
            let text: String = el.text().collect();
            text.trim() == self.not_found_text
        })
    }

    /// True when the zero-results marker is present.
    pub fn is_result_set_empty(&self, document: &Html) -> bool {
        document.select(&self.zero_results).next().is_some()
    }
}

impl Default for PageClassifier {
    fn default() -> Self {
        Self::new(&PageMarkers::default()).expect("default markers are valid selectors")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_FOUND: &str = include_str!("../../fixtures/not_found.html");
    const EMPTY: &str = include_str!("../../fixtures/search_empty.html");
    const RESULTS: &str = include_str!("../../fixtures/search_results.html");

    #[test]
    fn detects_missing_resource() {
        let classifier = PageClassifier::default();
        assert!(classifier.is_resource_missing(&Html::parse_document(NOT_FOUND)));
        assert!(!classifier.is_resource_missing(&Html::parse_document(RESULTS)));
    }

    #[test]
    fn detects_empty_result_set() {
        let classifier = PageClassifier::default();
        assert!(classifier.is_result_set_empty(&Html::parse_document(EMPTY)));
        assert!(!classifier.is_result_set_empty(&Html::parse_document(RESULTS)));
    }

    #[test]
    fn other_error_text_is_not_a_missing_resource() {
        let classifier = PageClassifier::default();
        let html = Html::parse_document(
            r#"<div class="p-error"><h2 class="p-error__title">メンテナンス中です</h2></div>"#,
        );
        assert!(!classifier.is_resource_missing(&html));
    }

    #[test]
    fn invalid_marker_selector_is_rejected() {
        let markers = PageMarkers {
            zero_results_selector: "[[".to_string(),
            ..PageMarkers::default()
        };
        assert!(PageClassifier::new(&markers).is_err());
    }
}
