// src/models/selectors.rs

//! CSS markers used to classify fetched pages.

use serde::{Deserialize, Serialize};

/// Markers identifying "not found" and "zero results" pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMarkers {
    /// Selector for the status message element of an error page
    #[serde(default = "default_not_found_selector")]
    pub not_found_selector: String,

    /// Trimmed text of that element when the resource is missing
    #[serde(default = "default_not_found_text")]
    pub not_found_text: String,

    /// Selector present only on listing pages without results
    #[serde(default = "default_zero_results_selector")]
    pub zero_results_selector: String,
}

fn default_not_found_selector() -> String {
    "div.p-error > h2.p-error__title".to_string()
}

fn default_not_found_text() -> String {
    "お探しのページは見つかりませんでした。".to_string()
}

fn default_zero_results_selector() -> String {
    "div.p-timeline__zero".to_string()
}

impl Default for PageMarkers {
    fn default() -> Self {
        Self {
            not_found_selector: default_not_found_selector(),
            not_found_text: default_not_found_text(),
            zero_results_selector: default_zero_results_selector(),
        }
    }
}
