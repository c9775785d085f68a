// src/pipeline/assemble.rs

//! Response assembly and error classification.

use chrono::Utc;

use crate::error::{AppError, ScrapeError};
use crate::models::{
    DetailRecord, DetailResponse, DramaIds, Operation, SearchResponse, SearchResultSet,
};

/// Stamp a listing result with the current time.
pub fn search_response(result: SearchResultSet) -> SearchResponse {
    SearchResponse {
        result,
        scrape_date: Utc::now(),
    }
}

/// Stamp a detail record with its requested ids and the current time.
pub fn detail_response(ids: DramaIds, data: DetailRecord) -> DetailResponse {
    DetailResponse {
        series_id: ids.series_id,
        season_id: ids.season_id,
        data,
        scrape_date: Utc::now(),
    }
}

/// Log an internal failure with its context and map it to the public outcome.
///
/// The internal message stays in the log; callers only see the fixed detail.
pub fn classify(operation: Operation, context: &str, err: AppError) -> ScrapeError {
    let kind = err.kind();
    log::error!("{operation} failed with {kind} [{context}]: {err}");
    ScrapeError::from(err)
}
