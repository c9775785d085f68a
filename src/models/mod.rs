// src/models/mod.rs

//! Domain models for the scraper.
//!
//! This module contains all data structures used throughout the crate,
//! organized by their primary purpose.

mod config;
mod drama;
mod endpoint;
mod params;
mod selectors;

// Re-export all public types
pub use config::{Config, LoggingConfig, ScraperConfig};
pub use drama::{
    CountPayload, DetailRecord, DetailResponse, PersonInfo, Rating, SearchRecord,
    SearchResponse, SearchResultSet, SearchResults,
};
pub use endpoint::{Binding, EndpointDescriptor, EndpointSpec, Operation};
pub use params::{DramaIds, ListingQuery, Paging, ParamBag, ScrapeRequest};
pub use selectors::PageMarkers;
