//! Service layer for the scraper.
//!
//! This module contains:
//! - Endpoint lookup and URL building (`EndpointRegistry`)
//! - Page fetching (`PageFetcher`, `HttpFetcher`)
//! - Page classification (`PageClassifier`)
//! - Field extraction (`Extractor`)

pub mod classifier;
pub mod extract;
pub mod fetcher;
pub mod registry;

pub use classifier::PageClassifier;
pub use extract::{Extracted, Extractor, PageRequest, RawPage};
pub use fetcher::{HttpFetcher, PageFetcher};
pub use registry::EndpointRegistry;
