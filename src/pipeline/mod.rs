//! Operation entry points.
//!
//! - `Scraper`: resolve, fetch, extract and assemble one page per call
//! - `assemble`: response stamping and error classification

pub mod assemble;
pub mod scrape;

pub use scrape::Scraper;
