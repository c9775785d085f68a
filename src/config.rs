// src/config.rs

//! Configuration loading utilities.
//!
//! Convenience functions for loading configuration from disk and checking
//! that every table built from it is usable.

use std::path::Path;
use std::sync::Arc;

use url::Url;

use crate::error::Result;
use crate::models::Config;
use crate::services::{EndpointRegistry, Extractor, PageClassifier};

/// Load configuration from a TOML file.
///
/// A missing file yields the built-in defaults. A file that exists but does
/// not parse is an error.
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
        return Ok(Config::default());
    }
    let config = Config::load(path)?;
    log::info!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Validate a configuration end to end.
///
/// Builds the endpoint registry, the page classifier and the extraction rule
/// tables, so a config that passes here cannot fail at scrape time for
/// structural reasons.
pub fn validate_all(config: &Config) -> Result<EndpointRegistry> {
    config.validate()?;
    let base = Url::parse(&config.scraper.base_url)?;
    let registry = EndpointRegistry::from_specs_or_defaults(base, &config.endpoints)?;
    let classifier = PageClassifier::new(&config.markers)?;
    Extractor::new(Arc::new(registry.clone()), classifier)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::error::AppError;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config.scraper.base_url, "https://filmarks.com/");
    }

    #[test]
    fn broken_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[scraper\nbase_url = ").unwrap();
        assert!(matches!(load_config(file.path()), Err(AppError::Toml(_))));
    }

    #[test]
    fn defaults_validate() {
        let registry = validate_all(&Config::default()).unwrap();
        assert_eq!(registry.base().as_str(), "https://filmarks.com/");
    }

    #[test]
    fn bad_marker_fails_validation() {
        let mut config = Config::default();
        config.markers.not_found_selector = "div[".to_string();
        assert!(matches!(validate_all(&config), Err(AppError::Selector { .. })));
    }
}
