// src/services/registry.rs

//! Endpoint registry and URL builder.
//!
//! The registry is built and validated once, then shared read-only.

use std::collections::HashMap;

use url::Url;

use crate::error::{AppError, Result};
use crate::models::{Binding, EndpointDescriptor, EndpointSpec, Operation, ParamBag, ScrapeRequest};
use crate::utils::url::{placeholder_regex, placeholders};

/// Validated table of endpoints keyed by operation name.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    base: Url,
    endpoints: HashMap<String, EndpointDescriptor>,
}

impl EndpointRegistry {
    /// Build a registry, rejecting any malformed descriptor.
    pub fn new(base: Url, specs: &[EndpointSpec]) -> Result<Self> {
        if base.cannot_be_a_base() {
            return Err(AppError::config(format!("'{base}' cannot be a base URL")));
        }

        let mut endpoints = HashMap::with_capacity(specs.len());
        for spec in specs {
            let descriptor = Self::validate(spec)?;
            let name = descriptor.name.clone();
            if endpoints.insert(name.clone(), descriptor).is_some() {
                return Err(AppError::invalid_endpoint(&name, "duplicate name"));
            }
        }

        Ok(Self { base, endpoints })
    }

    /// Registry with the built-in endpoint for every operation.
    pub fn with_defaults(base: Url) -> Result<Self> {
        let specs: Vec<_> = Operation::ALL.iter().map(|op| op.default_spec()).collect();
        Self::new(base, &specs)
    }

    /// Registry from config, falling back to the built-in table when none is given.
    ///
    /// Every operation must resolve in the result.
    pub fn from_specs_or_defaults(base: Url, specs: &[EndpointSpec]) -> Result<Self> {
        let registry = if specs.is_empty() {
            Self::with_defaults(base)?
        } else {
            Self::new(base, specs)?
        };
        registry.ensure_operations()?;
        Ok(registry)
    }

    /// Fail unless every operation has an endpoint.
    pub fn ensure_operations(&self) -> Result<()> {
        for op in Operation::ALL {
            self.resolve(op.endpoint_name()).map_err(|_| {
                AppError::config(format!("no endpoint configured for '{op}'"))
            })?;
        }
        Ok(())
    }

    /// Look up an endpoint by name.
    pub fn resolve(&self, name: &str) -> Result<&EndpointDescriptor> {
        self.endpoints
            .get(name)
            .ok_or_else(|| AppError::UnknownEndpoint(name.to_string()))
    }

    /// Resolve an endpoint and pair it with call parameters.
    pub fn request(
        &self,
        name: &str,
        path_params: ParamBag,
        query_params: ParamBag,
    ) -> Result<ScrapeRequest> {
        let endpoint = self.resolve(name)?.clone();
        Ok(ScrapeRequest::new(endpoint, path_params, query_params))
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// Absolute link of a drama detail page.
    pub fn detail_link(&self, series_id: u64, season_id: u64) -> Result<Url> {
        let request = self.request(
            Operation::DramaDetail.endpoint_name(),
            ParamBag::new()
                .with("series_id", series_id)
                .with("season_id", season_id),
            ParamBag::new(),
        )?;
        self.build_url(&request)
    }

    /// Produce the absolute URL for a request.
    pub fn build_url(&self, request: &ScrapeRequest) -> Result<Url> {
        build_url(
            &self.base,
            &request.endpoint,
            &request.path_params,
            &request.query_params,
        )
    }

    fn validate(spec: &EndpointSpec) -> Result<EndpointDescriptor> {
        let name = spec.name.trim();
        if name.is_empty() {
            return Err(AppError::invalid_endpoint(&spec.name, "empty name"));
        }
        let path = spec.path.trim();
        if path.is_empty() {
            return Err(AppError::invalid_endpoint(name, "empty path template"));
        }
        if path.starts_with('/') {
            return Err(AppError::invalid_endpoint(
                name,
                "path template must be relative to the base",
            ));
        }
        if path.contains(['?', '#']) {
            return Err(AppError::invalid_endpoint(
                name,
                "path template must not carry a query or fragment",
            ));
        }

        // Anything brace-like left after removing well-formed placeholders is malformed.
        let stripped = placeholder_regex().replace_all(path, "");
        if stripped.contains(['{', '}']) {
            return Err(AppError::invalid_endpoint(
                name,
                format!("malformed placeholder in '{path}'"),
            ));
        }

        let placeholders = placeholders(path);
        match (spec.binding, placeholders.is_empty()) {
            (Binding::Query, false) => {
                return Err(AppError::invalid_endpoint(
                    name,
                    "query binding cannot have path placeholders",
                ));
            }
            (Binding::Path | Binding::PathAndQuery, true) => {
                return Err(AppError::invalid_endpoint(
                    name,
                    "path binding requires at least one placeholder",
                ));
            }
            _ => {}
        }

        Ok(EndpointDescriptor {
            name: name.to_string(),
            path_template: path.to_string(),
            placeholders,
            binding: spec.binding,
        })
    }
}

/// Build an absolute URL from a descriptor and parameter sets.
///
/// Path parameters not named by a placeholder are ignored; query parameters
/// are appended in insertion order for query-bound endpoints only.
pub fn build_url(
    base: &Url,
    descriptor: &EndpointDescriptor,
    path_params: &ParamBag,
    query_params: &ParamBag,
) -> Result<Url> {
    let path = match descriptor.binding {
        Binding::Query => descriptor.path_template.clone(),
        Binding::Path | Binding::PathAndQuery => substitute(descriptor, path_params)?,
    };

    let mut url = base.join(&path)?;
    if matches!(descriptor.binding, Binding::Query | Binding::PathAndQuery)
        && !query_params.is_empty()
    {
        url.query_pairs_mut().extend_pairs(query_params.iter());
    }
    Ok(url)
}

fn substitute(descriptor: &EndpointDescriptor, params: &ParamBag) -> Result<String> {
    let mut path = descriptor.path_template.clone();
    for name in &descriptor.placeholders {
        let value = params.get(name).ok_or_else(|| AppError::MissingPathParam {
            template: descriptor.path_template.clone(),
            param: name.clone(),
        })?;
        if value.is_empty() || value.contains(['/', '?', '#']) {
            return Err(AppError::InvalidPathParam {
                param: name.clone(),
                value: value.to_string(),
            });
        }
        path = path.replace(&format!("{{{name}}}"), value);
    }
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn base() -> Url {
        Url::parse("https://filmarks.com/").unwrap()
    }

    fn registry() -> EndpointRegistry {
        EndpointRegistry::with_defaults(base()).unwrap()
    }

    #[test]
    fn resolves_every_operation() {
        let registry = registry();
        for op in Operation::ALL {
            let descriptor = registry.resolve(op.endpoint_name()).unwrap();
            assert!(!descriptor.path_template().is_empty());
        }
    }

    #[test]
    fn unknown_endpoint_is_not_found() {
        let err = registry().resolve("does-not-exist").unwrap_err();
        assert!(matches!(err, AppError::UnknownEndpoint(_)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn query_binding_keeps_insertion_order() {
        let registry = registry();
        let request = registry
            .request(
                "search_dramas",
                ParamBag::new(),
                ParamBag::new().with("q", "あなたの番です").with("limit", 5).with("page", 1),
            )
            .unwrap();
        let url = registry.build_url(&request).unwrap();
        assert_eq!(url.path(), "/search/dramas");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("q".to_string(), "あなたの番です".to_string()),
                ("limit".to_string(), "5".to_string()),
                ("page".to_string(), "1".to_string()),
            ]
        );
    }

    #[test]
    fn query_values_are_encoded() {
        let registry = registry();
        let request = registry
            .request("search_dramas", ParamBag::new(), ParamBag::new().with("q", "\".*&^"))
            .unwrap();
        let url = registry.build_url(&request).unwrap();
        assert_eq!(url.query_pairs().count(), 1);
        assert_eq!(url.query_pairs().next().unwrap().1, "\".*&^");
    }

    #[test]
    fn path_binding_substitutes_placeholders() {
        let registry = registry();
        let request = registry
            .request(
                "drama_detail",
                ParamBag::new().with("series_id", 11358).with("season_id", 15763),
                ParamBag::new(),
            )
            .unwrap();
        let url = registry.build_url(&request).unwrap();
        assert_eq!(url.as_str(), "https://filmarks.com/dramas/11358/15763");
    }

    #[test]
    fn detail_link_uses_detail_endpoint() {
        assert_eq!(
            registry().detail_link(6055, 8586).unwrap().as_str(),
            "https://filmarks.com/dramas/6055/8586"
        );
    }

    #[test]
    fn path_binding_ignores_query_params() {
        let registry = registry();
        let request = registry
            .request(
                "drama_detail",
                ParamBag::new().with("series_id", 1).with("season_id", 2),
                ParamBag::new().with("limit", 5),
            )
            .unwrap();
        assert_eq!(registry.build_url(&request).unwrap().query(), None);
    }

    #[test]
    fn missing_path_param_fails() {
        let registry = registry();
        let request = registry
            .request(
                "drama_detail",
                ParamBag::new().with("series_id", 11358),
                ParamBag::new(),
            )
            .unwrap();
        let err = registry.build_url(&request).unwrap_err();
        assert!(matches!(err, AppError::MissingPathParam { ref param, .. } if param == "season_id"));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn path_param_cannot_escape_segment() {
        let registry = registry();
        let request = registry
            .request(
                "country_dramas",
                ParamBag::new().with("country_id", "../admin"),
                ParamBag::new(),
            )
            .unwrap();
        assert!(matches!(
            registry.build_url(&request),
            Err(AppError::InvalidPathParam { .. })
        ));
    }

    #[test]
    fn path_and_query_round_trip() {
        let registry = registry();
        let request = registry
            .request(
                "country_dramas",
                ParamBag::new().with("country_id", 144).with("unused", "x"),
                ParamBag::new().with("limit", 5),
            )
            .unwrap();
        let url = registry.build_url(&request).unwrap();
        assert_eq!(url.path(), "/list-drama/country/144");
        assert_eq!(url.query(), Some("limit=5"));

        let reparsed = Url::parse(url.as_str()).unwrap();
        assert_eq!(reparsed.path(), "/list-drama/country/144");
        let pairs: Vec<(String, String)> = reparsed.query_pairs().into_owned().collect();
        assert_eq!(pairs, [("limit".to_string(), "5".to_string())]);
    }

    #[test]
    fn year_listing_uses_decade() {
        let registry = registry();
        let request = registry
            .request(
                "year_dramas",
                ParamBag::new().with("year", 2007).with("decade", "2000s"),
                ParamBag::new().with("limit", 1).with("page", 1),
            )
            .unwrap();
        assert_eq!(
            registry.build_url(&request).unwrap().as_str(),
            "https://filmarks.com/list-drama/year/2000s/2007?limit=1&page=1"
        );
    }

    #[test]
    fn rejects_malformed_descriptors() {
        let bad = [
            EndpointSpec::new("", "search/dramas", Binding::Query),
            EndpointSpec::new("a", "", Binding::Query),
            EndpointSpec::new("a", "/search", Binding::Query),
            EndpointSpec::new("a", "search?q=1", Binding::Query),
            EndpointSpec::new("a", "dramas/{id", Binding::Path),
            EndpointSpec::new("a", "dramas/{}", Binding::Path),
            EndpointSpec::new("a", "dramas/{id}", Binding::Query),
            EndpointSpec::new("a", "dramas", Binding::Path),
            EndpointSpec::new("a", "dramas", Binding::PathAndQuery),
        ];
        for spec in bad {
            let result = EndpointRegistry::new(base(), &[spec.clone()]);
            assert!(
                matches!(result, Err(AppError::InvalidEndpoint { .. })),
                "accepted {spec:?}"
            );
        }
    }

    #[test]
    fn rejects_duplicate_names() {
        let spec = EndpointSpec::new("a", "x", Binding::Query);
        assert!(EndpointRegistry::new(base(), &[spec.clone(), spec]).is_err());
    }

    #[test]
    fn names_are_trimmed_before_lookup() {
        let specs = [EndpointSpec::new(" search_dramas ", "search/dramas", Binding::Query)];
        let registry = EndpointRegistry::new(base(), &specs).unwrap();
        assert!(registry.resolve("search_dramas").is_ok());

        let padded = EndpointSpec::new("a ", "x", Binding::Query);
        let plain = EndpointSpec::new("a", "y", Binding::Query);
        assert!(EndpointRegistry::new(base(), &[padded, plain]).is_err());
    }

    #[test]
    fn config_table_must_cover_operations() {
        let specs = [EndpointSpec::new("search_dramas", "search/dramas", Binding::Query)];
        assert!(matches!(
            EndpointRegistry::from_specs_or_defaults(base(), &specs),
            Err(AppError::Config(_))
        ));
        assert!(EndpointRegistry::from_specs_or_defaults(base(), &[]).is_ok());
    }
}
