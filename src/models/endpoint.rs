//! Endpoint descriptors and the logical operations they serve.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How request parameters map onto a URL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    /// Literal template plus an encoded query string
    Query,
    /// `{name}` placeholders substituted from path parameters
    Path,
    /// Placeholders first, then the query string
    PathAndQuery,
}

/// Endpoint entry as written in configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointSpec {
    /// Logical operation name
    pub name: String,

    /// Path template relative to the base origin
    pub path: String,

    /// Parameter binding mode
    pub binding: Binding,
}

impl EndpointSpec {
    pub fn new(name: &str, path: &str, binding: Binding) -> Self {
        Self {
            name: name.to_string(),
            path: path.to_string(),
            binding,
        }
    }
}

/// A validated endpoint.
///
/// Only the registry constructs these, after the template has been checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub(crate) name: String,
    pub(crate) path_template: String,
    pub(crate) placeholders: Vec<String>,
    pub(crate) binding: Binding,
}

impl EndpointDescriptor {
    pub fn path_template(&self) -> &str {
        &self.path_template
    }
}

/// Logical operations exposed to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    SearchDramas,
    DramaDetail,
    TrendDramas,
    CountryDramas,
    YearDramas,
}

impl Operation {
    pub const ALL: [Operation; 5] = [
        Operation::SearchDramas,
        Operation::DramaDetail,
        Operation::TrendDramas,
        Operation::CountryDramas,
        Operation::YearDramas,
    ];

    /// Registry key for this operation.
    pub fn endpoint_name(self) -> &'static str {
        match self {
            Operation::SearchDramas => "search_dramas",
            Operation::DramaDetail => "drama_detail",
            Operation::TrendDramas => "trend_dramas",
            Operation::CountryDramas => "country_dramas",
            Operation::YearDramas => "year_dramas",
        }
    }

    /// Built-in endpoint for this operation.
    pub fn default_spec(self) -> EndpointSpec {
        let name = self.endpoint_name();
        match self {
            Operation::SearchDramas => EndpointSpec::new(name, "search/dramas", Binding::Query),
            Operation::DramaDetail => {
                EndpointSpec::new(name, "dramas/{series_id}/{season_id}", Binding::Path)
            }
            Operation::TrendDramas => EndpointSpec::new(name, "list-drama/trend", Binding::Query),
            Operation::CountryDramas => EndpointSpec::new(
                name,
                "list-drama/country/{country_id}",
                Binding::PathAndQuery,
            ),
            Operation::YearDramas => EndpointSpec::new(
                name,
                "list-drama/year/{decade}/{year}",
                Binding::PathAndQuery,
            ),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint_name())
    }
}
