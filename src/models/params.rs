//! Request parameters for a single scrape.

use std::fmt;

use crate::error::{AppError, Result};
use crate::models::EndpointDescriptor;

/// Insertion-ordered parameter set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamBag(Vec<(String, String)>);

impl ParamBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter, replacing the value if the name is already set.
    pub fn insert(&mut self, name: impl Into<String>, value: impl ToString) {
        let name = name.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ParamBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{k}: {v:?}")?;
        }
        f.write_str("}")
    }
}

/// A resolved endpoint plus the parameters of one call.
#[derive(Debug, Clone)]
pub struct ScrapeRequest {
    pub endpoint: EndpointDescriptor,
    pub path_params: ParamBag,
    pub query_params: ParamBag,
}

impl ScrapeRequest {
    pub fn new(endpoint: EndpointDescriptor, path_params: ParamBag, query_params: ParamBag) -> Self {
        Self {
            endpoint,
            path_params,
            query_params,
        }
    }
}

/// Listing page size and number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    pub limit: u32,
    pub page: u32,
}

impl Paging {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 1000;
    pub const DEFAULT_LIMIT: u32 = 10;
    pub const DEFAULT_PAGE: u32 = 1;

    /// Validate caller-supplied bounds.
    pub fn new(limit: u32, page: u32) -> Result<Self> {
        for (name, value) in [("limit", limit), ("page", page)] {
            if !(Self::MIN..=Self::MAX).contains(&value) {
                return Err(AppError::validation(format!(
                    "{name} must be between {} and {}, got {value}",
                    Self::MIN,
                    Self::MAX
                )));
            }
        }
        Ok(Self { limit, page })
    }
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            limit: Self::DEFAULT_LIMIT,
            page: Self::DEFAULT_PAGE,
        }
    }
}

/// Request metadata carried into a listing extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingQuery {
    pub query: String,
    pub paging: Paging,
}

/// Identifiers of a drama season.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DramaIds {
    pub series_id: u64,
    pub season_id: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_bag_keeps_insertion_order() {
        let bag = ParamBag::new().with("q", "x").with("limit", 5).with("page", 1);
        let names: Vec<_> = bag.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["q", "limit", "page"]);
    }

    #[test]
    fn param_bag_insert_replaces_in_place() {
        let mut bag = ParamBag::new().with("limit", 5).with("page", 1);
        bag.insert("limit", 7);
        assert_eq!(bag.get("limit"), Some("7"));
        assert_eq!(bag.iter().next(), Some(("limit", "7")));
    }

    #[test]
    fn paging_bounds() {
        assert!(Paging::new(1, 1).is_ok());
        assert!(Paging::new(1000, 1000).is_ok());
        assert!(Paging::new(0, 1).is_err());
        assert!(Paging::new(10, 1001).is_err());
        assert_eq!(Paging::default(), Paging { limit: 10, page: 1 });
    }
}
