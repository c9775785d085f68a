// src/pipeline/scrape.rs

//! Scrape operations.
//!
//! Each call resolves an endpoint, fetches one page, extracts it and stamps
//! the response. Calls share only read-only state.

use std::sync::Arc;

use url::Url;

use super::assemble::{classify, detail_response, search_response};
use crate::error::{Result, ScrapeError};
use crate::models::{
    Config, DetailResponse, DramaIds, ListingQuery, Operation, Paging, ParamBag, SearchResponse,
};
use crate::services::{
    EndpointRegistry, Extracted, Extractor, HttpFetcher, PageClassifier, PageFetcher, PageRequest,
    RawPage,
};
use crate::utils::url::decade_segment;

/// Entry point for every drama operation.
pub struct Scraper<F = HttpFetcher> {
    registry: Arc<EndpointRegistry>,
    extractor: Extractor,
    fetcher: F,
}

impl Scraper<HttpFetcher> {
    /// Build a scraper with the HTTP transport described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = HttpFetcher::new(&config.scraper)?;
        Self::with_fetcher(config, fetcher)
    }
}

impl<F: PageFetcher> Scraper<F> {
    /// Build a scraper around any transport.
    pub fn with_fetcher(config: &Config, fetcher: F) -> Result<Self> {
        config.validate()?;
        let base = Url::parse(&config.scraper.base_url)?;
        let registry = Arc::new(EndpointRegistry::from_specs_or_defaults(
            base,
            &config.endpoints,
        )?);
        let classifier = PageClassifier::new(&config.markers)?;
        let extractor = Extractor::new(Arc::clone(&registry), classifier)?;

        Ok(Self {
            registry,
            extractor,
            fetcher,
        })
    }

    /// Search dramas by free text.
    pub async fn search_dramas(
        &self,
        query: &str,
        paging: Paging,
    ) -> std::result::Result<SearchResponse, ScrapeError> {
        let query_params = ParamBag::new()
            .with("q", query)
            .with("limit", paging.limit)
            .with("page", paging.page);
        self.listing(Operation::SearchDramas, query, ParamBag::new(), query_params, paging)
            .await
    }

    /// Fetch the detail page of one drama season.
    pub async fn drama_detail(
        &self,
        series_id: u64,
        season_id: u64,
    ) -> std::result::Result<DetailResponse, ScrapeError> {
        let operation = Operation::DramaDetail;
        let ids = DramaIds {
            series_id,
            season_id,
        };
        let path_params = ParamBag::new()
            .with("series_id", series_id)
            .with("season_id", season_id);
        let context = path_params.to_string();

        self.run(operation, path_params, ParamBag::new(), PageRequest::Detail(ids))
            .await
            .and_then(Extracted::into_detail)
            .map(|record| detail_response(ids, record))
            .map_err(|e| classify(operation, &context, e))
    }

    /// Currently trending dramas.
    pub async fn trending_dramas(
        &self,
        paging: Paging,
    ) -> std::result::Result<SearchResponse, ScrapeError> {
        self.listing(
            Operation::TrendDramas,
            "",
            ParamBag::new(),
            paging_params(paging),
            paging,
        )
        .await
    }

    /// Dramas produced in one country.
    pub async fn dramas_by_country(
        &self,
        country_id: u64,
        paging: Paging,
    ) -> std::result::Result<SearchResponse, ScrapeError> {
        self.listing(
            Operation::CountryDramas,
            "",
            ParamBag::new().with("country_id", country_id),
            paging_params(paging),
            paging,
        )
        .await
    }

    /// Dramas produced in one year.
    pub async fn dramas_by_year(
        &self,
        year: u32,
        paging: Paging,
    ) -> std::result::Result<SearchResponse, ScrapeError> {
        self.listing(
            Operation::YearDramas,
            "",
            ParamBag::new()
                .with("year", year)
                .with("decade", decade_segment(year)),
            paging_params(paging),
            paging,
        )
        .await
    }

    async fn listing(
        &self,
        operation: Operation,
        query: &str,
        path_params: ParamBag,
        query_params: ParamBag,
        paging: Paging,
    ) -> std::result::Result<SearchResponse, ScrapeError> {
        let context = format!("path={path_params} query={query_params}");
        let request = PageRequest::Search(ListingQuery {
            query: query.to_string(),
            paging,
        });

        self.run(operation, path_params, query_params, request)
            .await
            .and_then(Extracted::into_search)
            .map(search_response)
            .map_err(|e| classify(operation, &context, e))
    }

    async fn run(
        &self,
        operation: Operation,
        path_params: ParamBag,
        query_params: ParamBag,
        request: PageRequest,
    ) -> Result<Extracted> {
        let scrape = self
            .registry
            .request(operation.endpoint_name(), path_params, query_params)?;
        let url = self.registry.build_url(&scrape)?;
        log::debug!("{operation}: {url}");

        let markup = self.fetcher.fetch(&url).await?;

        // Parsed documents are not Send; nothing below may await.
        let params = scrape.path_params.clone();
        let page = RawPage::parse(&markup, params);
        self.extractor.extract(&page, &request)
    }
}

fn paging_params(paging: Paging) -> ParamBag {
    ParamBag::new()
        .with("limit", paging.limit)
        .with("page", paging.page)
}
