//! FIPE price-table API client.
//!
//! Six operations, one per hierarchy level plus the models-by-year lookup and
//! the leaf valuation. Each is a single POST, awaited to completion. On any
//! failure the operation returns `None` and hands a [`Failure`] naming the
//! call and its parameters to the caller's [`Reporter`]; nothing is retried.

mod request;
mod transport;
mod types;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::{FipeConfig, VehicleType};
use crate::model_year::ModelYear;
use crate::report::{Failure, Reporter};

pub use request::{Endpoint, Request};
pub use transport::{browser_headers, CurlTransport, Transport};
pub use types::{Brand, Model, ModelsPage, ReferencePeriod, Valuation, YearOption};

/// Why a single API call produced no result.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("transport: {0}")]
    Transport(#[from] curl::Error),
    #[error("HTTP {0}")]
    Http(u32),
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("upstream error: {0}")]
    Upstream(String),
}

pub struct FipeClient<T = CurlTransport> {
    transport: T,
    base_url: String,
    vehicle: VehicleType,
}

impl FipeClient<CurlTransport> {
    /// Client over libcurl with the configured origin, vehicle type and headers.
    pub fn from_config(cfg: &FipeConfig) -> anyhow::Result<Self> {
        let transport = CurlTransport::new(browser_headers(cfg))?;
        Ok(FipeClient::with_transport(transport, cfg))
    }
}

impl<T: Transport> FipeClient<T> {
    pub fn with_transport(transport: T, cfg: &FipeConfig) -> Self {
        FipeClient {
            transport,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            vehicle: cfg.vehicle_type,
        }
    }

    pub fn vehicle(&self) -> VehicleType {
        self.vehicle
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    pub fn reference_periods(
        &mut self,
        reporter: &mut dyn Reporter,
    ) -> Option<Vec<ReferencePeriod>> {
        self.call(Request::reference_table(), reporter)
    }

    pub fn brands(&mut self, reference: u32, reporter: &mut dyn Reporter) -> Option<Vec<Brand>> {
        self.call(Request::brands(self.vehicle, reference), reporter)
    }

    pub fn models(
        &mut self,
        reference: u32,
        brand: u32,
        reporter: &mut dyn Reporter,
    ) -> Option<ModelsPage> {
        self.call(Request::models(self.vehicle, reference, brand), reporter)
    }

    pub fn model_years(
        &mut self,
        reference: u32,
        brand: u32,
        model: u32,
        reporter: &mut dyn Reporter,
    ) -> Option<Vec<YearOption>> {
        self.call(
            Request::model_years(self.vehicle, reference, brand, model),
            reporter,
        )
    }

    /// Models of `brand` that have a valuation for `year`.
    pub fn models_by_year(
        &mut self,
        reference: u32,
        brand: u32,
        year: &ModelYear,
        reporter: &mut dyn Reporter,
    ) -> Option<Vec<Model>> {
        self.call(
            Request::models_by_year(self.vehicle, reference, brand, year),
            reporter,
        )
    }

    pub fn valuation(
        &mut self,
        reference: u32,
        brand: u32,
        model: u32,
        year: &ModelYear,
        reporter: &mut dyn Reporter,
    ) -> Option<Valuation> {
        self.call(
            Request::valuation(self.vehicle, reference, brand, model, year),
            reporter,
        )
    }

    fn call<R: DeserializeOwned>(
        &mut self,
        request: Request,
        reporter: &mut dyn Reporter,
    ) -> Option<R> {
        match self.fetch(&request) {
            Ok(r) => Some(r),
            Err(source) => {
                reporter.report(&Failure::Api { request, source });
                None
            }
        }
    }

    fn fetch<R: DeserializeOwned>(&mut self, request: &Request) -> Result<R, ApiError> {
        let url = format!("{}{}", self.base_url, request.endpoint.path());
        tracing::debug!("{}", request);
        let body = self.transport.post_form(&url, &request.body())?;
        types::decode(&body)
    }
}
