//! Form bodies for each endpoint.
//!
//! Field names, order and the always-empty placeholders mirror what the
//! upstream web client sends; the placeholders are kept as observed.

use std::fmt;

use crate::config::VehicleType;
use crate::model_year::ModelYear;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    ReferenceTable,
    Brands,
    Models,
    ModelYears,
    ModelsByYear,
    Valuation,
}

impl Endpoint {
    pub fn name(self) -> &'static str {
        match self {
            Endpoint::ReferenceTable => "ConsultarTabelaDeReferencia",
            Endpoint::Brands => "ConsultarMarcas",
            Endpoint::Models => "ConsultarModelos",
            Endpoint::ModelYears => "ConsultarAnoModelo",
            Endpoint::ModelsByYear => "ConsultarModelosAtravesDoAno",
            Endpoint::Valuation => "ConsultarValorComTodosParametros",
        }
    }

    /// Path under the API origin.
    pub fn path(self) -> String {
        format!("/api/veiculos/{}", self.name())
    }
}

/// One API call: endpoint plus ordered form fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub endpoint: Endpoint,
    fields: Vec<(&'static str, String)>,
}

impl Request {
    pub fn reference_table() -> Self {
        Request {
            endpoint: Endpoint::ReferenceTable,
            fields: Vec::new(),
        }
    }

    pub fn brands(vehicle: VehicleType, reference: u32) -> Self {
        Request {
            endpoint: Endpoint::Brands,
            fields: vec![
                ("codigoTabelaReferencia", reference.to_string()),
                ("codigoTipoVeiculo", vehicle.code().to_string()),
            ],
        }
    }

    pub fn models(vehicle: VehicleType, reference: u32, brand: u32) -> Self {
        Request {
            endpoint: Endpoint::Models,
            fields: listing_fields(vehicle, reference, brand, None, None),
        }
    }

    pub fn model_years(vehicle: VehicleType, reference: u32, brand: u32, model: u32) -> Self {
        Request {
            endpoint: Endpoint::ModelYears,
            fields: listing_fields(vehicle, reference, brand, Some(model), None),
        }
    }

    pub fn models_by_year(
        vehicle: VehicleType,
        reference: u32,
        brand: u32,
        year: &ModelYear,
    ) -> Self {
        Request {
            endpoint: Endpoint::ModelsByYear,
            fields: listing_fields(vehicle, reference, brand, None, Some(year)),
        }
    }

    pub fn valuation(
        vehicle: VehicleType,
        reference: u32,
        brand: u32,
        model: u32,
        year: &ModelYear,
    ) -> Self {
        Request {
            endpoint: Endpoint::Valuation,
            fields: vec![
                ("codigoTabelaReferencia", reference.to_string()),
                ("codigoMarca", brand.to_string()),
                ("codigoModelo", model.to_string()),
                ("codigoTipoVeiculo", vehicle.code().to_string()),
                ("anoModelo", year.year().to_string()),
                ("codigoTipoCombustivel", year.fuel_code().to_string()),
                ("tipoVeiculo", vehicle.label().to_string()),
                ("modeloCodigoExterno", String::new()),
                ("tipoConsulta", "tradicional".to_string()),
            ],
        }
    }

    /// Value of a form field, if the request carries it.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn body(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.fields {
            ser.append_pair(k, v);
        }
        ser.finish()
    }
}

/// Shared shape of the listing calls (`ConsultarModelos`, `ConsultarAnoModelo`,
/// `ConsultarModelosAtravesDoAno`).
fn listing_fields(
    vehicle: VehicleType,
    reference: u32,
    brand: u32,
    model: Option<u32>,
    year: Option<&ModelYear>,
) -> Vec<(&'static str, String)> {
    vec![
        ("codigoTipoVeiculo", vehicle.code().to_string()),
        ("codigoTabelaReferencia", reference.to_string()),
        ("codigoModelo", model.map(|m| m.to_string()).unwrap_or_default()),
        ("codigoMarca", brand.to_string()),
        ("ano", year.map(|y| y.to_string()).unwrap_or_default()),
        (
            "codigoTipoCombustivel",
            year.map(|y| y.fuel_code().to_string()).unwrap_or_default(),
        ),
        (
            "anoModelo",
            year.map(|y| y.year().to_string()).unwrap_or_default(),
        ),
        ("modeloCodigoExterno", String::new()),
    ]
}

/// `ConsultarMarcas(codigoTabelaReferencia=299, codigoTipoVeiculo=1)`; empty
/// placeholders are left out.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.endpoint.name())?;
        let mut first = true;
        for (k, v) in self.fields.iter().filter(|(_, v)| !v.is_empty()) {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{k}={v}")?;
            first = false;
        }
        write!(f, ")")
    }
}
