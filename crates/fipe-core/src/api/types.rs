//! Typed response shapes, one per API operation.
//!
//! Field presence is checked here: a 2xx body missing a required field is a
//! decode failure, not a silently empty value.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;

use super::ApiError;
use crate::model_year::ModelYear;

/// `ConsultarTabelaDeReferencia` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReferencePeriod {
    #[serde(rename = "Codigo", deserialize_with = "code")]
    pub code: u32,
    /// "month/year", e.g. `"janeiro/2023 "` (upstream pads with a space).
    #[serde(rename = "Mes")]
    pub label: String,
}

/// `ConsultarMarcas` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Brand {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value", deserialize_with = "code")]
    pub code: u32,
}

/// Entry of `ConsultarModelos` (inside [`ModelsPage`]) and of
/// `ConsultarModelosAtravesDoAno`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Model {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value", deserialize_with = "code")]
    pub code: u32,
}

/// `ConsultarModelos` wrapper object.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ModelsPage {
    #[serde(rename = "Modelos")]
    pub models: Vec<Model>,
    /// Years available across the whole brand; not used by the traversal.
    #[serde(rename = "Anos", default)]
    pub years: Vec<YearOption>,
}

/// `ConsultarAnoModelo` entry, e.g. `{"Label": "2015 Gasolina", "Value": "2015-1"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct YearOption {
    #[serde(rename = "Label")]
    pub label: String,
    #[serde(rename = "Value", deserialize_with = "model_year")]
    pub value: ModelYear,
}

/// `ConsultarValorComTodosParametros` result.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Valuation {
    /// Verbatim amount, e.g. `"R$ 40.000,00"`.
    #[serde(rename = "Valor")]
    pub value: String,
    #[serde(rename = "Combustivel")]
    pub fuel: String,
    #[serde(rename = "CodigoFipe")]
    pub fipe_code: String,
    #[serde(rename = "Marca", default)]
    pub brand: String,
    #[serde(rename = "Modelo", default)]
    pub model: String,
    #[serde(rename = "AnoModelo", default)]
    pub model_year: Option<u32>,
    #[serde(rename = "MesReferencia", default)]
    pub reference: String,
    #[serde(rename = "SiglaCombustivel", default)]
    pub fuel_initial: Option<String>,
    #[serde(rename = "Autenticacao", default)]
    pub authentication: Option<String>,
}

/// Upstream's own error body, sent with status 200: `{"codigo": "0", "erro": "..."}`.
#[derive(Debug, Deserialize)]
struct UpstreamError {
    erro: String,
}

/// Decode a response body into the operation's shape, surfacing upstream
/// error objects as [`ApiError::Upstream`].
pub(crate) fn decode<R: DeserializeOwned>(body: &[u8]) -> Result<R, ApiError> {
    if let Ok(err) = serde_json::from_slice::<UpstreamError>(body) {
        return Err(ApiError::Upstream(err.erro));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Codes arrive as JSON numbers on some endpoints and numeric strings on others.
fn code<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match Raw::deserialize(d)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("non-numeric code {s:?}"))),
    }
}

fn model_year<'de, D: Deserializer<'de>>(d: D) -> Result<ModelYear, D::Error> {
    let raw = String::deserialize(d)?;
    raw.parse().map_err(de::Error::custom)
}
