use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Origin of the public FIPE price-table API.
pub const DEFAULT_BASE_URL: &str = "https://veiculos.fipe.org.br";

/// Browser-like agent string; the upstream rejects obvious automation.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Ubuntu; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/115.0";

pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Vehicle category queried upstream. Sent both as a numeric code
/// (`codigoTipoVeiculo`) and, on the valuation call, as a label (`tipoVeiculo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleType {
    #[default]
    Car,
    Motorcycle,
    Truck,
}

impl VehicleType {
    pub fn code(self) -> u32 {
        match self {
            VehicleType::Car => 1,
            VehicleType::Motorcycle => 2,
            VehicleType::Truck => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            VehicleType::Car => "carro",
            VehicleType::Motorcycle => "moto",
            VehicleType::Truck => "caminhao",
        }
    }
}

/// Configuration loaded from `~/.config/fipe/config.toml` (or `--config`).
/// Every field is optional in the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FipeConfig {
    /// API origin, without trailing slash. Also used as the `Referer`.
    pub base_url: String,
    pub vehicle_type: VehicleType,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for FipeConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            vehicle_type: VehicleType::Car,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }
}

/// Path of the per-user config file, if one exists.
pub fn find_config_path() -> Option<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("fipe").ok()?;
    xdg_dirs.find_config_file("config.toml")
}

/// Load configuration. An explicit path must exist; otherwise the XDG file is
/// used when present, and built-in defaults when not. Never writes to disk.
pub fn load(explicit: Option<&Path>) -> Result<FipeConfig> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => match find_config_path() {
            Some(p) => p,
            None => return Ok(FipeConfig::default()),
        },
    };
    let data = fs::read_to_string(&path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg = parse(&data).with_context(|| format!("parse config: {}", path.display()))?;
    tracing::debug!("loaded config from {}", path.display());
    Ok(cfg)
}

fn parse(data: &str) -> Result<FipeConfig> {
    let mut cfg: FipeConfig = toml::from_str(data)?;
    let trimmed = cfg.base_url.trim_end_matches('/').len();
    cfg.base_url.truncate(trimmed);
    Ok(cfg)
}
