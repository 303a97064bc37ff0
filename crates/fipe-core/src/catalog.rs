//! Offline lookups over a consolidated table (see [`crate::consolidate`]).
//!
//! Brands are numbered 1.. in order of first appearance and each brand's
//! models get their own 1.. sequence, so codes are stable for a given table.
//! Cars are indexed on (reference year, reference month, brand, model,
//! manufacture year) in a `BTreeMap`; a partial key is a range scan.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// One row of the consolidated table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CarRecord {
    #[serde(rename = "ano_ref")]
    pub ref_year: u32,
    #[serde(rename = "mes_ref")]
    pub ref_month: u32,
    #[serde(rename = "marca")]
    pub brand: String,
    #[serde(rename = "modelo")]
    pub model: String,
    #[serde(rename = "ano_fab")]
    pub manufacture_year: u32,
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "combustivel")]
    pub fuel: String,
    #[serde(rename = "codigo_fipe")]
    pub fipe_code: String,
    #[serde(rename = "cambio")]
    pub gearbox: String,
    #[serde(rename = "tam_motor", default)]
    pub engine_size: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct CarKey {
    ref_year: u32,
    ref_month: u32,
    brand: u32,
    model: u32,
    manufacture_year: u32,
}

/// A lookup by reference month and brand, optionally narrowed by model and
/// then manufacture year. Two-digit reference years mean 20xx.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    pub ref_year: u32,
    pub ref_month: u32,
    pub brand: u32,
    pub model: Option<u32>,
    pub manufacture_year: Option<u32>,
}

#[derive(Debug, Default)]
struct Names {
    by_code: Vec<String>,
    codes: HashMap<String, u32>,
}

impl Names {
    fn code_or_insert(&mut self, name: &str) -> u32 {
        if let Some(&code) = self.codes.get(name) {
            return code;
        }
        self.by_code.push(name.to_string());
        let code = self.by_code.len() as u32;
        self.codes.insert(name.to_string(), code);
        code
    }

    fn with_prefix(&self, prefix: &str) -> Vec<(&str, u32)> {
        let mut out: Vec<(&str, u32)> = self
            .by_code
            .iter()
            .zip(1..)
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, code)| (name.as_str(), code))
            .collect();
        out.sort();
        out
    }
}

/// In-memory index of a consolidated table.
#[derive(Debug, Default)]
pub struct Catalog {
    brands: Names,
    models: Vec<Names>,
    cars: BTreeMap<CarKey, Vec<CarRecord>>,
}

impl Catalog {
    /// Reads a consolidated table (`;`-delimited, with header). Rows that do
    /// not deserialize are skipped with a warning.
    pub fn load(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .from_path(path)
            .with_context(|| format!("open {}", path.display()))?;

        let mut catalog = Catalog::default();
        let mut skipped = 0usize;
        for (i, record) in reader.deserialize::<CarRecord>().enumerate() {
            match record {
                Ok(car) => catalog.insert(car),
                Err(e) => {
                    tracing::warn!("{} row {}: {}", path.display(), i + 2, e);
                    skipped += 1;
                }
            }
        }
        tracing::info!(
            "loaded {} cars, {} brands from {} ({} rows skipped)",
            catalog.len(),
            catalog.brands.by_code.len(),
            path.display(),
            skipped
        );
        Ok(catalog)
    }

    fn insert(&mut self, car: CarRecord) {
        let brand = self.brands.code_or_insert(&car.brand);
        if self.models.len() < brand as usize {
            self.models.resize_with(brand as usize, Names::default);
        }
        let model = self.models[brand as usize - 1].code_or_insert(&car.model);
        let key = CarKey {
            ref_year: car.ref_year,
            ref_month: car.ref_month,
            brand,
            model,
            manufacture_year: car.manufacture_year,
        };
        self.cars.entry(key).or_default().push(car);
    }

    /// Number of cars indexed.
    pub fn len(&self) -> usize {
        self.cars.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cars.is_empty()
    }

    /// Brands whose name starts with `prefix`, sorted by name.
    pub fn brands(&self, prefix: &str) -> Vec<(&str, u32)> {
        self.brands.with_prefix(prefix)
    }

    pub fn brand_code(&self, name: &str) -> Option<u32> {
        self.brands.codes.get(name).copied()
    }

    /// Models of `brand` whose name starts with `prefix`, sorted by name.
    /// `None` when the brand is unknown.
    pub fn models(&self, brand: &str, prefix: &str) -> Option<Vec<(&str, u32)>> {
        let code = self.brand_code(brand)?;
        Some(self.models[code as usize - 1].with_prefix(prefix))
    }

    /// Cars matching `query`, in key order.
    pub fn search(&self, query: &Query) -> Vec<&CarRecord> {
        let ref_year = if query.ref_year < 100 {
            2000 + query.ref_year
        } else {
            query.ref_year
        };
        let (model_lo, model_hi) = match query.model {
            Some(m) => (m, m),
            None => (0, u32::MAX),
        };
        let (year_lo, year_hi) = match (query.model, query.manufacture_year) {
            (Some(_), Some(y)) => (y, y),
            _ => (0, u32::MAX),
        };
        let lo = CarKey {
            ref_year,
            ref_month: query.ref_month,
            brand: query.brand,
            model: model_lo,
            manufacture_year: year_lo,
        };
        let hi = CarKey {
            model: model_hi,
            manufacture_year: year_hi,
            ..lo
        };
        self.cars.range(lo..=hi).flat_map(|(_, cars)| cars).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const TABLE: &str = "\
ano_ref;mes_ref;marca;modelo;ano_fab;valor;combustivel;codigo_fipe;cambio;tam_motor
2023;1;Subaru;Impreza 2.0;1999;40000.00;g;123457;m;2.0
2023;1;Subaru;Forester 2.5 Aut.;2010;55000.00;g;123460;a;2.5
2023;1;Suzuki;Jimny 1.3;2015;60000.00;g;200011;m;1.3
2023;1;Subaru;Impreza 2.0;2000;42000.00;g;123457;m;2.0
2023;2;Subaru;Impreza 2.0;1999;39000.00;g;123457;m;2.0
2023;1;Acura;Legend 3.2;1995;30000.00;g;300001;m;3.2
2023;1;Subaru;Impreza 2.0;broken;1.00;g;1;m;
";

    fn catalog() -> Catalog {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.csv");
        fs::write(&path, TABLE).unwrap();
        Catalog::load(&path).unwrap()
    }

    #[test]
    fn loads_rows_and_skips_malformed() {
        let c = catalog();
        assert_eq!(c.len(), 6);
        assert!(!c.is_empty());
    }

    #[test]
    fn brand_codes_follow_first_appearance() {
        let c = catalog();
        assert_eq!(c.brand_code("Subaru"), Some(1));
        assert_eq!(c.brand_code("Suzuki"), Some(2));
        assert_eq!(c.brand_code("Acura"), Some(3));
        assert_eq!(c.brand_code("Fiat"), None);
    }

    #[test]
    fn brand_prefix_listing_is_sorted() {
        let c = catalog();
        assert_eq!(c.brands(""), [("Acura", 3), ("Subaru", 1), ("Suzuki", 2)]);
        assert_eq!(c.brands("Su"), [("Subaru", 1), ("Suzuki", 2)]);
        assert!(c.brands("Z").is_empty());
    }

    #[test]
    fn model_listing_per_brand() {
        let c = catalog();
        assert_eq!(
            c.models("Subaru", "").unwrap(),
            [("Forester 2.5 Aut.", 2), ("Impreza 2.0", 1)]
        );
        assert_eq!(c.models("Subaru", "Im").unwrap(), [("Impreza 2.0", 1)]);
        assert_eq!(c.models("Suzuki", "").unwrap(), [("Jimny 1.3", 1)]);
        assert!(c.models("Fiat", "").is_none());
    }

    #[test]
    fn exact_search_finds_one_car() {
        let c = catalog();
        let hits = c.search(&Query {
            ref_year: 2023,
            ref_month: 1,
            brand: 1,
            model: Some(1),
            manufacture_year: Some(1999),
        });
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].value, 40000.0);
        assert_eq!(hits[0].fipe_code, "123457");
        assert_eq!(hits[0].engine_size.as_deref(), Some("2.0"));
    }

    #[test]
    fn partial_search_scans_the_range() {
        let c = catalog();
        let by_model = c.search(&Query {
            ref_year: 23,
            ref_month: 1,
            brand: 1,
            model: Some(1),
            manufacture_year: None,
        });
        let years: Vec<u32> = by_model.iter().map(|r| r.manufacture_year).collect();
        assert_eq!(years, [1999, 2000]);

        let by_brand = c.search(&Query {
            ref_year: 2023,
            ref_month: 1,
            brand: 1,
            model: None,
            manufacture_year: None,
        });
        assert_eq!(by_brand.len(), 3);
        assert!(by_brand.iter().all(|r| r.brand == "Subaru" && r.ref_month == 1));
    }

    #[test]
    fn search_miss_is_empty() {
        let c = catalog();
        assert!(c
            .search(&Query {
                ref_year: 2022,
                ref_month: 1,
                brand: 1,
                model: None,
                manufacture_year: None,
            })
            .is_empty());
    }

    #[test]
    fn loads_a_table_written_by_consolidate() {
        use crate::consolidate::{consolidate, Encoding};
        use crate::sheet::HEADER;

        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("janeiro_2023.csv"),
            format!("{HEADER}\n2023;1;Fiat;Uno Mille 1.0 Fire;2015;R$ 30.000,00;Gasolina;001004-9\n"),
        )
        .unwrap();
        for encoding in [Encoding::Codes, Encoding::Labels] {
            let (out, _) = consolidate(dir.path(), None, encoding).unwrap();
            let c = Catalog::load(&out).unwrap();
            assert_eq!(c.len(), 1);
            assert_eq!(c.models("Fiat", "Uno").unwrap(), [("Uno Mille 1.0 Fire", 1)]);
        }
    }
}
