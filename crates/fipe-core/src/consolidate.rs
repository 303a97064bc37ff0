//! Merge per-period sheets into one analysis-ready table.
//!
//! Adds a numeric `valor`, the gearbox (`cambio`) and the engine size
//! (`tam_motor`) derived from the model label. With [`Encoding::Codes`] the
//! fuel, FIPE code and gearbox are also packed into the compact form the
//! offline [`crate::catalog`] is built from.

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::sheet;

/// Default output file name inside the sheets directory.
pub const DEFAULT_OUTPUT: &str = "database.csv";

/// How `combustivel`, `codigo_fipe` and `cambio` are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Fuel and FIPE code verbatim; gearbox as `automatico`/`manual`.
    Labels,
    /// Fuel as `g`/`a`/`d`/`e` (electric models forced to `e`), FIPE code as
    /// an integer (`"012345-7"` → `123457`), gearbox as `a`/`m`.
    #[default]
    Codes,
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "labels" => Ok(Encoding::Labels),
            "codes" => Ok(Encoding::Codes),
            other => Err(format!("unknown encoding {other:?} (expected labels or codes)")),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SheetRecord {
    ano_ref: u32,
    mes_ref: u32,
    marca: String,
    modelo: String,
    ano_fab: String,
    valor: String,
    combustivel: String,
    codigo_fipe: String,
}

#[derive(Debug, Serialize)]
struct TableRecord {
    ano_ref: u32,
    mes_ref: u32,
    marca: String,
    modelo: String,
    ano_fab: String,
    valor: String,
    combustivel: String,
    codigo_fipe: String,
    cambio: &'static str,
    tam_motor: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConsolidateSummary {
    pub sheets: usize,
    pub rows: usize,
    pub skipped: usize,
}

/// `"R$ 40.000,00"` → `40000.0`.
pub fn parse_reais(raw: &str) -> Option<f64> {
    let cleaned = raw.replace("R$", "").replace('.', "").replace(',', ".");
    cleaned.trim().parse().ok()
}

/// `true` for labels marked `Aut.` (semi-automatic included).
pub fn is_automatic(model: &str) -> bool {
    model.contains("Aut.")
}

/// First `<digits>.<digits>` in the label, e.g. `"1.0"` in `"Uno Mille 1.0 Fire"`.
pub fn engine_size<'m>(engine_re: &Regex, model: &'m str) -> Option<&'m str> {
    engine_re.find(model).map(|m| m.as_str())
}

/// One-letter fuel code. Labels naming an electric model win over the
/// upstream fuel; unknown fuels pass through unchanged.
pub fn fuel_code(fuel: &str, model: &str) -> String {
    if model.contains("Elétrico") {
        return "e".into();
    }
    match fuel {
        "Gasolina" => "g".into(),
        "Álcool" => "a".into(),
        "Diesel" => "d".into(),
        "Elétrico" => "e".into(),
        other => other.into(),
    }
}

/// `"012345-7"` → `123457`.
pub fn fipe_code_number(code: &str) -> Option<u64> {
    code.trim().replace('-', "").parse().ok()
}

/// Reads every sheet in `dir` (see [`sheet::list_sheets`]) in name order and
/// writes the merged table to `out` (default `dir/database.csv`).
pub fn consolidate(
    dir: &Path,
    out: Option<&Path>,
    encoding: Encoding,
) -> Result<(PathBuf, ConsolidateSummary)> {
    let out_path = out
        .map(Path::to_path_buf)
        .unwrap_or_else(|| dir.join(DEFAULT_OUTPUT));
    let engine_re = Regex::new(r"\d+\.\d+")?;

    let sheets: Vec<PathBuf> = sheet::list_sheets(dir)
        .with_context(|| format!("list sheets in {}", dir.display()))?
        .into_iter()
        .filter(|p| !same_file(p, &out_path))
        .collect();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(&out_path)
        .with_context(|| format!("create {}", out_path.display()))?;

    let mut summary = ConsolidateSummary {
        sheets: sheets.len(),
        ..Default::default()
    };

    for path in &sheets {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .quoting(false)
            .from_path(path)
            .with_context(|| format!("open {}", path.display()))?;

        for (i, record) in reader.deserialize::<SheetRecord>().enumerate() {
            let rec = match record {
                Ok(r) => r,
                Err(e) => {
                    tracing::warn!("{} row {}: {}", path.display(), i + 2, e);
                    summary.skipped += 1;
                    continue;
                }
            };
            let Some(valor) = parse_reais(&rec.valor) else {
                tracing::warn!("{} row {}: unparseable value {:?}", path.display(), i + 2, rec.valor);
                summary.skipped += 1;
                continue;
            };
            let automatic = is_automatic(&rec.modelo);
            let (combustivel, codigo_fipe, cambio) = match encoding {
                Encoding::Labels => (
                    rec.combustivel,
                    rec.codigo_fipe,
                    if automatic { "automatico" } else { "manual" },
                ),
                Encoding::Codes => {
                    let Some(code) = fipe_code_number(&rec.codigo_fipe) else {
                        tracing::warn!(
                            "{} row {}: unparseable FIPE code {:?}",
                            path.display(),
                            i + 2,
                            rec.codigo_fipe
                        );
                        summary.skipped += 1;
                        continue;
                    };
                    (
                        fuel_code(&rec.combustivel, &rec.modelo),
                        code.to_string(),
                        if automatic { "a" } else { "m" },
                    )
                }
            };
            let row = TableRecord {
                tam_motor: engine_size(&engine_re, &rec.modelo).map(str::to_string),
                valor: format!("{valor:.2}"),
                ano_ref: rec.ano_ref,
                mes_ref: rec.mes_ref,
                marca: rec.marca,
                modelo: rec.modelo,
                ano_fab: rec.ano_fab,
                combustivel,
                codigo_fipe,
                cambio,
            };
            writer.serialize(&row)?;
            summary.rows += 1;
        }
    }
    writer.flush()?;

    tracing::info!(
        "consolidated {} rows from {} sheets into {}",
        summary.rows,
        summary.sheets,
        out_path.display()
    );
    Ok((out_path, summary))
}

fn same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::HEADER;
    use std::fs;

    #[test]
    fn reais_to_number() {
        assert_eq!(parse_reais("R$ 40.000,00"), Some(40000.0));
        assert_eq!(parse_reais("R$ 1.234.567,89"), Some(1234567.89));
        assert_eq!(parse_reais("R$ 950,50"), Some(950.5));
        assert_eq!(parse_reais("n/d"), None);
    }

    #[test]
    fn gearbox_from_label() {
        assert!(is_automatic("Corolla XEi 2.0 Flex 16V Aut."));
        assert!(!is_automatic("Uno Mille 1.0 Fire"));
    }

    #[test]
    fn fuel_codes() {
        assert_eq!(fuel_code("Gasolina", "Uno"), "g");
        assert_eq!(fuel_code("Álcool", "Chevette"), "a");
        assert_eq!(fuel_code("Diesel", "Hilux"), "d");
        assert_eq!(fuel_code("Gasolina", "Leaf Elétrico"), "e");
        assert_eq!(fuel_code("Flex", "Gol"), "Flex");
    }

    #[test]
    fn fipe_code_as_number() {
        assert_eq!(fipe_code_number("012345-7"), Some(123457));
        assert_eq!(fipe_code_number("n/d"), None);
    }

    #[test]
    fn engine_size_from_label() {
        let re = Regex::new(r"\d+\.\d+").unwrap();
        assert_eq!(engine_size(&re, "Uno Mille 1.0 Fire"), Some("1.0"));
        assert_eq!(engine_size(&re, "Corolla XEi 2.0 Flex 16V Aut."), Some("2.0"));
        assert_eq!(engine_size(&re, "Sprinter 2.15 Furgão"), Some("2.15"));
        assert_eq!(engine_size(&re, "Kombi Furgão"), None);
    }

    #[test]
    fn merges_sheets_with_labels() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("janeiro_2023.csv"),
            format!("{HEADER}\n2023;1;Fiat;Uno Mille 1.0 Fire;2015;R$ 30.000,00;Gasolina;001-1\n"),
        )
        .unwrap();
        fs::write(
            dir.path().join("fevereiro_2023.csv"),
            format!(
                "{HEADER}\n2023;2;Toyota;Corolla XEi 2.0 Flex 16V Aut.;2020;R$ 100.500,10;Flex;002-2\n\
                 2023;2;Toyota;Bandeirante;1990;indisponivel;Diesel;003-3\n"
            ),
        )
        .unwrap();
        fs::write(dir.path().join("erros.txt"), "something failed\n").unwrap();

        let (out, summary) = consolidate(dir.path(), None, Encoding::Labels).unwrap();
        assert_eq!(out, dir.path().join("database.csv"));
        assert_eq!(
            summary,
            ConsolidateSummary {
                sheets: 2,
                rows: 2,
                skipped: 1
            }
        );

        let text = fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[0],
            "ano_ref;mes_ref;marca;modelo;ano_fab;valor;combustivel;codigo_fipe;cambio;tam_motor"
        );
        // fevereiro sorts before janeiro.
        assert_eq!(
            lines[1],
            "2023;2;Toyota;Corolla XEi 2.0 Flex 16V Aut.;2020;100500.10;Flex;002-2;automatico;2.0"
        );
        assert_eq!(
            lines[2],
            "2023;1;Fiat;Uno Mille 1.0 Fire;2015;30000.00;Gasolina;001-1;manual;1.0"
        );
    }

    #[test]
    fn rerun_does_not_read_its_own_output() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("janeiro_2023.csv"),
            format!("{HEADER}\n2023;1;Fiat;Uno;2015;R$ 30.000,00;Gasolina;001-1\n"),
        )
        .unwrap();
        consolidate(dir.path(), None, Encoding::Codes).unwrap();
        let (_, summary) = consolidate(dir.path(), None, Encoding::Codes).unwrap();
        assert_eq!(summary.sheets, 1);
        assert_eq!(summary.rows, 1);
    }

    #[test]
    fn merges_sheets_with_codes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("janeiro_2023.csv"),
            format!(
                "{HEADER}\n\
                 2023;1;Fiat;Uno Mille 1.0 Fire;2015;R$ 30.000,00;Gasolina;001004-9\n\
                 2023;1;Nissan;Leaf Elétrico Aut.;2022;R$ 180.000,00;Gasolina;023100-1\n\
                 2023;1;Nissan;Frontier;2020;R$ 150.000,00;Diesel;sem-codigo\n"
            ),
        )
        .unwrap();
        fs::write(dir.path().join("ref.json"), "{}").unwrap();

        let (out, summary) = consolidate(dir.path(), None, Encoding::Codes).unwrap();
        assert_eq!(summary.rows, 2);
        assert_eq!(summary.skipped, 1);
        let text = fs::read_to_string(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[1],
            "2023;1;Fiat;Uno Mille 1.0 Fire;2015;30000.00;g;10049;m;1.0"
        );
        assert_eq!(
            lines[2],
            "2023;1;Nissan;Leaf Elétrico Aut.;2022;180000.00;e;231001;a;"
        );
    }

    #[test]
    fn encoding_names() {
        assert_eq!("labels".parse::<Encoding>(), Ok(Encoding::Labels));
        assert_eq!("codes".parse::<Encoding>(), Ok(Encoding::Codes));
        assert!("json".parse::<Encoding>().is_err());
        assert_eq!(Encoding::default(), Encoding::Codes);
    }
}
