//! Per-period output sheets: `;`-separated, fixed header, append-only.

mod sanitize;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub use sanitize::sanitize_file_stem;

/// First line of every sheet.
pub const HEADER: &str = "ano_ref;mes_ref;marca;modelo;ano_fab;valor;combustivel;codigo_fipe";

pub const EXTENSION: &str = "csv";

const FALLBACK_STEM: &str = "referencia";

/// File name for a reference period's sheet, e.g. `janeiro_2023.csv`.
pub fn file_name_for_label(label: &str) -> String {
    let stem = sanitize_file_stem(label);
    let stem = if stem.is_empty() { FALLBACK_STEM } else { &stem };
    format!("{stem}.{EXTENSION}")
}

/// One valued car in one reference period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetRow<'a> {
    pub ref_year: u32,
    pub ref_month: u32,
    pub brand: &'a str,
    pub model: &'a str,
    pub manufacture_year: &'a str,
    pub value: &'a str,
    pub fuel: &'a str,
    pub fipe_code: &'a str,
}

impl SheetRow<'_> {
    /// The row as written, newline included.
    pub fn to_line(&self) -> String {
        format!(
            "{};{};{};{};{};{};{};{}\n",
            self.ref_year,
            self.ref_month,
            self.brand,
            self.model,
            self.manufacture_year,
            self.value,
            self.fuel,
            self.fipe_code
        )
    }
}

/// A sheet on disk. Opened, appended and closed on every write.
#[derive(Debug, Clone)]
pub struct Sheet {
    path: PathBuf,
}

impl Sheet {
    /// Opens (creating if needed) the sheet for `label` under `dir`. The header
    /// is written only if the file is new or empty; existing rows are kept.
    pub fn init(dir: &Path, label: &str) -> io::Result<Self> {
        let sheet = Sheet {
            path: dir.join(file_name_for_label(label)),
        };
        let mut f = sheet.open()?;
        if f.metadata()?.len() == 0 {
            writeln!(f, "{HEADER}")?;
        }
        Ok(sheet)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, row: &SheetRow<'_>) -> io::Result<()> {
        self.open()?.write_all(row.to_line().as_bytes())
    }

    fn open(&self) -> io::Result<fs::File> {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
    }
}

/// Sheets in `dir` (by extension, skipping names containing "erro" and the
/// consolidated table), sorted by name.
pub fn list_sheets(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .map_or(false, |e| e.eq_ignore_ascii_case(EXTENSION));
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        let is_error_log = name.contains("erro");
        let is_table = name == crate::consolidate::DEFAULT_OUTPUT;
        if is_csv && !is_error_log && !is_table {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}
