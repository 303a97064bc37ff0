//! CLI for the FIPE price-table scraper.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fipe_core::config;
use fipe_core::consolidate::Encoding;
use fipe_core::model_year::ModelYear;
use std::path::PathBuf;

use commands::{run_checksum, run_consolidate, run_list, run_price, run_scrape, run_search};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "fipe")]
#[command(about = "Scrape the FIPE vehicle price table into per-month sheets", long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.config/fipe/config.toml when present).
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Walk brands, models and years of each reference period and write one sheet per period.
    Scrape {
        /// Existing directory for the sheets.
        out_dir: PathBuf,
        /// Error log file; relative names are placed inside OUT_DIR.
        error_log: PathBuf,
        /// Reference-period codes to process, in order.
        #[arg(required = true, value_name = "CODE")]
        codes: Vec<u32>,
    },

    /// List one level of the hierarchy.
    List {
        #[command(subcommand)]
        what: ListCommand,
    },

    /// Look up the valuation of one car.
    Price {
        reference: u32,
        brand: u32,
        model: u32,
        /// Model-year as `<year>-<fuelCode>`, e.g. 2015-1.
        year: ModelYear,
    },

    /// Merge the sheets in DIR into one table with numeric values, gearbox and engine size.
    Consolidate {
        dir: PathBuf,
        /// Output file (default: DIR/database.csv).
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
        /// `codes` (g/a/d/e fuel, numeric FIPE code, a/m gearbox) or `labels` (verbatim).
        #[arg(long, default_value = "codes", value_name = "ENCODING")]
        encoding: Encoding,
    },

    /// Look up brands, models and cars in a consolidated table, offline.
    Search {
        /// Consolidated table written by `consolidate`.
        #[arg(long, default_value = "database.csv", value_name = "FILE")]
        table: PathBuf,
        #[command(subcommand)]
        query: SearchCommand,
    },

    /// Print SHA-256 of every sheet in DIR (compare runs).
    Checksum { dir: PathBuf },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ListCommand {
    /// Reference periods (code and month/year).
    References,
    /// Brands of a reference period.
    Brands { reference: u32 },
    /// Models of a brand.
    Models { reference: u32, brand: u32 },
    /// Model-years of a model.
    Years {
        reference: u32,
        brand: u32,
        model: u32,
    },
    /// Models of a brand available in a given model-year.
    ModelsByYear {
        reference: u32,
        brand: u32,
        year: ModelYear,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum SearchCommand {
    /// Brands whose name starts with PREFIX (all when omitted).
    Brands { prefix: Option<String> },
    /// Models of BRAND whose name starts with PREFIX (all when omitted).
    Models { brand: String, prefix: Option<String> },
    /// Cars of one reference month and brand, narrowed by model and then year.
    Cars {
        /// Reference year; two digits mean 20xx.
        ref_year: u32,
        ref_month: u32,
        /// Brand code as printed by `search brands`.
        brand: u32,
        /// Model code as printed by `search models`.
        model: Option<u32>,
        /// Manufacture year.
        year: Option<u32>,
    },
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load(cli.config.as_deref())?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Scrape {
                out_dir,
                error_log,
                codes,
            } => run_scrape(&cfg, &out_dir, &error_log, &codes)?,
            CliCommand::List { what } => run_list(&cfg, &what)?,
            CliCommand::Price {
                reference,
                brand,
                model,
                year,
            } => run_price(&cfg, reference, brand, model, &year)?,
            CliCommand::Consolidate { dir, out, encoding } => {
                run_consolidate(&dir, out.as_deref(), encoding)?
            }
            CliCommand::Search { table, query } => run_search(&table, &query)?,
            CliCommand::Checksum { dir } => run_checksum(&dir)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
