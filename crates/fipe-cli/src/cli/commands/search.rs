//! `fipe search ...` – offline lookups in a consolidated table.

use anyhow::Result;
use fipe_core::catalog::{CarRecord, Catalog, Query};
use std::path::Path;

use crate::cli::SearchCommand;

pub fn run_search(table: &Path, query: &SearchCommand) -> Result<()> {
    let catalog = Catalog::load(table)?;

    match query {
        SearchCommand::Brands { prefix } => {
            print_names(&catalog.brands(prefix.as_deref().unwrap_or_default()));
        }
        SearchCommand::Models { brand, prefix } => {
            let Some(models) = catalog.models(brand, prefix.as_deref().unwrap_or_default()) else {
                anyhow::bail!("unknown brand {:?} in {}", brand, table.display());
            };
            print_names(&models);
        }
        SearchCommand::Cars {
            ref_year,
            ref_month,
            brand,
            model,
            year,
        } => {
            let cars = catalog.search(&Query {
                ref_year: *ref_year,
                ref_month: *ref_month,
                brand: *brand,
                model: *model,
                manufacture_year: *year,
            });
            if cars.is_empty() {
                println!("No matching cars.");
            }
            let detailed = model.is_some() && year.is_some();
            for car in cars {
                if detailed {
                    print!("{}", car_details(car));
                } else {
                    println!("{}", car_heading(car));
                }
            }
        }
    }
    Ok(())
}

fn print_names(names: &[(&str, u32)]) {
    if names.is_empty() {
        println!("(empty)");
    }
    for (name, code) in names {
        println!("{} - {}", name, code);
    }
}

fn car_heading(car: &CarRecord) -> String {
    format!(
        "{}/{} {} {} {}",
        car.ref_year, car.ref_month, car.brand, car.model, car.manufacture_year
    )
}

fn car_details(car: &CarRecord) -> String {
    let mut out = format!("{}\n", car_heading(car));
    out.push_str(&format!("  Valor: {:.2}\n", car.value));
    out.push_str(&format!("  Combustivel: {}\n", car.fuel));
    out.push_str(&format!("  Cambio: {}\n", car.gearbox));
    if let Some(cc) = car.engine_size.as_deref() {
        out.push_str(&format!("  cc: {}\n", cc));
    }
    out.push_str(&format!("  Cod-FIPE: {}\n", car.fipe_code));
    out
}
