//! `fipe price <ref> <brand> <model> <year>` – one valuation.

use anyhow::Result;
use fipe_core::api::FipeClient;
use fipe_core::config::FipeConfig;
use fipe_core::model_year::ModelYear;
use fipe_core::report::Failure;

pub fn run_price(
    cfg: &FipeConfig,
    reference: u32,
    brand: u32,
    model: u32,
    year: &ModelYear,
) -> Result<()> {
    let mut client = FipeClient::from_config(cfg)?;
    let mut report = |f: &Failure| eprintln!("{f}");
    let Some(v) = client.valuation(reference, brand, model, year, &mut report) else {
        anyhow::bail!("request failed");
    };

    println!("{} {} {} {}", v.reference.trim(), v.brand, v.model, year.year());
    println!("  Valor: {}", v.value);
    println!("  Combustivel: {}", v.fuel);
    println!("  Cod-FIPE: {}", v.fipe_code);
    if let Some(auth) = v.authentication.as_deref() {
        println!("  Autenticacao: {}", auth);
    }
    Ok(())
}
