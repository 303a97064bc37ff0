//! `fipe list ...` – print one level of the hierarchy as `<label> - <code>`.

use anyhow::Result;
use fipe_core::api::FipeClient;
use fipe_core::config::FipeConfig;
use fipe_core::report::Failure;

use crate::cli::ListCommand;

pub fn run_list(cfg: &FipeConfig, what: &ListCommand) -> Result<()> {
    let mut client = FipeClient::from_config(cfg)?;
    let mut report = |f: &Failure| eprintln!("{f}");

    let entries: Option<Vec<(String, String)>> = match what {
        ListCommand::References => client.reference_periods(&mut report).map(|refs| {
            refs.into_iter()
                .map(|r| (r.label.trim().to_string(), r.code.to_string()))
                .collect()
        }),
        ListCommand::Brands { reference } => client
            .brands(*reference, &mut report)
            .map(|v| v.into_iter().map(|b| (b.label, b.code.to_string())).collect()),
        ListCommand::Models { reference, brand } => client
            .models(*reference, *brand, &mut report)
            .map(|p| {
                p.models
                    .into_iter()
                    .map(|m| (m.label, m.code.to_string()))
                    .collect()
            }),
        ListCommand::Years {
            reference,
            brand,
            model,
        } => client
            .model_years(*reference, *brand, *model, &mut report)
            .map(|v| {
                v.into_iter()
                    .map(|y| (y.label, y.value.to_string()))
                    .collect()
            }),
        ListCommand::ModelsByYear {
            reference,
            brand,
            year,
        } => client
            .models_by_year(*reference, *brand, year, &mut report)
            .map(|v| v.into_iter().map(|m| (m.label, m.code.to_string())).collect()),
    };

    let Some(entries) = entries else {
        anyhow::bail!("request failed");
    };
    if entries.is_empty() {
        println!("(empty)");
    }
    for (label, code) in entries {
        println!("{} - {}", label, code);
    }
    Ok(())
}
