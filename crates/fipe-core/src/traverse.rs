//! Walks reference period → brand → model → model-year and writes one sheet
//! row per valued car.
//!
//! Strictly sequential. A failure at any level is reported once and prunes
//! only that subtree; siblings carry on. Rows land in traversal order:
//! requested period order, then upstream order at every level below.

use std::path::Path;

use crate::api::{Brand, FipeClient, Model, ReferencePeriod, Transport, YearOption};
use crate::reference::ReferenceMonth;
use crate::report::{Failure, Reporter};
use crate::sheet::{Sheet, SheetRow};

/// Scrape the requested reference periods into `out_dir`.
///
/// Effects are the sheets and whatever `reporter` records; there is no summary.
pub fn scrape<T: Transport>(
    client: &mut FipeClient<T>,
    requested: &[u32],
    out_dir: &Path,
    reporter: &mut dyn Reporter,
) {
    let Some(references) = client.reference_periods(reporter) else {
        return;
    };

    for &code in requested {
        let Some(period) = references.iter().find(|r| r.code == code) else {
            reporter.report(&Failure::MissingReference { code });
            continue;
        };
        scrape_period(client, period, out_dir, reporter);
    }
}

fn scrape_period<T: Transport>(
    client: &mut FipeClient<T>,
    period: &ReferencePeriod,
    out_dir: &Path,
    reporter: &mut dyn Reporter,
) {
    let Some(month) = ReferenceMonth::parse(&period.label) else {
        reporter.report(&Failure::BadLabel {
            code: period.code,
            label: period.label.clone(),
        });
        return;
    };

    let sheet = match Sheet::init(out_dir, &period.label) {
        Ok(s) => s,
        Err(source) => {
            reporter.report(&Failure::Write {
                path: out_dir.join(crate::sheet::file_name_for_label(&period.label)),
                source,
            });
            return;
        }
    };
    tracing::info!(
        "reference {} ({}) -> {}",
        period.code,
        period.label.trim(),
        sheet.path().display()
    );

    let Some(brands) = client.brands(period.code, reporter) else {
        return;
    };
    if brands.is_empty() {
        tracing::info!("empty result: no brands for reference {}", period.code);
    }

    let ctx = PeriodContext {
        reference: period.code,
        month,
        sheet: &sheet,
    };
    for brand in &brands {
        scrape_brand(client, &ctx, brand, reporter);
    }
}

struct PeriodContext<'a> {
    reference: u32,
    month: ReferenceMonth,
    sheet: &'a Sheet,
}

fn scrape_brand<T: Transport>(
    client: &mut FipeClient<T>,
    ctx: &PeriodContext<'_>,
    brand: &Brand,
    reporter: &mut dyn Reporter,
) {
    let Some(page) = client.models(ctx.reference, brand.code, reporter) else {
        return;
    };
    if page.models.is_empty() {
        tracing::info!(
            "empty result: no models for reference {} brand {}",
            ctx.reference,
            brand.code
        );
    }
    tracing::debug!("brand {} ({}): {} models", brand.label, brand.code, page.models.len());

    for model in &page.models {
        scrape_model(client, ctx, brand, model, reporter);
    }
}

fn scrape_model<T: Transport>(
    client: &mut FipeClient<T>,
    ctx: &PeriodContext<'_>,
    brand: &Brand,
    model: &Model,
    reporter: &mut dyn Reporter,
) {
    let Some(years) = client.model_years(ctx.reference, brand.code, model.code, reporter) else {
        return;
    };
    if years.is_empty() {
        tracing::info!(
            "empty result: no years for reference {} brand {} model {}",
            ctx.reference,
            brand.code,
            model.code
        );
    }

    for year in &years {
        scrape_leaf(client, ctx, brand, model, year, reporter);
    }
}

fn scrape_leaf<T: Transport>(
    client: &mut FipeClient<T>,
    ctx: &PeriodContext<'_>,
    brand: &Brand,
    model: &Model,
    year: &YearOption,
    reporter: &mut dyn Reporter,
) {
    let Some(valuation) =
        client.valuation(ctx.reference, brand.code, model.code, &year.value, reporter)
    else {
        return;
    };

    let row = SheetRow {
        ref_year: ctx.month.year,
        ref_month: ctx.month.month,
        brand: &brand.label,
        model: &model.label,
        manufacture_year: year.value.year(),
        value: &valuation.value,
        fuel: &valuation.fuel,
        fipe_code: &valuation.fipe_code,
    };
    if let Err(source) = ctx.sheet.append(&row) {
        reporter.report(&Failure::Write {
            path: ctx.sheet.path().to_path_buf(),
            source,
        });
    }
}
