//! `fipe consolidate <dir>` – merge sheets into one table.

use anyhow::Result;
use fipe_core::consolidate::{self, Encoding};
use std::path::Path;

pub fn run_consolidate(dir: &Path, out: Option<&Path>, encoding: Encoding) -> Result<()> {
    let (path, summary) = consolidate::consolidate(dir, out, encoding)?;
    println!(
        "Wrote {} rows from {} sheets to {}",
        summary.rows,
        summary.sheets,
        path.display()
    );
    if summary.skipped > 0 {
        println!("  ({} rows skipped; see log)", summary.skipped);
    }
    Ok(())
}
