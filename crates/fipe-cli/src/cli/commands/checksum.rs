//! `fipe checksum <dir>` – SHA-256 of every sheet in a directory.

use anyhow::Result;
use fipe_core::checksum;
use std::path::Path;

pub fn run_checksum(dir: &Path) -> Result<()> {
    let digests = checksum::sheet_digests(dir)?;
    if digests.is_empty() {
        println!("No sheets in {}.", dir.display());
    }
    for (path, digest) in digests {
        println!("{}  {}", digest, path.display());
    }
    Ok(())
}
