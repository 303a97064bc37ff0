//! SHA-256 digests of sheets, to compare two runs against the same upstream.

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::sheet;

const BUF_SIZE: usize = 64 * 1024;

/// Compute SHA-256 of a file and return the digest as lowercase hex.
pub fn sha256_path(path: &Path) -> Result<String> {
    let mut f = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; BUF_SIZE];
    loop {
        let n = f
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// Digest of every sheet in `dir`, sorted by file name.
pub fn sheet_digests(dir: &Path) -> Result<Vec<(PathBuf, String)>> {
    let sheets =
        sheet::list_sheets(dir).with_context(|| format!("list sheets in {}", dir.display()))?;
    sheets
        .into_iter()
        .map(|p| sha256_path(&p).map(|d| (p, d)))
        .collect()
}
