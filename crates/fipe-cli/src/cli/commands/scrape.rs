//! `fipe scrape <out_dir> <error_log> <codes>...` – the full traversal.

use anyhow::Result;
use fipe_core::api::FipeClient;
use fipe_core::config::FipeConfig;
use fipe_core::report::{ErrorLog, Tally};
use fipe_core::traverse;
use std::path::{Path, PathBuf};

pub fn run_scrape(cfg: &FipeConfig, out_dir: &Path, error_log: &Path, codes: &[u32]) -> Result<()> {
    if !out_dir.is_dir() {
        anyhow::bail!("output directory {} does not exist", out_dir.display());
    }

    let mut log = Tally::new(ErrorLog::new(error_log_path(out_dir, error_log)));
    let mut client = FipeClient::from_config(cfg)?;
    tracing::info!(
        "scrape references {:?} from {} into {}",
        codes,
        cfg.base_url,
        out_dir.display()
    );

    traverse::scrape(&mut client, codes, out_dir, &mut log);

    println!("{}", finish_message(log.count(), log.inner().path()));
    Ok(())
}

fn finish_message(failures: usize, log: &Path) -> String {
    if failures == 0 {
        "Finished without failures.".to_string()
    } else {
        format!("Finished with {} failures; see {}", failures, log.display())
    }
}

/// Relative error-log names live next to the sheets.
fn error_log_path(out_dir: &Path, error_log: &Path) -> PathBuf {
    if error_log.is_absolute() {
        error_log.to_path_buf()
    } else {
        out_dir.join(error_log)
    }
}
