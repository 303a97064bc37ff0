//! Failure reporting.
//!
//! Every failure is recorded where it happens and never propagated: the
//! traversal keeps going with the next sibling. [`Reporter`] is the only
//! coupling between the API client, the traversal and wherever failures end up.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{ApiError, Request};

/// A labeled failure for one branch of the traversal.
#[derive(Debug, Error)]
pub enum Failure {
    /// Transport, HTTP, decode or upstream error on one API call.
    #[error("{request} failed: {source}")]
    Api { request: Request, source: ApiError },

    #[error("reference period {code} not found in reference table")]
    MissingReference { code: u32 },

    #[error("reference period {code} has unrecognized label {label:?}")]
    BadLabel { code: u32, label: String },

    #[error("append to {} failed: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Anything that can record a labeled failure.
pub trait Reporter {
    fn report(&mut self, failure: &Failure);
}

impl<F> Reporter for F
where
    F: FnMut(&Failure),
{
    fn report(&mut self, failure: &Failure) {
        self(failure)
    }
}

/// Counts what passes through to the wrapped reporter.
#[derive(Debug)]
pub struct Tally<R> {
    inner: R,
    count: usize,
}

impl<R: Reporter> Tally<R> {
    pub fn new(inner: R) -> Self {
        Tally { inner, count: 0 }
    }

    /// Failures reported so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }
}

impl<R: Reporter> Reporter for Tally<R> {
    fn report(&mut self, failure: &Failure) {
        self.count += 1;
        self.inner.report(failure);
    }
}

/// Append-only error log, one line per failure. The file is opened, appended
/// and closed on every report. Each failure is also echoed to stderr.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ErrorLog { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut f = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(f, "{line}")
    }
}

impl Reporter for ErrorLog {
    fn report(&mut self, failure: &Failure) {
        let line = failure.to_string();
        eprintln!("{line}");
        tracing::warn!("{line}");
        if let Err(e) = self.append(&line) {
            tracing::error!("could not append to error log {}: {}", self.path.display(), e);
        }
    }
}
