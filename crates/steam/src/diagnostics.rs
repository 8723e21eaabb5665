//! Non-fatal findings reported while resolving.
//!
//! Expected absences (an unplugged library drive, a mismatched manifest id
//! under the tolerant policy) are not errors, but callers may still want to
//! see them. They go to a [`DiagnosticSink`] instead of the returned result.

use std::fmt;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// A non-fatal finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A configured library folder does not exist; it was skipped.
    LibraryMissing { path: PathBuf },
    /// A configured library folder exists but is not a directory; it was skipped.
    LibraryNotDirectory { path: PathBuf },
    /// A manifest reports a different appid than the one requested.
    AppIdMismatch { requested: String, reported: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::LibraryMissing { path } => {
                write!(f, "library folder {} does not exist", path.display())
            }
            Warning::LibraryNotDirectory { path } => {
                write!(f, "library folder {} is not a directory", path.display())
            }
            Warning::AppIdMismatch {
                requested,
                reported,
            } => write!(f, "manifest for app {requested} reports appid {reported}"),
        }
    }
}

/// Receives warnings from a resolver.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, warning: Warning);
}

/// Logs warnings through `tracing`. Missing libraries are routine and only
/// logged at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&self, warning: Warning) {
        match &warning {
            Warning::LibraryMissing { path } => {
                tracing::debug!(path = %path.display(), "skipping missing library folder");
            }
            Warning::LibraryNotDirectory { path } => {
                tracing::warn!(
                    path = %path.display(),
                    "skipping library folder that is not a directory"
                );
            }
            Warning::AppIdMismatch {
                requested,
                reported,
            } => {
                tracing::warn!(%requested, %reported, "app manifest id does not match request");
            }
        }
    }
}

/// Discards every warning.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _warning: Warning) {}
}

/// Records warnings for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    warnings: Mutex<Vec<Warning>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the warnings recorded so far.
    pub fn warnings(&self) -> Vec<Warning> {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Removes and returns the recorded warnings.
    pub fn take(&self) -> Vec<Warning> {
        std::mem::take(&mut *self.warnings.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, warning: Warning) {
        self.warnings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(warning);
    }
}
