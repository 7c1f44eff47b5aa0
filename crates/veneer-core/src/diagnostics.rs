use std::cell::RefCell;
use std::fmt;

use crate::StorageError;

/// Non-fatal failure observed while persisting state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    ReadFailed { key: String, error: StorageError },
    DecodeFailed { key: String, message: String },
    EncodeFailed { key: String, message: String },
    WriteFailed { key: String, error: StorageError },
}

impl Diagnostic {
    pub fn key(&self) -> &str {
        match self {
            Diagnostic::ReadFailed { key, .. }
            | Diagnostic::DecodeFailed { key, .. }
            | Diagnostic::EncodeFailed { key, .. }
            | Diagnostic::WriteFailed { key, .. } => key,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::ReadFailed { key, error } => {
                write!(f, "error reading storage key \"{key}\": {error}")
            }
            Diagnostic::DecodeFailed { key, message } => {
                write!(f, "error decoding storage key \"{key}\": {message}")
            }
            Diagnostic::EncodeFailed { key, message } => {
                write!(f, "error encoding storage key \"{key}\": {message}")
            }
            Diagnostic::WriteFailed { key, error } => {
                write!(f, "error setting storage key \"{key}\": {error}")
            }
        }
    }
}

pub trait DiagnosticSink {
    fn report(&self, diagnostic: Diagnostic);
}

/// Default sink: `log::warn!`.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::warn!("{diagnostic}");
    }
}

/// Keeps every diagnostic for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
    seen: RefCell<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.seen.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.seen.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.borrow().is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::debug!("collected: {diagnostic}");
        self.seen.borrow_mut().push(diagnostic);
    }
}
