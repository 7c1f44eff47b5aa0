//! Platform services consumed by the hooks.
//!
//! The browser implementation lives in `veneer-platform`; the in-memory one
//! in [`crate::memory`] backs native runs and tests.

use std::fmt;
use std::rc::Rc;

use crate::{Dispose, StorageError};

/// Text-keyed, text-valued synchronous store (`localStorage`-like).
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Identifies one running instance of the application (a tab, a window).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// A write to the store made by another execution context.
///
/// `key` is `None` when the whole store was cleared.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StorageChange {
    pub key: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub origin: ContextId,
}

pub trait StorageEvents {
    /// Listener stays installed until the returned guard runs.
    fn subscribe(&self, listener: Rc<dyn Fn(&StorageChange)>) -> Dispose;
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ListenerOptions {
    /// The listener never cancels the platform's own handling.
    pub passive: bool,
}

impl ListenerOptions {
    pub const PASSIVE: Self = Self { passive: true };
}

/// Vertical scroll position of the document.
pub trait ScrollSource {
    /// Current offset in pixels.
    fn offset(&self) -> f64;
    fn subscribe(&self, options: ListenerOptions, listener: Rc<dyn Fn(f64)>) -> Dispose;
}
