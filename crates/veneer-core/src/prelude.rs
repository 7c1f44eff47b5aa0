pub use crate::diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, LogSink};
pub use crate::effects::{Dispose, disposable_effect, effect, on_unmount};
pub use crate::error::StorageError;
pub use crate::locals::{Platform, platform, with_platform};
pub use crate::memory::{MemoryScroll, MemoryStorage};
pub use crate::platform::{
    ContextId, KeyValueStore, ListenerOptions, ScrollSource, StorageChange, StorageEvents,
};
pub use crate::runtime::{Composition, remember_state_with_key, remember_with_key};
pub use crate::scope::{Scope, current_scope};
pub use crate::signal::{Signal, SubId, signal};
