//! # Platform locals
//!
//! Hooks never name a concrete store or scroll source. They read the
//! [`Platform`] bundle from a thread‑local stack of "composition locals",
//! so a host (or a test) can swap services for a subtree:
//!
//! ```rust
//! use veneer_core::*;
//!
//! let storage = MemoryStorage::new();
//! let platform = Platform::memory_with(storage.clone(), MemoryScroll::new());
//!
//! with_platform(platform, || {
//!     // hooks composed here persist into `storage`
//! });
//! ```
//!
//! Without an override, [`platform()`] returns a per-thread in-memory
//! bundle that logs diagnostics through `log::warn!`.

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::{
    DiagnosticSink, KeyValueStore, LogSink, MemoryScroll, MemoryStorage, ScrollSource,
    StorageEvents,
};

thread_local! {
    static LOCALS_STACK: RefCell<Vec<HashMap<TypeId, Box<dyn Any>>>> = const { RefCell::new(Vec::new()) };
    static DEFAULT_PLATFORM: Platform = Platform::memory();
}

/// Services a hook may talk to.
#[derive(Clone)]
pub struct Platform {
    pub storage: Rc<dyn KeyValueStore>,
    pub storage_events: Rc<dyn StorageEvents>,
    pub scroll: Rc<dyn ScrollSource>,
    pub diagnostics: Rc<dyn DiagnosticSink>,
}

impl Platform {
    pub fn memory() -> Self {
        Self::memory_with(MemoryStorage::new(), MemoryScroll::new())
    }

    /// In-memory bundle over the given handles, so callers keep access to
    /// them (e.g. to drive scrolling or open another context).
    pub fn memory_with(storage: MemoryStorage, scroll: MemoryScroll) -> Self {
        let storage = Rc::new(storage);
        Self {
            storage: storage.clone(),
            storage_events: storage,
            scroll: Rc::new(scroll),
            diagnostics: Rc::new(LogSink),
        }
    }

    pub fn with_diagnostics(mut self, sink: Rc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = sink;
        self
    }
}

fn with_locals_frame<R>(f: impl FnOnce() -> R) -> R {
    // pops on unwind too
    struct Guard;
    impl Drop for Guard {
        fn drop(&mut self) {
            LOCALS_STACK.with(|st| {
                st.borrow_mut().pop();
            });
        }
    }
    LOCALS_STACK.with(|st| st.borrow_mut().push(HashMap::new()));
    let _guard = Guard;
    f()
}

fn set_local_boxed(t: TypeId, v: Box<dyn Any>) {
    LOCALS_STACK.with(|st| {
        let mut st = st.borrow_mut();
        match st.last_mut() {
            Some(top) => {
                top.insert(t, v);
            }
            None => {
                let mut m = HashMap::new();
                m.insert(t, v);
                st.push(m);
            }
        }
    });
}

fn local<T: Clone + 'static>() -> Option<T> {
    LOCALS_STACK.with(|st| {
        st.borrow()
            .iter()
            .rev()
            .find_map(|frame| frame.get(&TypeId::of::<T>())?.downcast_ref::<T>().cloned())
    })
}

pub fn with_platform<R>(platform: Platform, f: impl FnOnce() -> R) -> R {
    with_locals_frame(|| {
        set_local_boxed(TypeId::of::<Platform>(), Box::new(platform));
        f()
    })
}

pub fn platform() -> Platform {
    local::<Platform>().unwrap_or_else(|| DEFAULT_PLATFORM.with(Platform::clone))
}
