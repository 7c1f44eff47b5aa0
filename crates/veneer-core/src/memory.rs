//! In-memory platform services.
//!
//! [`MemoryStorage`] handles created with [`MemoryStorage::context`] share one
//! backing map, the way tabs of one origin share `localStorage`. A write made
//! through one handle is announced to the listeners of every *other* handle.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

use crate::{
    ContextId, Dispose, KeyValueStore, ListenerOptions, ScrollSource, StorageChange,
    StorageError, StorageEvents,
};

new_key_type! {
    struct ListenerKey;
}

type ChangeListener = Rc<dyn Fn(&StorageChange)>;

#[derive(Default)]
struct SharedStore {
    entries: RefCell<HashMap<String, String>>,
    listeners: RefCell<SlotMap<ListenerKey, (ContextId, ChangeListener)>>,
    next_context: Cell<u64>,
    /// Byte budget over keys + values.
    quota: Cell<Option<usize>>,
    unavailable: Cell<bool>,
}

impl SharedStore {
    fn used_bytes_with(&self, key: &str, value: &str) -> usize {
        let entries = self.entries.borrow();
        let others: usize = entries
            .iter()
            .filter(|(k, _)| k.as_str() != key)
            .map(|(k, v)| k.len() + v.len())
            .sum();
        others + key.len() + value.len()
    }

    fn broadcast(&self, change: StorageChange) {
        let targets: SmallVec<[ChangeListener; 4]> = self
            .listeners
            .borrow()
            .values()
            .filter(|(ctx, _)| *ctx != change.origin)
            .map(|(_, l)| l.clone())
            .collect();
        for listener in targets {
            listener(&change);
        }
    }
}

#[derive(Clone)]
pub struct MemoryStorage {
    shared: Rc<SharedStore>,
    context: ContextId,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStorage {
    pub fn new() -> Self {
        let shared = Rc::new(SharedStore::default());
        shared.next_context.set(1);
        Self {
            shared,
            context: ContextId(0),
        }
    }

    /// Another execution context over the same backing map.
    pub fn context(&self) -> Self {
        let id = self.shared.next_context.get();
        self.shared.next_context.set(id + 1);
        Self {
            shared: self.shared.clone(),
            context: ContextId(id),
        }
    }

    pub fn id(&self) -> ContextId {
        self.context
    }

    pub fn set_quota(&self, bytes: Option<usize>) {
        self.shared.quota.set(bytes);
    }

    /// Every operation fails with [`StorageError::Unavailable`] while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.shared.unavailable.set(unavailable);
    }

    /// Writes a raw value without notifying anyone, e.g. to seed a test.
    pub fn seed(&self, key: &str, value: &str) {
        self.shared
            .entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
    }

    /// Drops every entry and announces a `key: None` change.
    pub fn clear(&self) {
        self.shared.entries.borrow_mut().clear();
        self.shared.broadcast(StorageChange {
            key: None,
            old_value: None,
            new_value: None,
            origin: self.context,
        });
    }

    pub fn len(&self) -> usize {
        self.shared.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.shared.entries.borrow().is_empty()
    }

    pub fn listener_count(&self) -> usize {
        self.shared.listeners.borrow().len()
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if self.shared.unavailable.get() {
            Err(StorageError::Unavailable)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.check_available()?;
        Ok(self.shared.entries.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check_available()?;
        if let Some(quota) = self.shared.quota.get()
            && self.shared.used_bytes_with(key, value) > quota
        {
            return Err(StorageError::QuotaExceeded {
                key: key.to_owned(),
            });
        }

        let old_value = self
            .shared
            .entries
            .borrow_mut()
            .insert(key.to_owned(), value.to_owned());
        // Like the browser: rewriting the same value is not announced.
        if old_value.as_deref() == Some(value) {
            return Ok(());
        }
        self.shared.broadcast(StorageChange {
            key: Some(key.to_owned()),
            old_value,
            new_value: Some(value.to_owned()),
            origin: self.context,
        });
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.check_available()?;
        let old_value = self.shared.entries.borrow_mut().remove(key);
        if old_value.is_some() {
            self.shared.broadcast(StorageChange {
                key: Some(key.to_owned()),
                old_value,
                new_value: None,
                origin: self.context,
            });
        }
        Ok(())
    }
}

impl StorageEvents for MemoryStorage {
    fn subscribe(&self, listener: Rc<dyn Fn(&StorageChange)>) -> Dispose {
        let id = self
            .shared
            .listeners
            .borrow_mut()
            .insert((self.context, listener));
        let weak: Weak<SharedStore> = Rc::downgrade(&self.shared);
        Dispose::new(move || {
            if let Some(shared) = weak.upgrade() {
                shared.listeners.borrow_mut().remove(id);
            }
        })
    }
}

type ScrollListener = Rc<dyn Fn(f64)>;

#[derive(Default)]
struct ScrollInner {
    offset: Cell<f64>,
    listeners: RefCell<SlotMap<ListenerKey, (ListenerOptions, ScrollListener)>>,
}

/// Scroll source driven by hand.
#[derive(Clone, Default)]
pub struct MemoryScroll {
    inner: Rc<ScrollInner>,
}

impl MemoryScroll {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves to `offset` and notifies every listener.
    pub fn scroll_to(&self, offset: f64) {
        self.inner.offset.set(offset);
        let targets: SmallVec<[ScrollListener; 4]> = self
            .inner
            .listeners
            .borrow()
            .values()
            .map(|(_, l)| l.clone())
            .collect();
        for listener in targets {
            listener(offset);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    pub fn passive_listener_count(&self) -> usize {
        self.inner
            .listeners
            .borrow()
            .values()
            .filter(|(opts, _)| opts.passive)
            .count()
    }
}

impl ScrollSource for MemoryScroll {
    fn offset(&self) -> f64 {
        self.inner.offset.get()
    }

    fn subscribe(&self, options: ListenerOptions, listener: Rc<dyn Fn(f64)>) -> Dispose {
        let id = self.inner.listeners.borrow_mut().insert((options, listener));
        let weak = Rc::downgrade(&self.inner);
        Dispose::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.listeners.borrow_mut().remove(id);
            }
        })
    }
}
