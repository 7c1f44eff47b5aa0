//! # Persisted state
//!
//! `remember_persisted_state(key, initial)` is remembered state that also
//! lives in the platform key/value store (JSON text), so it survives reloads
//! and follows writes made by other open instances of the app.
//!
//! ```rust
//! use veneer_core::*;
//! use veneer_hooks::persisted::remember_persisted_state;
//!
//! let tab_a = MemoryStorage::new();
//! let tab_b = tab_a.context();
//! let (comp_a, comp_b) = (Composition::new(), Composition::new());
//!
//! let theme_a = with_platform(Platform::memory_with(tab_a, MemoryScroll::new()), || {
//!     comp_a.compose(|| remember_persisted_state("theme", "light".to_string()))
//! });
//! let theme_b = with_platform(Platform::memory_with(tab_b, MemoryScroll::new()), || {
//!     comp_b.compose(|| remember_persisted_state("theme", "light".to_string()))
//! });
//!
//! theme_a.set_value("dark".to_string());
//! assert_eq!(theme_b.get(), "dark");
//! ```
//!
//! Storage problems never reach the caller. Reads that fail or do not decode
//! fall back to the initial value, writes that fail leave the in-memory value
//! updated; both are reported to the platform's `DiagnosticSink`.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use veneer_core::*;

/// Values that can be kept in the store.
pub trait Persist: Serialize + DeserializeOwned + Clone + 'static {}
impl<T> Persist for T where T: Serialize + DeserializeOwned + Clone + 'static {}

/// What a setter call does: replace the value, or derive it from the
/// previous one.
pub enum SetAction<T> {
    Value(T),
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> SetAction<T> {
    pub fn update(f: impl FnOnce(&T) -> T + 'static) -> Self {
        SetAction::Update(Box::new(f))
    }

    fn apply(self, previous: &T) -> T {
        match self {
            SetAction::Value(v) => v,
            SetAction::Update(f) => f(previous),
        }
    }
}

impl<T> From<T> for SetAction<T> {
    fn from(value: T) -> Self {
        SetAction::Value(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for SetAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetAction::Value(v) => f.debug_tuple("Value").field(v).finish(),
            SetAction::Update(_) => f.write_str("Update(..)"),
        }
    }
}

pub struct PersistedState<T: Persist> {
    key: String,
    initial: T,
    value: Signal<T>,
    storage: Rc<dyn KeyValueStore>,
    diagnostics: Rc<dyn DiagnosticSink>,
    subscription: RefCell<Option<Dispose>>,
}

impl<T: Persist> PersistedState<T> {
    /// Reads `key` from `platform.storage` and starts following changes made
    /// by other contexts. Call [`PersistedState::dispose`] (or drop the last
    /// handle) to stop.
    pub fn attach(key: impl Into<String>, initial: T, platform: &Platform) -> Rc<Self> {
        let state = Rc::new(Self {
            key: key.into(),
            value: signal(initial.clone()),
            initial,
            storage: platform.storage.clone(),
            diagnostics: platform.diagnostics.clone(),
            subscription: RefCell::new(None),
        });
        state.value.set(state.read());

        let weak = Rc::downgrade(&state);
        let watched = state.key.clone();
        let guard = platform
            .storage_events
            .subscribe(Rc::new(move |change: &StorageChange| {
                if change.key.as_deref() != Some(watched.as_str()) {
                    return;
                }
                if let Some(state) = weak.upgrade() {
                    log::debug!(
                        "persisted state '{}' changed in {}; reloading",
                        state.key,
                        change.origin
                    );
                    state.value.set(state.read());
                }
            }));
        *state.subscription.borrow_mut() = Some(guard);
        state
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn get(&self) -> T {
        self.value.get()
    }

    pub fn signal(&self) -> Signal<T> {
        self.value.clone()
    }

    /// Updates the in-memory value, then writes it through to the store.
    pub fn set(&self, action: impl Into<SetAction<T>>) {
        let next = self.value.with(|previous| action.into().apply(previous));
        self.value.set(next.clone());
        self.write(&next);
    }

    pub fn set_value(&self, value: T) {
        self.set(SetAction::Value(value));
    }

    pub fn update(&self, f: impl FnOnce(&T) -> T + 'static) {
        self.set(SetAction::update(f));
    }

    /// Deletes the stored entry and goes back to the initial value.
    pub fn remove(&self) {
        if let Err(error) = self.storage.remove_item(&self.key) {
            self.report(Diagnostic::WriteFailed {
                key: self.key.clone(),
                error,
            });
        }
        self.value.set(self.initial.clone());
    }

    /// Stops following other contexts. Idempotent.
    pub fn dispose(&self) {
        let guard = self.subscription.borrow_mut().take();
        if let Some(guard) = guard {
            guard.run();
        }
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.borrow().is_some()
    }

    fn report(&self, diagnostic: Diagnostic) {
        self.diagnostics.report(diagnostic);
    }

    fn read(&self) -> T {
        let text = match self.storage.get_item(&self.key) {
            Ok(Some(text)) => text,
            Ok(None) => return self.initial.clone(),
            Err(error) => {
                self.report(Diagnostic::ReadFailed {
                    key: self.key.clone(),
                    error,
                });
                return self.initial.clone();
            }
        };
        match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                self.report(Diagnostic::DecodeFailed {
                    key: self.key.clone(),
                    message: e.to_string(),
                });
                self.initial.clone()
            }
        }
    }

    fn write(&self, value: &T) {
        let text = match serde_json::to_string(value) {
            Ok(text) => text,
            Err(e) => {
                self.report(Diagnostic::EncodeFailed {
                    key: self.key.clone(),
                    message: e.to_string(),
                });
                return;
            }
        };
        if let Err(error) = self.storage.set_item(&self.key, &text) {
            self.report(Diagnostic::WriteFailed {
                key: self.key.clone(),
                error,
            });
        }
    }
}

impl<T: Persist> Drop for PersistedState<T> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Persisted state bound to the current composition and platform. The
/// change listener is removed when the composition is disposed.
pub fn remember_persisted_state<T: Persist>(key: &str, initial: T) -> Rc<PersistedState<T>> {
    let slot = remember_with_key(format!("persisted:{key}"), || {
        let state = PersistedState::attach(key, initial, &platform());
        let weak = Rc::downgrade(&state);
        effect(move || {
            on_unmount(move || {
                if let Some(state) = weak.upgrade() {
                    state.dispose();
                }
            })
        });
        state
    });
    (*slot).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::collections::BTreeMap;

    #[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        theme: String,
        font_scale: f32,
        pinned: Vec<u32>,
    }

    impl Default for Prefs {
        fn default() -> Self {
            Self {
                theme: "light".into(),
                font_scale: 1.0,
                pinned: Vec::new(),
            }
        }
    }

    struct Tab {
        storage: MemoryStorage,
        sink: Rc<CollectingSink>,
        platform: Platform,
        comp: Composition,
    }

    impl Tab {
        fn new(storage: MemoryStorage) -> Self {
            let sink = Rc::new(CollectingSink::new());
            let platform = Platform::memory_with(storage.clone(), MemoryScroll::new())
                .with_diagnostics(sink.clone());
            Self {
                storage,
                sink,
                platform,
                comp: Composition::new(),
            }
        }

        fn remember<T: Persist>(&self, key: &str, initial: T) -> Rc<PersistedState<T>> {
            with_platform(self.platform.clone(), || {
                self.comp.compose(|| remember_persisted_state(key, initial))
            })
        }
    }

    #[test]
    fn missing_key_uses_initial_value() {
        let tab = Tab::new(MemoryStorage::new());
        let count = tab.remember("count", 7);
        assert_eq!(count.get(), 7);
        assert!(tab.sink.is_empty());
        assert!(tab.storage.is_empty());
    }

    #[test]
    fn value_round_trips_through_a_fresh_instance() {
        let storage = MemoryStorage::new();
        let prefs = Prefs {
            theme: "dark".into(),
            font_scale: 1.25,
            pinned: vec![3, 1],
        };

        let first = Tab::new(storage.clone());
        first.remember("prefs", Prefs::default()).set_value(prefs.clone());
        first.comp.dispose();

        let second = Tab::new(storage);
        assert_eq!(second.remember("prefs", Prefs::default()).get(), prefs);
    }

    #[test]
    fn setter_accepts_value_or_update() {
        let tab = Tab::new(MemoryStorage::new());
        let count = tab.remember("count", 0i64);

        count.set(5i64);
        count.update(|n| n * 3);
        count.set(SetAction::update(|n: &i64| n + 1));

        assert_eq!(count.get(), 16);
        assert_eq!(tab.storage.get_item("count").unwrap().as_deref(), Some("16"));
    }

    #[test]
    fn recomposition_returns_the_same_state() {
        let tab = Tab::new(MemoryStorage::new());
        let a = tab.remember("flag", false);
        let b = tab.remember("flag", true);
        assert!(Rc::ptr_eq(&a, &b));
        assert_eq!(tab.storage.listener_count(), 1);
    }

    #[test]
    fn undecodable_value_falls_back_and_reports() {
        let storage = MemoryStorage::new();
        storage.seed("prefs", "{not json");
        let tab = Tab::new(storage);

        let prefs = tab.remember("prefs", Prefs::default());
        assert_eq!(prefs.get(), Prefs::default());

        let seen = tab.sink.take();
        assert_eq!(seen.len(), 1);
        assert!(matches!(&seen[0], Diagnostic::DecodeFailed { key, .. } if key == "prefs"));
    }

    #[test]
    fn unavailable_storage_falls_back_and_reports() {
        let storage = MemoryStorage::new();
        storage.set_unavailable(true);
        let tab = Tab::new(storage);

        let count = tab.remember("count", 1u8);
        assert_eq!(count.get(), 1);
        count.set(2u8);
        assert_eq!(count.get(), 2);

        assert_eq!(
            tab.sink.take(),
            vec![
                Diagnostic::ReadFailed {
                    key: "count".into(),
                    error: StorageError::Unavailable
                },
                Diagnostic::WriteFailed {
                    key: "count".into(),
                    error: StorageError::Unavailable
                },
            ]
        );
    }

    #[test]
    fn quota_failure_keeps_memory_value() {
        let storage = MemoryStorage::new();
        let tab = Tab::new(storage.clone());
        let note = tab.remember("note", String::new());

        note.set_value("short".into());
        storage.set_quota(Some(16));
        note.set_value("a much longer note than the quota allows".into());

        assert_eq!(note.get(), "a much longer note than the quota allows");
        assert_eq!(storage.get_item("note").unwrap().as_deref(), Some("\"short\""));
        assert!(matches!(
            tab.sink.take().as_slice(),
            [Diagnostic::WriteFailed {
                error: StorageError::QuotaExceeded { .. },
                ..
            }]
        ));
    }

    #[test]
    fn unencodable_value_reports_and_skips_write() {
        let tab = Tab::new(MemoryStorage::new());
        let map = tab.remember("weird", BTreeMap::<(u8, u8), u8>::new());
        let mut next = BTreeMap::new();
        next.insert((1, 2), 3);
        map.set_value(next.clone());

        assert_eq!(map.get(), next);
        assert!(tab.storage.get_item("weird").unwrap().is_none());
        assert!(matches!(
            tab.sink.take().as_slice(),
            [Diagnostic::EncodeFailed { .. }]
        ));
    }

    #[test]
    fn writes_propagate_to_other_contexts() {
        let tab_a = Tab::new(MemoryStorage::new());
        let tab_b = Tab::new(tab_a.storage.context());

        let in_a = tab_a.remember("cart", Vec::<u32>::new());
        let in_b = tab_b.remember("cart", Vec::<u32>::new());
        let other_key = tab_b.remember("other", 0u32);

        let seen_in_b = Rc::new(RefCell::new(Vec::new()));
        let s = seen_in_b.clone();
        in_b.signal().subscribe(move |v: &Vec<u32>| s.borrow_mut().push(v.clone()));

        in_a.set_value(vec![1, 2]);
        in_a.update(|cart| {
            let mut cart = cart.clone();
            cart.push(3);
            cart
        });

        assert_eq!(in_b.get(), vec![1, 2, 3]);
        assert_eq!(*seen_in_b.borrow(), vec![vec![1, 2], vec![1, 2, 3]]);
        assert_eq!(other_key.get(), 0);
    }

    #[test]
    fn last_writer_wins_across_contexts() {
        let tab_a = Tab::new(MemoryStorage::new());
        let tab_b = Tab::new(tab_a.storage.context());
        let in_a = tab_a.remember("mode", "a".to_string());
        let in_b = tab_b.remember("mode", "a".to_string());

        in_a.set_value("from a".into());
        in_b.set_value("from b".into());

        assert_eq!(in_a.get(), "from b");
        assert_eq!(in_b.get(), "from b");
    }

    #[test]
    fn external_garbage_resets_to_initial() {
        let tab_a = Tab::new(MemoryStorage::new());
        let tab_b = Tab::new(tab_a.storage.context());
        let in_b = tab_b.remember("n", 10);
        in_b.set_value(11);

        tab_a.storage.set_item("n", "oops").unwrap();
        assert_eq!(in_b.get(), 10);
        assert_eq!(tab_b.sink.len(), 1);
    }

    #[test]
    fn disposal_stops_synchronization() {
        let tab_a = Tab::new(MemoryStorage::new());
        let tab_b = Tab::new(tab_a.storage.context());
        let in_a = tab_a.remember("n", 0);
        let in_b = tab_b.remember("n", 0);

        tab_b.comp.dispose();
        assert!(!in_b.is_attached());
        assert_eq!(tab_a.storage.listener_count(), 1);

        in_a.set_value(9);
        assert_eq!(in_b.get(), 0);
    }

    #[test]
    fn remove_resets_to_initial_everywhere() {
        let tab_a = Tab::new(MemoryStorage::new());
        let tab_b = Tab::new(tab_a.storage.context());
        let in_a = tab_a.remember("n", 1);
        let in_b = tab_b.remember("n", 1);

        in_a.set_value(5);
        assert_eq!(in_b.get(), 5);
        in_a.remove();

        assert_eq!(in_a.get(), 1);
        assert_eq!(in_b.get(), 1);
        assert!(tab_a.storage.get_item("n").unwrap().is_none());
    }

    #[test]
    fn attach_works_without_a_composition() {
        let storage = MemoryStorage::new();
        storage.seed("volume", "0.5");
        let platform = Platform::memory_with(storage.clone(), MemoryScroll::new());

        let volume = PersistedState::attach("volume", 1.0f64, &platform);
        assert_eq!(volume.get(), 0.5);
        assert_eq!(storage.listener_count(), 1);

        drop(volume);
        assert_eq!(storage.listener_count(), 0);
    }
}
