use std::cell::RefCell;
use std::rc::Rc;

use crate::remember_with_key;
use crate::scope::current_scope;

#[derive(Clone)]
pub struct Dispose(Rc<RefCell<Option<Box<dyn FnOnce()>>>>);

impl Dispose {
    pub fn new(f: impl FnOnce() + 'static) -> Self {
        Self(Rc::new(RefCell::new(Some(Box::new(f)))))
    }

    /// A guard with nothing to release.
    pub fn noop() -> Self {
        Self(Rc::new(RefCell::new(None)))
    }

    /// Runs at most once (safe to call multiple times).
    pub fn run(&self) {
        let f = self.0.borrow_mut().take();
        if let Some(f) = f {
            f()
        }
    }

    pub fn is_spent(&self) -> bool {
        self.0.borrow().is_none()
    }
}

impl std::fmt::Debug for Dispose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispose")
            .field("spent", &self.is_spent())
            .finish()
    }
}

/// Runs `f()` immediately and returns its `Dispose`.
pub fn effect<F>(f: F) -> Dispose
where
    F: FnOnce() -> Dispose + 'static,
{
    let d = f();

    // auto-register cleanup in the current scope if one exists
    if let Some(scope) = current_scope() {
        let d2 = d.clone();
        scope.add_disposer(move || d2.run());
    }

    d
}

/// Helper to register cleanup inside effect.
pub fn on_unmount(f: impl FnOnce() + 'static) -> Dispose {
    Dispose::new(f)
}

struct KeyedEffect<K> {
    last_key: Option<K>,
    cleanup: Option<Dispose>,
}

/// Runs `effect` on first composition and again whenever `key` changes,
/// running the previous cleanup first. The last cleanup runs when the
/// owning scope is disposed.
///
/// `slot` identifies the call site inside the current composition.
pub fn disposable_effect<K: PartialEq + Clone + 'static>(
    slot: impl Into<String>,
    key: K,
    effect: impl FnOnce() -> Dispose + 'static,
) {
    let slot = slot.into();
    let state = remember_with_key(format!("disposable:{slot}"), || {
        let state = Rc::new(RefCell::new(KeyedEffect::<K> {
            last_key: None,
            cleanup: None,
        }));
        if let Some(scope) = current_scope() {
            let state = state.clone();
            scope.add_disposer(move || {
                let cleanup = state.borrow_mut().cleanup.take();
                if let Some(d) = cleanup {
                    d.run();
                }
            });
        }
        state
    });

    let changed = state.borrow().last_key.as_ref() != Some(&key);
    if !changed {
        return;
    }

    let previous = {
        let mut s = state.borrow_mut();
        s.last_key = Some(key);
        s.cleanup.take()
    };
    if let Some(d) = previous {
        d.run();
    }

    let d = effect();
    state.borrow_mut().cleanup = Some(d);
}
