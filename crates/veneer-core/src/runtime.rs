use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::scope::Scope;

thread_local! {
    static COMPOSER: RefCell<Vec<Rc<SlotTable>>> = const { RefCell::new(Vec::new()) };
}

#[derive(Default)]
struct SlotTable {
    keyed: RefCell<HashMap<String, Box<dyn Any>>>,
}

/// A mounted piece of UI: keyed `remember` slots plus the scope that owns
/// every listener installed while composing it.
///
/// Calling [`Composition::compose`] again is a recomposition (slots are
/// reused); [`Composition::dispose`] is the unmount.
pub struct Composition {
    slots: Rc<SlotTable>,
    scope: Scope,
}

impl Default for Composition {
    fn default() -> Self {
        Self::new()
    }
}

impl Composition {
    pub fn new() -> Self {
        Self {
            slots: Rc::new(SlotTable::default()),
            scope: Scope::new(),
        }
    }

    pub fn compose<R>(&self, f: impl FnOnce() -> R) -> R {
        if self.scope.is_disposed() {
            log::warn!("compose: composition was already disposed; listeners will not be kept");
        }
        COMPOSER.with(|c| c.borrow_mut().push(self.slots.clone()));
        let result = self.scope.run(f);
        COMPOSER.with(|c| c.borrow_mut().pop());
        result
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn dispose(&self) {
        self.scope.dispose();
        let slots = std::mem::take(&mut *self.slots.keyed.borrow_mut());
        drop(slots);
    }
}

impl Drop for Composition {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Key-based remember.
///
/// Outside a composition there is nowhere to keep the value, so `init` runs
/// on every call.
pub fn remember_with_key<T: 'static>(key: impl Into<String>, init: impl FnOnce() -> T) -> Rc<T> {
    let key = key.into();
    let Some(table) = COMPOSER.with(|c| c.borrow().last().cloned()) else {
        log::debug!("remember_with_key: '{key}' outside of a composition");
        return Rc::new(init());
    };

    if let Some(existing) = table.keyed.borrow().get(&key) {
        if let Some(rc) = existing.downcast_ref::<Rc<T>>() {
            return rc.clone();
        }
        log::warn!("remember_with_key: key '{key}' reused with a different type; replacing.");
    }

    // `init` may itself remember nested values, so no borrow is held here.
    let rc: Rc<T> = Rc::new(init());
    table.keyed.borrow_mut().insert(key, Box::new(rc.clone()));
    rc
}

pub fn remember_state_with_key<T: 'static>(
    key: impl Into<String>,
    init: impl FnOnce() -> T,
) -> Rc<RefCell<T>> {
    remember_with_key(key, || RefCell::new(init()))
}
