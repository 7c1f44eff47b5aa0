use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

thread_local! {
    static CURRENT_SCOPE: RefCell<Option<Weak<ScopeInner>>> = const { RefCell::new(None) };
}

/// Owner of cleanups for a piece of UI. Listeners registered by hooks hang
/// off the scope that was current when they were installed.
pub struct Scope {
    inner: Rc<ScopeInner>,
}

struct ScopeInner {
    disposers: RefCell<Vec<Box<dyn FnOnce()>>>,
    children: RefCell<Vec<Scope>>,
    disposed: Cell<bool>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(ScopeInner {
                disposers: RefCell::new(Vec::new()),
                children: RefCell::new(Vec::new()),
                disposed: Cell::new(false),
            }),
        }
    }

    /// Makes this scope current for the duration of `f`.
    pub fn run<R>(&self, f: impl FnOnce() -> R) -> R {
        let prev = CURRENT_SCOPE.with(|current| {
            current
                .borrow_mut()
                .replace(Rc::downgrade(&self.inner))
        });
        let result = f();
        CURRENT_SCOPE.with(|current| *current.borrow_mut() = prev);
        result
    }

    /// Registers a cleanup. On an already disposed scope it runs immediately.
    pub fn add_disposer(&self, disposer: impl FnOnce() + 'static) {
        if self.inner.disposed.get() {
            disposer();
            return;
        }
        self.inner.disposers.borrow_mut().push(Box::new(disposer));
    }

    pub fn child(&self) -> Scope {
        let child = Scope::new();
        self.inner.children.borrow_mut().push(child.clone());
        child
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    /// Disposes children first, then runs this scope's cleanups in reverse
    /// registration order. Idempotent.
    pub fn dispose(&self) {
        self.inner.dispose_now();
    }
}

impl ScopeInner {
    fn dispose_now(&self) {
        if self.disposed.replace(true) {
            return;
        }
        let children = std::mem::take(&mut *self.children.borrow_mut());
        for child in children {
            child.dispose();
        }
        let disposers = std::mem::take(&mut *self.disposers.borrow_mut());
        for disposer in disposers.into_iter().rev() {
            disposer();
        }
    }
}

impl Clone for Scope {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Drop for ScopeInner {
    fn drop(&mut self) {
        self.dispose_now();
    }
}

pub fn current_scope() -> Option<Scope> {
    CURRENT_SCOPE.with(|current| {
        current
            .borrow()
            .as_ref()
            .and_then(|weak| weak.upgrade().map(|inner| Scope { inner }))
    })
}
