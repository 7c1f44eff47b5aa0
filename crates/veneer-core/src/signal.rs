use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};
use smallvec::SmallVec;

new_key_type! {
    /// Handle returned by [`Signal::subscribe`].
    pub struct SubId;
}

type Subscriber<T> = Rc<dyn Fn(&T)>;

pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: SlotMap<SubId, Subscriber<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: 'static> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: SlotMap::with_key(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Borrow the current value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, v: T)
    where
        T: Clone,
    {
        self.0.borrow_mut().value = v;
        self.notify();
    }

    /// Stores `v` only when it differs from the current value.
    /// Returns `true` if subscribers were notified.
    pub fn set_if_changed(&self, v: T) -> bool
    where
        T: Clone + PartialEq,
    {
        {
            let mut inner = self.0.borrow_mut();
            if inner.value == v {
                return false;
            }
            inner.value = v;
        }
        self.notify();
        true
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) -> SubId {
        self.0.borrow_mut().subs.insert(Rc::new(f))
    }

    pub fn unsubscribe(&self, id: SubId) -> bool {
        self.0.borrow_mut().subs.remove(id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.0.borrow().subs.len()
    }

    // Subscribers run outside the borrow so they may read or write this signal.
    fn notify(&self)
    where
        T: Clone,
    {
        let (value, subs) = {
            let inner = self.0.borrow();
            let subs: SmallVec<[Subscriber<T>; 4]> = inner.subs.values().cloned().collect();
            (inner.value.clone(), subs)
        };
        for s in subs {
            s(&value);
        }
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
