//! # Scroll threshold
//!
//! `remember_scroll_threshold(t)` answers one question: has the page been
//! scrolled further than `t` pixels? Typical use is a header that gains a
//! shadow once content slides under it.
//!
//! ```rust
//! use veneer_core::*;
//! use veneer_hooks::scroll::remember_scroll_threshold;
//!
//! let scroll = MemoryScroll::new();
//! let platform = Platform::memory_with(MemoryStorage::new(), scroll.clone());
//! let comp = Composition::new();
//!
//! let header = with_platform(platform, || comp.compose(|| remember_scroll_threshold(80.0)));
//! assert!(!header.is_past());
//! scroll.scroll_to(81.0);
//! assert!(header.is_past());
//! ```
//!
//! The listener is registered passive, is replaced when the threshold
//! changes between compositions and is removed when the composition is
//! disposed. Subscribers of [`ScrollThreshold::signal`] only hear about
//! actual flips of the flag.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use veneer_core::*;

pub struct ScrollThreshold {
    past: Signal<bool>,
    threshold: Cell<f64>,
    // Outside a composition nothing else runs the guard.
    subscription: RefCell<Option<Dispose>>,
}

fn sanitize(offset: f64) -> f64 {
    if offset.is_finite() && offset > 0.0 {
        offset
    } else {
        0.0
    }
}

impl ScrollThreshold {
    pub fn new(threshold: f64) -> Self {
        Self {
            past: signal(false),
            threshold: Cell::new(threshold),
            subscription: RefCell::new(None),
        }
    }

    /// `true` exactly when the last seen offset is greater than the threshold.
    pub fn is_past(&self) -> bool {
        self.past.get()
    }

    pub fn signal(&self) -> Signal<bool> {
        self.past.clone()
    }

    pub fn threshold(&self) -> f64 {
        self.threshold.get()
    }

    /// Starts tracking `source` against `threshold`, replacing any earlier
    /// listener. The flag is brought up to date immediately. The returned
    /// guard removes the listener; dropping the handle does too.
    pub fn attach(&self, source: &dyn ScrollSource, threshold: f64) -> Dispose {
        self.threshold.set(threshold);
        self.past.set_if_changed(sanitize(source.offset()) > threshold);

        let past = self.past.clone();
        let guard = source.subscribe(
            ListenerOptions::PASSIVE,
            Rc::new(move |offset| {
                past.set_if_changed(sanitize(offset) > threshold);
            }),
        );
        let previous = self.subscription.replace(Some(guard.clone()));
        if let Some(previous) = previous {
            previous.run();
        }
        guard
    }
}

impl Drop for ScrollThreshold {
    fn drop(&mut self) {
        if let Some(guard) = self.subscription.get_mut().take() {
            guard.run();
        }
    }
}

/// Scroll flag bound to the current composition and platform.
pub fn remember_scroll_threshold(threshold: f64) -> Rc<ScrollThreshold> {
    remember_scroll_threshold_with_key("default", threshold)
}

/// Same as [`remember_scroll_threshold`], for compositions that watch more
/// than one threshold.
pub fn remember_scroll_threshold_with_key(key: &str, threshold: f64) -> Rc<ScrollThreshold> {
    let source = platform().scroll;
    let state = remember_with_key(format!("scroll_threshold:{key}"), || {
        ScrollThreshold::new(threshold)
    });

    disposable_effect(format!("scroll_threshold:{key}"), threshold.to_bits(), {
        let state = state.clone();
        move || {
            log::trace!("scroll_threshold: watching offset > {threshold}");
            state.attach(&*source, threshold)
        }
    });

    state
}
