//! # State, Signals, and Effects
//!
//! Veneer's hooks sit on a small reactive core. There are four pieces:
//!
//! - `Signal<T>` — observable, reactive value.
//! - `remember_with_key` — storage bound to a `Composition`.
//! - `effect` / `disposable_effect` — side‑effects with cleanup.
//! - `Platform` — the services (storage, scroll, diagnostics) hooks talk to.
//!
//! ## Signals
//!
//! `Signal<T>` is a cloneable handle to a piece of state:
//!
//! ```rust
//! use veneer_core::*;
//!
//! let count = signal(0);
//! count.set(1);
//! count.update(|v| *v += 1);
//! assert_eq!(count.get(), 2);
//! ```
//!
//! `subscribe` returns a `SubId`; `unsubscribe` removes that listener.
//! `set_if_changed` skips notification when the value is equal.
//!
//! ## Remembered state
//!
//! A `Composition` is one mounted piece of UI. Calling `compose` again is a
//! recomposition: keyed slots survive, so the same handle comes back.
//!
//! ```rust
//! use veneer_core::*;
//!
//! let comp = Composition::new();
//! let a = comp.compose(|| remember_with_key("count", || signal(0)));
//! a.set(5);
//! let b = comp.compose(|| remember_with_key("count", || signal(0)));
//! assert_eq!(b.get(), 5);
//! ```
//!
//! ## Effects and cleanup
//!
//! `effect` runs once and registers its `Dispose` guard with the current
//! scope. `disposable_effect` reruns when its key changes, cleaning up the
//! previous run first. Disposing the composition runs every pending cleanup:
//!
//! ```rust
//! use veneer_core::*;
//!
//! let comp = Composition::new();
//! comp.compose(|| {
//!     effect(|| {
//!         log::info!("mounted");
//!         on_unmount(|| log::info!("unmounted"))
//!     });
//! });
//! comp.dispose();
//! ```

pub mod diagnostics;
pub mod effects;
pub mod error;
pub mod locals;
pub mod memory;
pub mod platform;
pub mod prelude;
pub mod runtime;
pub mod scope;
pub mod signal;
mod tests;

pub use diagnostics::*;
pub use effects::*;
pub use error::*;
pub use locals::*;
pub use memory::*;
pub use platform::*;
pub use prelude::*;
pub use runtime::*;
pub use scope::*;
pub use signal::*;
