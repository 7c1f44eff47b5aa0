//! Stateful UI hooks built on `veneer-core`.
//!
//! - [`scroll`] — `remember_scroll_threshold`: a flag that flips once the
//!   page scrolls past a pixel offset.
//! - [`persisted`] — `remember_persisted_state`: state mirrored into the
//!   platform key/value store and kept in step with other open contexts.
//!
//! Both read their services from [`veneer_core::platform()`], so wrap the
//! composition in `with_platform` to choose the backend.

pub mod persisted;
pub mod scroll;

pub use persisted::{Persist, PersistedState, SetAction, remember_persisted_state};
pub use scroll::{ScrollThreshold, remember_scroll_threshold, remember_scroll_threshold_with_key};
