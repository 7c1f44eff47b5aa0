//! # Display formatting
//!
//! Pure helpers that turn numbers, instants and identifiers into text for
//! the UI. Nothing here holds state.
//!
//! ```rust
//! use veneer_format::*;
//!
//! assert_eq!(format_inr(2500.0), "₹2,500.00");
//! assert_eq!(format_percentage_default(0.1234), "12.3%");
//! assert_eq!(slug_to_string("hello-world"), "Hello World");
//! assert_eq!(
//!     construct_utc_format("2025-08-16T11:00:00Z", UtcMode::Iso).unwrap(),
//!     "2025-08-16T11:00:00.000Z"
//! );
//! ```
//!
//! Date functions return `Err(DateError::InvalidDate)` for input that does
//! not name an instant; the number functions are total.

pub mod date;
pub mod locale;
pub mod number;
pub mod text;

pub use date::*;
pub use number::*;
pub use text::*;
