//! Common utility for extended `std` types
//!
//! These are left public for convenience.
//!
//! For example, prettier formatting for scientific numbers and tolerant float
//! comparisons are useful everywhere, from printing points to checking chi
//! normalisation.

// Alias for the format! macro
pub use std::format as f;

// Modules
mod option_ext;
mod value_ext;

// Flatten
pub use option_ext::OptionExt;
pub use value_ext::ValueExt;
