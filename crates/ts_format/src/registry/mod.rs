//! Per-format translator registries.
//!
//! ## Menu
//!
//! - [`TranslatorRegistry`]: handle to [`TranslatorPair`], for one [`Format`].
//! - [`Text`] / [`Binary`]: the formats.
//! - [`PatternRegistry`]: handle to a regular-expression fragment.
//!
//! Both registries read a lock-free snapshot. Registration and lazy
//! enumeration entries are written under a mutex, re-checking the
//! snapshot first, so two threads never synthesize the same entry twice.

// -----------------------------------------------------------------------------
// Modules

mod format;
mod pattern;
mod translators;

// -----------------------------------------------------------------------------
// Exports

pub use format::{Binary, Format, Text, TranslatorPair, terminal_handles};
pub use pattern::PatternRegistry;
pub use translators::TranslatorRegistry;
