//! Small shared utilities for the tessera crates.
//!
//! - [`hash`]: fixed and pass-through hash states, plus a `HashMap` alias
//!   over *hashbrown* using the fixed one.
//! - [`TypeIdMap`]: a map keyed by [`TypeId`](core::any::TypeId) that skips rehashing.

#![no_std]

// -----------------------------------------------------------------------------
// Modules

mod typeid_map;

pub mod hash;

// -----------------------------------------------------------------------------
// Top-level exports

pub use typeid_map::TypeIdMap;
