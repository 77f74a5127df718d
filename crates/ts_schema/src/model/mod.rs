//! The marker-layer model: what a host type exposes to the engine.
//!
//! ## Menu
//!
//! - [`ClassModel`]: type marker, parent link, factory, hooks and members of a class.
//! - [`Member`]: one declared member with its declared type, site and optional marker.
//! - [`TypeMarker`] / [`FieldMarker`]: participation flags, display names, and
//!   explicit alternative types.
//! - [`MarkerSource`]: the query interface the engine consumes; [`ModelMarkers`]
//!   reads the markers embedded in the models.
//! - [`Hook`] / [`Hooks`]: post-construction and validation callbacks.
//! - [`Upcast`] / [`ParentLink`]: how a child reaches its embedded parent.

// -----------------------------------------------------------------------------
// Modules

mod class;
mod hook;
mod marker;

// -----------------------------------------------------------------------------
// Exports

pub use class::{ClassModel, Factory, Member, ParentLink, Upcast};
pub use hook::{Hook, Hooks};
pub use marker::{FieldMarker, MarkerSource, ModelMarkers, TypeMarker};
