//! Data sites: uniform get/set access to one member of an instance.
//!
//! ## Menu
//!
//! - [`DataSite`]: the access trait.
//! - [`FieldSite`]: a site over plain field accessors.
//! - [`InheritedSite`]: a parent's site re-targeted at a child class.
//! - [`TranslatedDataSite`]: a site whose values pass through translators.

// -----------------------------------------------------------------------------
// Modules

mod field;
mod inherited;
mod translated;

// -----------------------------------------------------------------------------
// Exports

pub use field::FieldSite;
pub use inherited::InheritedSite;
pub use translated::TranslatedDataSite;

// -----------------------------------------------------------------------------
// DataSite

use core::any::Any;
use core::fmt;

use crate::AccessError;
use crate::value::Value;

/// Access to one member of an instance.
///
/// Sites never lock and never swallow failures: an instance of the wrong
/// type, a write to a read-only member and an unconvertible value are all
/// reported as [`AccessError`]s.
pub trait DataSite: Send + Sync + fmt::Debug {
    /// The member name this site reads and writes.
    fn name(&self) -> &str;

    fn get(&self, instance: &dyn Any) -> Result<Value, AccessError>;

    fn set(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError>;

    fn is_read_only(&self) -> bool;
}
