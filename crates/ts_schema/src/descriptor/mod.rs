//! Structural descriptions of types and their fields.
//!
//! ## Menu
//!
//! - [`TypeDescriptor`]: one described type and its frozen field table.
//! - [`FieldDescriptor`]: one exposed member, with its declaring and
//!   containing types.
//! - [`FieldValue`] / [`TypeSet`] / [`ValueType`]: the legal value (and
//!   key) types of a field.
//! - [`ValueCategory`]: object, collection or map.

mod category;
mod field;
mod type_desc;
mod value_type;

pub use category::ValueCategory;
pub use field::FieldDescriptor;
pub use type_desc::TypeDescriptor;
pub use value_type::{FieldValue, TypeSet, ValueType};
