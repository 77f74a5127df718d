//! External representations of described values.
//!
//! Everything here is built on the [`Translator`](ts_schema::translate::Translator)
//! trait of `ts_schema`: translators move a [`Value`](ts_schema::value::Value)
//! between its in-memory shape and a text, byte or JSON form without
//! touching the structural model.
//!
//! ## Menu
//!
//! - [`text`]: scalar, enumeration, delimited-list and bracketed-pair text translators.
//! - [`binary`]: fixed-width byte translators.
//! - [`type_name`]: portable names of type handles.
//! - [`registry`]: per-format translator registries and the pattern registry.
//! - [`structured`]: a JSON reader and writer driven by descriptors.
//! - [`translated_site`]: a translating data site for one field.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod site;

pub mod binary;
pub mod registry;
pub mod structured;
pub mod text;
pub mod type_name;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{LookupError, StructuredError};
pub use site::translated_site;

// -----------------------------------------------------------------------------
// Null substitution

/// Adds `with_null` / `null` to translators carrying a `null: Value` field.
///
/// A translator returns its null substitute, [`Value::Null`] unless
/// configured otherwise, for `Null` input.
///
/// [`Value::Null`]: ts_schema::value::Value::Null
macro_rules! impl_null_substitute {
    ($($ty:ty),+ $(,)?) => {$(
        impl $ty {
            /// Replaces the value returned for `Null` input.
            #[inline]
            pub fn with_null(mut self, null: ::ts_schema::value::Value) -> Self {
                self.null = null;
                self
            }

            /// The value returned for `Null` input.
            #[inline]
            pub fn null(&self) -> &::ts_schema::value::Value {
                &self.null
            }
        }
    )+};
}

pub(crate) use impl_null_substitute;
