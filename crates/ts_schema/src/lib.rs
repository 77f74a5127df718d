//! Structural descriptions of host types.
//!
//! Types opt in through a [`ClassModel`](model::ClassModel) carrying
//! markers; a [`DescriptorEngine`](engine::DescriptorEngine) turns marked
//! types into cached [`TypeDescriptor`](descriptor::TypeDescriptor)s whose
//! fields read and write instances through [`DataSite`](site::DataSite)s.
//!
//! ## Menu
//!
//! - [`handle`]: interned type identities.
//! - [`model`]: the marker layer, as declared by host types.
//! - [`value`]: the dynamic value model.
//! - [`descriptor`]: type and field descriptors.
//! - [`engine`]: descriptor generation and caching.
//! - [`site`]: member access, optionally through translators.
//! - [`translate`]: the [`Translator`](translate::Translator) trait.
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Modules

mod error;
mod impls;

pub mod descriptor;
pub mod engine;
pub mod handle;
pub mod model;
pub mod site;
pub mod translate;
pub mod value;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use error::{AccessError, ConfigError, ConversionError, HookError};
