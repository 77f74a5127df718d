//! Type descriptors and value translation.
//!
//! - [`schema`]: type handles, the marker layer, the value model and the
//!   descriptor engine.
//! - [`format`]: translators, format registries and the structured (JSON)
//!   reader and writer.
//! - [`utils`]: shared hashing utilities.
//!
//! Each layer has its own error types; [`Error`] gathers them for callers
//! that do not care which layer failed.
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use ts_format as format;
pub use ts_schema as schema;
pub use ts_utils as utils;

use thiserror::Error;

/// Any error raised by the tessera crates.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Config(#[from] schema::ConfigError),

    #[error(transparent)]
    Access(#[from] schema::AccessError),

    #[error(transparent)]
    Conversion(#[from] schema::ConversionError),

    #[error(transparent)]
    Hook(#[from] schema::HookError),

    #[error(transparent)]
    Lookup(#[from] format::LookupError),

    #[error(transparent)]
    Structured(#[from] format::StructuredError),
}
