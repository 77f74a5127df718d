use thiserror::Error;
use ts_schema::{AccessError, ConfigError, ConversionError};

// -----------------------------------------------------------------------------
// LookupError

/// A registry has nothing for the requested type.
///
/// This is a configuration error of the caller: the type was never
/// registered, or the field cannot be served by a single translator pair.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LookupError {
    #[error("no {format} translator registered for `{ty}`")]
    NotRegistered { format: &'static str, ty: String },

    #[error("no pattern registered for `{ty}`")]
    NoPattern { ty: String },

    #[error("pattern of `{ty}` does not compile: {reason}")]
    InvalidPattern { ty: String, reason: String },

    #[error("field `{field}` accepts more than one value type")]
    Polymorphic { field: String },
}

// -----------------------------------------------------------------------------
// StructuredError

/// Reading or writing a structured (JSON) document failed.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum StructuredError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error("`{name}` does not name a legal type here")]
    UnknownType { name: String },

    #[error("type `{ty}` has no structural description")]
    NotDescribed { ty: String },

    #[error("expected {expected}, found {found}")]
    Shape { expected: &'static str, found: String },
}

impl StructuredError {
    #[cold]
    pub(crate) fn shape(expected: &'static str, found: &serde_json::Value) -> Self {
        let found = match found {
            serde_json::Value::Null => "null",
            serde_json::Value::Bool(_) => "a boolean",
            serde_json::Value::Number(_) => "a number",
            serde_json::Value::String(_) => "a string",
            serde_json::Value::Array(_) => "an array",
            serde_json::Value::Object(_) => "an object",
        };
        Self::Shape {
            expected,
            found: found.to_owned(),
        }
    }
}
