//! Portable names of type handles.

use std::borrow::Cow;

use ts_schema::ConversionError;
use ts_schema::handle::{Terminal, TypeHandle, TypeKind};
use ts_schema::translate::Translator;
use ts_schema::value::Value;
use ts_utils::hash::HashMap;

use crate::impl_null_substitute;

/// The portable name of a type, ignoring nullable layers.
///
/// | handle | name |
/// |---|---|
/// | `i8`, `i16`, `i32`, `u8`, `u16` | `int32` |
/// | `i64`, `u32` | `int64` |
/// | `f32` / `f64` | `float32` / `float64` |
/// | `bool` | `boolean` |
/// | `String` | `string` |
/// | `DateTime<Utc>` | `datetime` |
/// | `Duration` | `period` |
/// | enumerations | `enum` |
///
/// Everything else is `unknown`.
///
/// ```
/// use ts_format::type_name::canonical_type_name;
/// use ts_schema::handle::Typed;
///
/// assert_eq!(canonical_type_name(&Option::<i32>::type_handle()), "int32");
/// assert_eq!(canonical_type_name(&Vec::<i32>::type_handle()), "unknown");
/// ```
pub fn canonical_type_name(handle: &TypeHandle) -> &'static str {
    match handle.non_null().kind() {
        TypeKind::Terminal(terminal) => match terminal {
            Terminal::Int32 => "int32",
            Terminal::Int64 => "int64",
            Terminal::Float32 => "float32",
            Terminal::Float64 => "float64",
            Terminal::Bool => "boolean",
            Terminal::Text => "string",
            Terminal::DateTime => "datetime",
            Terminal::Period => "period",
            Terminal::Identifier | Terminal::Bytes => "unknown",
        },
        TypeKind::Enum(_) => "enum",
        _ => "unknown",
    }
}

/// Writes a [`Value::Type`] as its portable name.
///
/// Overrides take precedence, which is how an enumeration gets a name of
/// its own instead of `enum`.
#[derive(Debug, Clone, Default)]
pub struct TypeNameTranslator {
    overrides: HashMap<TypeHandle, Cow<'static, str>>,
    null: Value,
}

impl TypeNameTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names `handle` (without nullable layers) `name`.
    pub fn with_override(mut self, handle: &TypeHandle, name: impl Into<Cow<'static, str>>) -> Self {
        self.overrides.insert(handle.non_null(), name.into());
        self
    }

    /// The name written for `handle`.
    pub fn name_of(&self, handle: &TypeHandle) -> Cow<'static, str> {
        match self.overrides.get(&handle.non_null()) {
            Some(name) => name.clone(),
            None => Cow::Borrowed(canonical_type_name(handle)),
        }
    }
}

impl Translator for TypeNameTranslator {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(self.null.clone()),
            Value::Type(handle) => Ok(Value::Text(self.name_of(&handle).into_owned())),
            other => Err(other.unexpected("type")),
        }
    }
}

impl_null_substitute!(TypeNameTranslator);
