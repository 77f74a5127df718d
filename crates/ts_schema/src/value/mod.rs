//! The dynamic value model flowing through data sites and translators.
//!
//! ## Menu
//!
//! - [`Value`]: a dynamically shaped value.
//! - [`EnumValue`]: an enumeration label, by handle and ordinal.
//! - [`ObjectValue`] / [`Instance`]: a boxed host instance, also the root type.
//! - [`ToValue`] / [`FromValue`]: conversions between host values and [`Value`].
//! - [`ByteBuf`]: an owned byte sequence with its own terminal handle.
//! - [`Labeled`]: host enumerations, usually implemented by [`impl_labeled!`](crate::impl_labeled).

// -----------------------------------------------------------------------------
// Modules

mod convert;
mod object;

// -----------------------------------------------------------------------------
// Exports

pub use convert::{FromValue, ToValue};
pub use object::{Instance, ObjectValue};

// -----------------------------------------------------------------------------
// Value

use core::fmt;
use core::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ConversionError;
use crate::handle::{TypeHandle, Typed};

/// A dynamically shaped value.
///
/// Maps are ordered lists of pairs, so any value may be a key and the
/// order of an external form survives a round trip.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Text(String),
    Bytes(Vec<u8>),
    Identifier(Uuid),
    DateTime(DateTime<Utc>),
    Period(Duration),
    Enum(EnumValue),
    List(Vec<Value>),
    Map(Vec<(Value, Value)>),
    Object(ObjectValue),
    Type(TypeHandle),
}

impl Value {
    /// A short name of the variant, used in error messages.
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int32(_) => "int32",
            Self::Int64(_) => "int64",
            Self::Float32(_) => "float32",
            Self::Float64(_) => "float64",
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Identifier(_) => "identifier",
            Self::DateTime(_) => "datetime",
            Self::Period(_) => "period",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Map(_) => "map",
            Self::Object(_) => "object",
            Self::Type(_) => "type",
        }
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Builds the [`ConversionError`] for a value that is not `expected`.
    #[cold]
    pub fn unexpected(&self, expected: &'static str) -> ConversionError {
        ConversionError::UnexpectedValue {
            expected,
            found: self.kind_name(),
        }
    }

    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Takes the text out of a `Text` value.
    pub fn into_text(self) -> Result<String, ConversionError> {
        match self {
            Self::Text(text) => Ok(text),
            other => Err(other.unexpected("text")),
        }
    }

    /// Takes the elements out of a `List` value.
    pub fn into_list(self) -> Result<Vec<Value>, ConversionError> {
        match self {
            Self::List(items) => Ok(items),
            other => Err(other.unexpected("list")),
        }
    }

    /// Takes the entries out of a `Map` value.
    pub fn into_map(self) -> Result<Vec<(Value, Value)>, ConversionError> {
        match self {
            Self::Map(entries) => Ok(entries),
            other => Err(other.unexpected("map")),
        }
    }
}

impl From<&str> for Value {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for Value {
    #[inline]
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

// -----------------------------------------------------------------------------
// EnumValue

/// An enumeration value: the enum's handle and the label's ordinal.
#[derive(Clone, PartialEq, Eq)]
pub struct EnumValue {
    handle: TypeHandle,
    ordinal: usize,
}

impl EnumValue {
    /// Fails if `handle` is not an enum or `ordinal` is out of range.
    pub fn new(handle: TypeHandle, ordinal: usize) -> Result<Self, ConversionError> {
        let labels = handle.labels();
        if ordinal < labels.len() {
            Ok(Self { handle, ordinal })
        } else {
            Err(ConversionError::OutOfRange {
                value: ordinal.to_string(),
                target: "enum ordinal",
            })
        }
    }

    /// Looks a label up by its exact text.
    pub fn from_label(handle: TypeHandle, label: &str) -> Result<Self, ConversionError> {
        match handle.labels().iter().position(|l| *l == label) {
            Some(ordinal) => Ok(Self { handle, ordinal }),
            None => Err(ConversionError::UnknownLabel {
                ty: handle.path().to_owned(),
                label: label.to_owned(),
            }),
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    #[inline]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// The canonical label text.
    pub fn label(&self) -> &'static str {
        // ordinal was range-checked on construction
        self.handle.labels().get(self.ordinal).copied().unwrap_or_default()
    }
}

impl fmt::Debug for EnumValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.handle.name(), self.label())
    }
}

// -----------------------------------------------------------------------------
// Labeled

/// A host enumeration with fixed, ordered labels.
pub trait Labeled: Typed + Copy + PartialEq {
    /// Labels in ordinal order.
    const LABELS: &'static [&'static str];

    /// Variants in ordinal order.
    const VARIANTS: &'static [Self];

    fn ordinal(self) -> usize {
        Self::VARIANTS.iter().position(|v| *v == self).unwrap_or_default()
    }

    fn from_ordinal(ordinal: usize) -> Option<Self> {
        Self::VARIANTS.get(ordinal).copied()
    }

    fn label(self) -> &'static str {
        Self::LABELS.get(self.ordinal()).copied().unwrap_or_default()
    }
}

/// Implements [`Typed`], [`Labeled`], [`ToValue`] and [`FromValue`] for a
/// fieldless enum.
///
/// # Examples
///
/// ```
/// use ts_schema::impl_labeled;
/// use ts_schema::value::{FromValue, Labeled, ToValue};
///
/// #[derive(Debug, Clone, Copy, PartialEq)]
/// enum Color { Red, Green }
///
/// impl_labeled!(Color, "demo::Color" { Red => "RED", Green => "GREEN" });
///
/// assert_eq!(Color::Green.label(), "GREEN");
/// assert_eq!(Color::from_value(Color::Red.to_value()).unwrap(), Color::Red);
/// ```
#[macro_export]
macro_rules! impl_labeled {
    ($ty:ty, $path:literal { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $crate::handle::Typed for $ty {
            fn type_handle() -> $crate::handle::TypeHandle {
                $crate::handle::TypeHandle::enumeration::<Self>(
                    $path,
                    <Self as $crate::value::Labeled>::LABELS,
                )
            }
        }

        impl $crate::value::Labeled for $ty {
            const LABELS: &'static [&'static str] = &[$($label),+];
            const VARIANTS: &'static [Self] = &[$(<$ty>::$variant),+];
        }

        impl $crate::value::ToValue for $ty {
            fn to_value(&self) -> $crate::value::Value {
                let handle = <Self as $crate::handle::Typed>::type_handle();
                let ordinal = <Self as $crate::value::Labeled>::ordinal(*self);
                match $crate::value::EnumValue::new(handle, ordinal) {
                    ::core::result::Result::Ok(value) => $crate::value::Value::Enum(value),
                    ::core::result::Result::Err(_) => $crate::value::Value::Null,
                }
            }
        }

        impl $crate::value::FromValue for $ty {
            fn from_value(
                value: $crate::value::Value,
            ) -> ::core::result::Result<Self, $crate::ConversionError> {
                let handle = <Self as $crate::handle::Typed>::type_handle();
                let ordinal = match value {
                    $crate::value::Value::Enum(value) if *value.handle() == handle => value.ordinal(),
                    $crate::value::Value::Text(text) => {
                        $crate::value::EnumValue::from_label(handle, &text)?.ordinal()
                    }
                    other => return ::core::result::Result::Err(other.unexpected("enum")),
                };
                <Self as $crate::value::Labeled>::from_ordinal(ordinal).ok_or_else(|| {
                    $crate::ConversionError::OutOfRange {
                        value: ::std::string::ToString::to_string(&ordinal),
                        target: ::core::any::type_name::<Self>(),
                    }
                })
            }
        }
    };
}

// -----------------------------------------------------------------------------
// ByteBuf

/// An owned byte sequence.
///
/// `Vec<u8>` is a collection of integers; `ByteBuf` is the terminal
/// "bytes" family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteBuf(pub Vec<u8>);

impl From<Vec<u8>> for ByteBuf {
    #[inline]
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl AsRef<[u8]> for ByteBuf {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}
