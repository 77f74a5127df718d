use core::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::ConversionError;
use crate::value::{ByteBuf, ObjectValue, Value};

/// Converts a host value into a [`Value`].
pub trait ToValue {
    fn to_value(&self) -> Value;
}

/// Rebuilds a host value from a [`Value`].
pub trait FromValue: Sized {
    fn from_value(value: Value) -> Result<Self, ConversionError>;
}

impl ToValue for Value {
    #[inline]
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(value)
    }
}

impl ToValue for ObjectValue {
    fn to_value(&self) -> Value {
        Value::Object(self.clone())
    }
}

impl FromValue for ObjectValue {
    /// Accepts any non-null value: objects are taken as they are, terminal
    /// values are boxed with their natural host type.
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        Ok(match value {
            Value::Object(object) => object,
            Value::Bool(v) => ObjectValue::new(v),
            Value::Int32(v) => ObjectValue::new(v),
            Value::Int64(v) => ObjectValue::new(v),
            Value::Float32(v) => ObjectValue::new(v),
            Value::Float64(v) => ObjectValue::new(v),
            Value::Text(v) => ObjectValue::new(v),
            Value::Bytes(v) => ObjectValue::new(ByteBuf(v)),
            Value::Identifier(v) => ObjectValue::new(v),
            Value::DateTime(v) => ObjectValue::new(v),
            Value::Period(v) => ObjectValue::new(v),
            Value::List(items) => ObjectValue::new(
                items
                    .into_iter()
                    .map(ObjectValue::from_value)
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            other @ (Value::Null | Value::Enum(_) | Value::Map(_) | Value::Type(_)) => {
                return Err(other.unexpected("object"));
            }
        })
    }
}

impl ObjectValue {
    /// Returns the terminal value a boxed host terminal stands for.
    ///
    /// The inverse of [`FromValue`] for terminals. A boxed list comes back as
    /// a list of its boxed items. `None` for every other instance.
    pub fn unboxed(&self) -> Option<Value> {
        if let Some(v) = self.downcast_ref::<bool>() {
            return Some(Value::Bool(*v));
        }
        if let Some(v) = self.downcast_ref::<i32>() {
            return Some(Value::Int32(*v));
        }
        if let Some(v) = self.downcast_ref::<i64>() {
            return Some(Value::Int64(*v));
        }
        if let Some(v) = self.downcast_ref::<f32>() {
            return Some(Value::Float32(*v));
        }
        if let Some(v) = self.downcast_ref::<f64>() {
            return Some(Value::Float64(*v));
        }
        if let Some(v) = self.downcast_ref::<String>() {
            return Some(Value::Text(v.clone()));
        }
        if let Some(v) = self.downcast_ref::<ByteBuf>() {
            return Some(Value::Bytes(v.0.clone()));
        }
        if let Some(v) = self.downcast_ref::<Uuid>() {
            return Some(Value::Identifier(*v));
        }
        if let Some(v) = self.downcast_ref::<DateTime<Utc>>() {
            return Some(Value::DateTime(*v));
        }
        if let Some(v) = self.downcast_ref::<Duration>() {
            return Some(Value::Period(*v));
        }
        self.downcast_ref::<Vec<ObjectValue>>()
            .map(|items| Value::List(items.iter().cloned().map(Value::Object).collect()))
    }
}

/// Implements [`ToValue`] and [`FromValue`] for a host class through
/// [`ObjectValue`].
///
/// The type must implement [`Instance`](crate::value::Instance), which
/// every `Typed + Clone + PartialEq + Debug` type does.
#[macro_export]
macro_rules! impl_class_value {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::value::ToValue for $ty {
            fn to_value(&self) -> $crate::value::Value {
                $crate::value::Value::Object($crate::value::ObjectValue::new(
                    ::core::clone::Clone::clone(self),
                ))
            }
        }

        impl $crate::value::FromValue for $ty {
            fn from_value(
                value: $crate::value::Value,
            ) -> ::core::result::Result<Self, $crate::ConversionError> {
                match value {
                    $crate::value::Value::Object(object) => object.take::<Self>().map_err(|object| {
                        $crate::ConversionError::WrongObject {
                            expected: ::std::string::ToString::to_string(
                                <Self as $crate::handle::Typed>::type_handle().path(),
                            ),
                            found: ::std::string::ToString::to_string(object.handle().path()),
                        }
                    }),
                    other => ::core::result::Result::Err(other.unexpected("object")),
                }
            }
        }
    )+};
}

// -----------------------------------------------------------------------------
// Terminals

macro_rules! impl_integer {
    ($($ty:ty => $variant:ident($repr:ty)),+ $(,)?) => {$(
        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::$variant(<$repr>::from(*self))
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                let out_of_range = |value: String| ConversionError::OutOfRange {
                    value,
                    target: stringify!($ty),
                };
                match value {
                    Value::Int32(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v.to_string())),
                    Value::Int64(v) => <$ty>::try_from(v).map_err(|_| out_of_range(v.to_string())),
                    other => Err(other.unexpected("integer")),
                }
            }
        }
    )+};
}

impl_integer!(
    i8 => Int32(i32),
    i16 => Int32(i32),
    i32 => Int32(i32),
    u8 => Int32(i32),
    u16 => Int32(i32),
    i64 => Int64(i64),
    u32 => Int64(i64),
);

macro_rules! impl_plain {
    ($($ty:ty => $variant:ident, $expected:literal);+ $(;)?) => {$(
        impl ToValue for $ty {
            #[inline]
            fn to_value(&self) -> Value {
                Value::$variant(self.clone())
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(other.unexpected($expected)),
                }
            }
        }
    )+};
}

impl_plain!(
    bool => Bool, "bool";
    String => Text, "text";
    Uuid => Identifier, "identifier";
    DateTime<Utc> => DateTime, "datetime";
    Duration => Period, "period";
);

impl ToValue for f32 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float32(*self)
    }
}

impl FromValue for f32 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float32(v) => Ok(v),
            other => Err(other.unexpected("float32")),
        }
    }
}

impl ToValue for f64 {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Float64(*self)
    }
}

impl FromValue for f64 {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Float64(v) => Ok(v),
            Value::Float32(v) => Ok(f64::from(v)),
            other => Err(other.unexpected("float64")),
        }
    }
}

impl ToValue for ByteBuf {
    #[inline]
    fn to_value(&self) -> Value {
        Value::Bytes(self.0.clone())
    }
}

impl FromValue for ByteBuf {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Bytes(v) => Ok(ByteBuf(v)),
            other => Err(other.unexpected("bytes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FromValue, ToValue};
    use crate::ConversionError;
    use crate::value::{ObjectValue, Value};

    #[test]
    fn narrow_integers_are_range_checked() {
        assert_eq!(u8::from_value(Value::Int32(255)).unwrap(), 255);
        assert_eq!(
            u8::from_value(Value::Int32(256)),
            Err(ConversionError::OutOfRange {
                value: "256".into(),
                target: "u8",
            })
        );
        assert_eq!(i32::from_value(Value::Int64(7)).unwrap(), 7);
        assert_eq!(u32::MAX.to_value(), Value::Int64(i64::from(u32::MAX)));
    }

    #[test]
    fn wrong_shape_is_reported() {
        let err = String::from_value(Value::Bool(true)).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnexpectedValue {
                expected: "text",
                found: "bool",
            }
        );
    }

    #[test]
    fn root_boxes_terminals() {
        let object = ObjectValue::from_value(Value::Text("cat".into())).unwrap();
        assert_eq!(object.downcast_ref::<String>().unwrap(), "cat");
        assert!(ObjectValue::from_value(Value::Null).is_err());
    }

    #[test]
    fn unboxed_inverts_boxing() {
        for value in [Value::Int32(5), Value::Int64(-5), Value::Text("cat".into()), Value::Bool(true)] {
            let object = ObjectValue::from_value(value.clone()).unwrap();
            assert_eq!(object.unboxed(), Some(value));
        }

        let list = ObjectValue::from_value(Value::List(vec![Value::Int32(1)])).unwrap();
        assert_eq!(
            list.unboxed(),
            Some(Value::List(vec![Value::Object(ObjectValue::new(1_i32))]))
        );

        #[derive(Debug, Clone, PartialEq)]
        struct Opaque;

        impl crate::handle::Typed for Opaque {
            fn type_handle() -> crate::handle::TypeHandle {
                crate::handle::TypeHandle::class::<Self>("tests::Opaque", crate::model::ClassModel::new)
            }
        }

        assert_eq!(ObjectValue::new(Opaque).unboxed(), None);
    }
}
