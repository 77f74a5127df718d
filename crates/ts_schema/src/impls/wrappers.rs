use crate::ConversionError;
use crate::handle::{TypeHandle, TypeKind, Typed};
use crate::value::{FromValue, ToValue, Value};

// -----------------------------------------------------------------------------
// Option

impl<T: Typed> Typed for Option<T> {
    fn type_handle() -> TypeHandle {
        TypeHandle::generic::<Self, 1>("core::option::Option", TypeKind::Nullable, || {
            [T::type_handle()]
        })
    }
}

impl<T: ToValue> ToValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(value) => value.to_value(),
            None => Value::Null,
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        match value {
            Value::Null => Ok(None),
            value => T::from_value(value).map(Some),
        }
    }
}

// -----------------------------------------------------------------------------
// Box

// Boxing is an ownership detail, so `Box<T>` shares the handle of `T`.
impl<T: Typed> Typed for Box<T> {
    #[inline]
    fn type_handle() -> TypeHandle {
        T::type_handle()
    }
}

impl<T: ToValue> ToValue for Box<T> {
    #[inline]
    fn to_value(&self) -> Value {
        (**self).to_value()
    }
}

impl<T: FromValue> FromValue for Box<T> {
    #[inline]
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        T::from_value(value).map(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use crate::handle::Typed;
    use crate::value::{FromValue, ToValue, Value};

    #[test]
    fn option_maps_to_null() {
        assert_eq!(None::<i32>.to_value(), Value::Null);
        assert_eq!(Option::<i32>::from_value(Value::Null).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(Value::Int32(3)).unwrap(), Some(3));
    }

    #[test]
    fn box_is_transparent() {
        assert_eq!(Box::<String>::type_handle(), String::type_handle());
        assert_eq!(Box::new(5_i64).to_value(), Value::Int64(5));
    }
}
