use std::collections::VecDeque;

use crate::ConversionError;
use crate::handle::{TypeHandle, TypeKind, Typed};
use crate::value::{FromValue, ToValue, Value};

// -----------------------------------------------------------------------------
// Vec / VecDeque

macro_rules! impl_list {
    ($($ty:ident => $base:literal),+ $(,)?) => {$(
        impl<T: Typed> Typed for $ty<T> {
            fn type_handle() -> TypeHandle {
                TypeHandle::generic::<Self, 1>($base, TypeKind::Collection, || [T::type_handle()])
            }
        }

        impl<T: ToValue> ToValue for $ty<T> {
            fn to_value(&self) -> Value {
                Value::List(self.iter().map(ToValue::to_value).collect())
            }
        }

        impl<T: FromValue> FromValue for $ty<T> {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                value.into_list()?.into_iter().map(T::from_value).collect()
            }
        }
    )+};
}

impl_list!(
    Vec => "alloc::vec::Vec",
    VecDeque => "alloc::collections::VecDeque",
);

// -----------------------------------------------------------------------------
// [T; N]

impl<T: Typed, const N: usize> Typed for [T; N] {
    fn type_handle() -> TypeHandle {
        TypeHandle::array::<Self, N>(T::type_handle)
    }
}

impl<T: ToValue, const N: usize> ToValue for [T; N] {
    fn to_value(&self) -> Value {
        Value::List(self.iter().map(ToValue::to_value).collect())
    }
}

impl<T: FromValue, const N: usize> FromValue for [T; N] {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        let items = value
            .into_list()?
            .into_iter()
            .map(T::from_value)
            .collect::<Result<Vec<T>, _>>()?;
        let len = items.len();
        items
            .try_into()
            .map_err(|_| ConversionError::Malformed {
                input: format!("list of {len} elements"),
                reason: format!("expected exactly {N} elements"),
            })
    }
}
