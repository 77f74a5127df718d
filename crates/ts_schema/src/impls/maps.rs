use core::hash::{BuildHasher, Hash};
use std::collections::BTreeMap;

use ts_utils::hash::hashbrown;

use crate::ConversionError;
use crate::handle::{TypeHandle, TypeKind, Typed};
use crate::value::{FromValue, ToValue, Value};

fn entry<K: FromValue, V: FromValue>((k, v): (Value, Value)) -> Result<(K, V), ConversionError> {
    Ok((K::from_value(k)?, V::from_value(v)?))
}

// -----------------------------------------------------------------------------
// Hash maps

macro_rules! impl_hash_map {
    ($($ty:ty => $base:literal),+ $(,)?) => {$(
        impl<K: Typed, V: Typed, S: Send + Sync + 'static> Typed for $ty {
            fn type_handle() -> TypeHandle {
                TypeHandle::generic::<Self, 2>($base, TypeKind::Map, || {
                    [K::type_handle(), V::type_handle()]
                })
            }
        }

        impl<K: ToValue, V: ToValue, S> ToValue for $ty {
            fn to_value(&self) -> Value {
                Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
            }
        }

        impl<K, V, S> FromValue for $ty
        where
            K: FromValue + Eq + Hash,
            V: FromValue,
            S: BuildHasher + Default,
        {
            fn from_value(value: Value) -> Result<Self, ConversionError> {
                value.into_map()?.into_iter().map(entry).collect()
            }
        }
    )+};
}

impl_hash_map!(
    std::collections::HashMap<K, V, S> => "std::collections::HashMap",
    hashbrown::HashMap<K, V, S> => "hashbrown::HashMap",
);

// -----------------------------------------------------------------------------
// BTreeMap

impl<K: Typed, V: Typed> Typed for BTreeMap<K, V> {
    fn type_handle() -> TypeHandle {
        TypeHandle::generic::<Self, 2>("alloc::collections::BTreeMap", TypeKind::Map, || {
            [K::type_handle(), V::type_handle()]
        })
    }
}

impl<K: ToValue, V: ToValue> ToValue for BTreeMap<K, V> {
    fn to_value(&self) -> Value {
        Value::Map(self.iter().map(|(k, v)| (k.to_value(), v.to_value())).collect())
    }
}

impl<K: FromValue + Ord, V: FromValue> FromValue for BTreeMap<K, V> {
    fn from_value(value: Value) -> Result<Self, ConversionError> {
        value.into_map()?.into_iter().map(entry).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{BTreeMap, HashMap};

    use crate::handle::{TypeKind, Typed};
    use crate::value::{FromValue, ToValue, Value};

    #[test]
    fn btree_map_keeps_key_order() {
        let map = BTreeMap::from([(2_i32, String::from("b")), (1, String::from("a"))]);
        let Value::Map(entries) = map.to_value() else {
            panic!("expected a map value");
        };
        assert_eq!(entries[0].0, Value::Int32(1));
        assert_eq!(BTreeMap::<i32, String>::from_value(Value::Map(entries)).unwrap(), map);
    }

    #[test]
    fn hash_map_handles() {
        let handle = HashMap::<String, i64>::type_handle();
        assert_eq!(handle.kind(), TypeKind::Map);
        assert_eq!(handle.path(), "std::collections::HashMap<alloc::string::String, i64>");
    }

    #[test]
    fn non_map_is_rejected() {
        assert!(HashMap::<String, i32>::from_value(Value::List(Vec::new())).is_err());
    }
}
