use core::fmt;
use std::sync::{Arc, Weak};

use crate::ConfigError;
use crate::descriptor::{TypeDescriptor, ValueCategory};
use crate::handle::TypeHandle;

// -----------------------------------------------------------------------------
// ValueType

/// A concrete value type of a field: its handle and, when the type is
/// itself described, its descriptor.
///
/// The descriptor reference is weak; the engine that generated it owns it.
#[derive(Clone)]
pub struct ValueType {
    handle: TypeHandle,
    descriptor: Option<Weak<TypeDescriptor>>,
}

impl ValueType {
    /// A terminal value type, without structural description.
    #[inline]
    pub fn terminal(handle: TypeHandle) -> Self {
        Self {
            handle,
            descriptor: None,
        }
    }

    /// A value type described by `descriptor`.
    #[inline]
    pub fn described(handle: TypeHandle, descriptor: &Arc<TypeDescriptor>) -> Self {
        Self {
            handle,
            descriptor: Some(Arc::downgrade(descriptor)),
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    /// Returns the descriptor, `None` for terminal types or once the
    /// owning engine has been dropped.
    pub fn descriptor(&self) -> Option<Arc<TypeDescriptor>> {
        self.descriptor.as_ref()?.upgrade()
    }

    #[inline]
    pub fn is_described(&self) -> bool {
        self.descriptor.is_some()
    }
}

impl PartialEq for ValueType {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
            && match (&self.descriptor, &other.descriptor) {
                (Some(a), Some(b)) => Weak::ptr_eq(a, b),
                (None, None) => true,
                _ => false,
            }
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueType")
            .field("handle", &self.handle.path())
            .field("described", &self.is_described())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// TypeSet

/// A non-empty set of legal value types.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeSet(Box<[ValueType]>);

impl TypeSet {
    /// Fails with [`ConfigError::EmptyTypeSet`] if `types` is empty.
    pub fn new(field: &str, types: Vec<ValueType>) -> Result<Self, ConfigError> {
        if types.is_empty() {
            return Err(ConfigError::EmptyTypeSet {
                field: field.to_owned(),
            });
        }
        Ok(Self(types.into_boxed_slice()))
    }

    /// The declared (or first listed) type.
    #[inline]
    pub fn first(&self) -> &ValueType {
        &self.0[0]
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// A constructed set is never empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        self.0.len() > 1
    }

    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, ValueType> {
        self.0.iter()
    }

    #[inline]
    pub fn as_slice(&self) -> &[ValueType] {
        &self.0
    }

    /// Finds the member type with the given handle.
    pub fn find(&self, handle: &TypeHandle) -> Option<&ValueType> {
        self.0.iter().find(|ty| ty.handle() == handle)
    }
}

impl<'a> IntoIterator for &'a TypeSet {
    type Item = &'a ValueType;
    type IntoIter = core::slice::Iter<'a, ValueType>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// -----------------------------------------------------------------------------
// FieldValue

/// The legal value types of a field, shaped by its category.
///
/// Only `Map` carries key types, so "keys iff map" holds by construction.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Object(TypeSet),
    Collection(TypeSet),
    Map { keys: TypeSet, values: TypeSet },
}

impl FieldValue {
    pub fn category(&self) -> ValueCategory {
        match self {
            Self::Object(_) => ValueCategory::Object,
            Self::Collection(_) => ValueCategory::Collection,
            Self::Map { .. } => ValueCategory::Map,
        }
    }

    /// The value (or element) types.
    pub fn values(&self) -> &TypeSet {
        match self {
            Self::Object(values) | Self::Collection(values) | Self::Map { values, .. } => values,
        }
    }

    /// The key types, for maps only.
    pub fn keys(&self) -> Option<&TypeSet> {
        match self {
            Self::Map { keys, .. } => Some(keys),
            Self::Object(_) | Self::Collection(_) => None,
        }
    }

    pub fn is_polymorphic(&self) -> bool {
        self.values().is_polymorphic() || self.keys().is_some_and(TypeSet::is_polymorphic)
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldValue, TypeSet, ValueType};
    use crate::ConfigError;
    use crate::descriptor::ValueCategory;
    use crate::handle::Typed;

    #[test]
    fn empty_sets_are_rejected() {
        assert_eq!(
            TypeSet::new("tags", Vec::new()),
            Err(ConfigError::EmptyTypeSet {
                field: "tags".into()
            })
        );
    }

    #[test]
    fn keys_only_for_maps() {
        let strings = TypeSet::new("x", vec![ValueType::terminal(String::type_handle())]).unwrap();
        let ints = TypeSet::new(
            "x",
            vec![
                ValueType::terminal(i32::type_handle()),
                ValueType::terminal(i64::type_handle()),
            ],
        )
        .unwrap();

        let list = FieldValue::Collection(strings.clone());
        assert_eq!(list.category(), ValueCategory::Collection);
        assert!(list.keys().is_none());
        assert!(!list.is_polymorphic());

        let map = FieldValue::Map {
            keys: strings,
            values: ints,
        };
        assert_eq!(map.category(), ValueCategory::Map);
        assert_eq!(map.keys().unwrap().first().handle(), &String::type_handle());
        assert!(map.is_polymorphic());
    }
}
