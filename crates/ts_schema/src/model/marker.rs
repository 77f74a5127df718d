use std::borrow::Cow;

use crate::handle::{TypeHandle, Typed};
use crate::model::Member;

// -----------------------------------------------------------------------------
// TypeMarker

/// Marks a type as participating in structural description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeMarker {
    name: Option<Cow<'static, str>>,
}

impl TypeMarker {
    /// A marker using the type's own name.
    #[inline]
    pub const fn new() -> Self {
        Self { name: None }
    }

    /// A marker with an explicit display name.
    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

// -----------------------------------------------------------------------------
// FieldMarker

/// Marks a member as an exposed field.
///
/// Besides the display name, a marker may list explicit alternative
/// concrete types for the value (and, for maps, the key). An empty list
/// means "the declared type only".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMarker {
    name: Option<Cow<'static, str>>,
    types: Vec<TypeHandle>,
    key_types: Vec<TypeHandle>,
}

impl FieldMarker {
    /// A marker using the member's own name.
    #[inline]
    pub const fn new() -> Self {
        Self {
            name: None,
            types: Vec::new(),
            key_types: Vec::new(),
        }
    }

    /// A marker with an explicit display name.
    #[inline]
    pub fn named(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::new()
        }
    }

    /// Adds `T` to the legal value types.
    pub fn with_type<T: Typed>(mut self) -> Self {
        self.types.push(T::type_handle());
        self
    }

    /// Adds a handle to the legal value types.
    pub fn with_type_handle(mut self, handle: TypeHandle) -> Self {
        self.types.push(handle);
        self
    }

    /// Adds `T` to the legal key types.
    pub fn with_key_type<T: Typed>(mut self) -> Self {
        self.key_types.push(T::type_handle());
        self
    }

    #[inline]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Explicit alternative value types.
    #[inline]
    pub fn types(&self) -> &[TypeHandle] {
        &self.types
    }

    /// Explicit alternative key types.
    #[inline]
    pub fn key_types(&self) -> &[TypeHandle] {
        &self.key_types
    }
}

// -----------------------------------------------------------------------------
// MarkerSource

/// The query interface of the marker layer.
///
/// The engine never inspects types by name; it asks a `MarkerSource`
/// whether a type or member participates, and under which name.
pub trait MarkerSource: Send + Sync {
    /// Returns the marker of a type, `None` if it does not participate.
    fn type_marker(&self, handle: &TypeHandle) -> Option<TypeMarker>;

    /// Returns the marker of a member of `owner`, `None` to skip it.
    fn field_marker(&self, owner: &TypeHandle, member: &Member) -> Option<FieldMarker>;
}

/// Reads the markers embedded in each type's [`ClassModel`](crate::model::ClassModel).
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelMarkers;

impl MarkerSource for ModelMarkers {
    fn type_marker(&self, handle: &TypeHandle) -> Option<TypeMarker> {
        handle.model()?.marker().cloned()
    }

    fn field_marker(&self, _owner: &TypeHandle, member: &Member) -> Option<FieldMarker> {
        member.marker().cloned()
    }
}
