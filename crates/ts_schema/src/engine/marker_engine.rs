use std::borrow::Cow;
use std::sync::Arc;

use crate::ConfigError;
use crate::descriptor::{FieldDescriptor, FieldValue, TypeDescriptor, TypeSet};
use crate::engine::{DescriptorCache, DescriptorEngine, GenerationContext};
use crate::handle::{TypeHandle, TypeKind};
use crate::model::{MarkerSource, Member, ModelMarkers};

/// A [`DescriptorEngine`] driven by a [`MarkerSource`].
///
/// A type participates if it is a class carrying a type marker; a member
/// becomes a field if it carries a field marker. Member values are shaped
/// by their declared type:
///
/// - maps become [`FieldValue::Map`] over their key and value types;
/// - collections and arrays become [`FieldValue::Collection`] over their
///   element type;
/// - anything else becomes [`FieldValue::Object`].
///
/// Explicit alternative types listed by a marker must each be assignable
/// to the declared (key, value or element) type.
pub struct MarkerEngine<M = ModelMarkers> {
    markers: M,
    cache: DescriptorCache,
}

impl MarkerEngine {
    /// An engine reading the markers embedded in class models.
    #[inline]
    pub fn new() -> Self {
        Self::with_markers(ModelMarkers)
    }
}

impl Default for MarkerEngine {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<M: MarkerSource> MarkerEngine<M> {
    pub fn with_markers(markers: M) -> Self {
        Self {
            markers,
            cache: DescriptorCache::new(),
        }
    }

    #[inline]
    pub fn markers(&self) -> &M {
        &self.markers
    }

    fn resolve_set(
        &self,
        cx: &mut GenerationContext,
        owner: &TypeDescriptor,
        field: &str,
        declared: &TypeHandle,
        alternatives: &[TypeHandle],
    ) -> Result<TypeSet, ConfigError> {
        let mut types = Vec::with_capacity(alternatives.len().max(1));
        if alternatives.is_empty() {
            types.push(self.resolve_value_type(cx, declared)?);
        }
        for alternative in alternatives {
            if !declared.is_assignable_from(alternative) {
                return Err(ConfigError::NotAssignable {
                    owner: owner.handle().path().to_owned(),
                    field: field.to_owned(),
                    declared: declared.path().to_owned(),
                    alternative: alternative.path().to_owned(),
                });
            }
            types.push(self.resolve_value_type(cx, alternative)?);
        }
        TypeSet::new(field, types)
    }
}

impl<M: MarkerSource> DescriptorEngine for MarkerEngine<M> {
    #[inline]
    fn cache(&self) -> &DescriptorCache {
        &self.cache
    }

    fn can_generate(&self, handle: &TypeHandle) -> bool {
        handle.kind() == TypeKind::Class && self.markers.type_marker(handle).is_some()
    }

    fn type_name(&self, handle: &TypeHandle) -> Cow<'static, str> {
        match self.markers.type_marker(handle).as_ref().and_then(|m| m.name()) {
            Some(name) => Cow::Owned(name.to_owned()),
            None => Cow::Owned(handle.name().to_owned()),
        }
    }

    fn generate_field(
        &self,
        cx: &mut GenerationContext,
        owner: &Arc<TypeDescriptor>,
        member: &Member,
    ) -> Result<Option<FieldDescriptor>, ConfigError> {
        let Some(marker) = self.markers.field_marker(owner.handle(), member) else {
            return Ok(None);
        };
        let name = marker.name().unwrap_or(member.name()).to_owned();
        let declared = member.declared().non_null();

        let value = match declared.kind() {
            TypeKind::Map => {
                let keys = self.resolve_set(cx, owner, &name, &declared.key()?, marker.key_types())?;
                let values = self.resolve_set(cx, owner, &name, &declared.value()?, marker.types())?;
                FieldValue::Map { keys, values }
            }
            kind => {
                if !marker.key_types().is_empty() {
                    return Err(ConfigError::UnexpectedKeyTypes {
                        owner: owner.handle().path().to_owned(),
                        field: name,
                    });
                }
                match kind {
                    TypeKind::Collection | TypeKind::Array(_) => {
                        let element = declared.element()?;
                        FieldValue::Collection(self.resolve_set(cx, owner, &name, &element, marker.types())?)
                    }
                    _ => FieldValue::Object(self.resolve_set(cx, owner, &name, &declared, marker.types())?),
                }
            }
        };

        let site = member.site().clone();
        Ok(Some(FieldDescriptor::new(name, member.name(), value, site, owner)))
    }
}

impl<M> core::fmt::Debug for MarkerEngine<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MarkerEngine").field("cache", &self.cache).finish()
    }
}
