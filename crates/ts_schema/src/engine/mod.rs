//! Descriptor generation.
//!
//! ## Menu
//!
//! - [`DescriptorEngine`]: the generation algorithm, abstract over which
//!   types participate and how a member becomes a field.
//! - [`MarkerEngine`]: the engine driven by a [`MarkerSource`](crate::model::MarkerSource).
//! - [`DescriptorCache`]: the published descriptors of one engine.
//! - [`GenerationContext`]: the pending descriptors of one request.
//!
//! ## Generation
//!
//! [`generate_type`](DescriptorEngine::generate_type) runs under the
//! cache's generation lock. Each type it meets is allocated and registered
//! as pending *before* its parent and fields are resolved, which is what
//! lets self-referencing and mutually-referencing types terminate. When
//! the outermost request returns, pending descriptors are frozen parent
//! first and published in one step. A [`ConfigError`] anywhere aborts the
//! request and publishes nothing.

// -----------------------------------------------------------------------------
// Modules

mod cache;
mod context;
mod marker_engine;

// -----------------------------------------------------------------------------
// Exports

pub use cache::DescriptorCache;
pub use context::GenerationContext;
pub use marker_engine::MarkerEngine;

// -----------------------------------------------------------------------------
// DescriptorEngine

use std::borrow::Cow;
use std::sync::Arc;

use crate::ConfigError;
use crate::descriptor::{FieldDescriptor, TypeDescriptor, ValueType};
use crate::handle::{TypeHandle, Typed};
use crate::model::{ClassModel, Member};

/// Generates and caches [`TypeDescriptor`]s.
///
/// Implementors decide which types participate ([`can_generate`]) and how
/// a member becomes a field ([`generate_field`]); the provided methods
/// implement caching, cycle handling, inheritance and publication.
///
/// [`can_generate`]: DescriptorEngine::can_generate
/// [`generate_field`]: DescriptorEngine::generate_field
pub trait DescriptorEngine: Send + Sync {
    /// The cache owning this engine's descriptors.
    fn cache(&self) -> &DescriptorCache;

    /// Returns `true` if `handle` gets a structural description.
    fn can_generate(&self, handle: &TypeHandle) -> bool;

    /// The display name of a generated type.
    fn type_name(&self, handle: &TypeHandle) -> Cow<'static, str> {
        Cow::Owned(handle.name().to_owned())
    }

    /// Turns one member of `owner` into a field, `None` to skip it.
    ///
    /// Value types that are themselves described are resolved through
    /// [`resolve_value_type`](Self::resolve_value_type) with the same `cx`.
    fn generate_field(
        &self,
        cx: &mut GenerationContext,
        owner: &Arc<TypeDescriptor>,
        member: &Member,
    ) -> Result<Option<FieldDescriptor>, ConfigError>;

    /// Returns the descriptor of `handle`, generating it if needed.
    ///
    /// `Ok(None)` means the type does not participate; it is not an error.
    /// Repeated calls return the same `Arc`.
    fn generate_type(&self, handle: &TypeHandle) -> Result<Option<Arc<TypeDescriptor>>, ConfigError> {
        let handle = handle.non_null();
        if !self.can_generate(&handle) {
            return Ok(None);
        }
        if let Some(descriptor) = self.cache().get(&handle) {
            log::trace!("descriptor cache hit: `{handle}`");
            return Ok(Some(descriptor));
        }

        let _guard = self.cache().lock_generation();
        if let Some(descriptor) = self.cache().get(&handle) {
            return Ok(Some(descriptor));
        }
        log::trace!("descriptor cache miss: `{handle}`");

        let mut cx = GenerationContext::new();
        let descriptor = self.build_pending(&mut cx, &handle)?;
        cx.finish(self.cache())?;
        Ok(Some(descriptor))
    }

    /// Shorthand for `generate_type(&T::type_handle())`.
    fn generate<T: Typed>(&self) -> Result<Option<Arc<TypeDescriptor>>, ConfigError>
    where
        Self: Sized,
    {
        self.generate_type(&T::type_handle())
    }

    /// Returns the published or pending descriptor of `handle`, building a
    /// pending one if the type participates and has none yet.
    fn resolve_descriptor(
        &self,
        cx: &mut GenerationContext,
        handle: &TypeHandle,
    ) -> Result<Option<Arc<TypeDescriptor>>, ConfigError> {
        let handle = handle.non_null();
        if !self.can_generate(&handle) {
            return Ok(None);
        }
        if let Some(descriptor) = self.cache().get(&handle) {
            return Ok(Some(descriptor));
        }
        if let Some(descriptor) = cx.pending(&handle) {
            return Ok(Some(descriptor.clone()));
        }
        self.build_pending(cx, &handle).map(Some)
    }

    /// Resolves `handle` (without nullable layers) to a [`ValueType`].
    fn resolve_value_type(
        &self,
        cx: &mut GenerationContext,
        handle: &TypeHandle,
    ) -> Result<ValueType, ConfigError> {
        let handle = handle.non_null();
        Ok(match self.resolve_descriptor(cx, &handle)? {
            Some(descriptor) => ValueType::described(handle, &descriptor),
            None => ValueType::terminal(handle),
        })
    }

    /// Allocates a pending descriptor for `handle`, then resolves its
    /// parent and own fields.
    fn build_pending(
        &self,
        cx: &mut GenerationContext,
        handle: &TypeHandle,
    ) -> Result<Arc<TypeDescriptor>, ConfigError> {
        handle.ancestors()?;

        let model = handle.model();
        let factory = model.and_then(ClassModel::factory);
        let descriptor = Arc::new(TypeDescriptor::new(self.type_name(handle), handle.clone(), factory));
        cx.insert(descriptor.clone());

        let link = model.and_then(ClassModel::parent);
        let parent = match link {
            Some(link) if !link.handle().is_root() => self.resolve_descriptor(cx, link.handle())?,
            _ => None,
        };
        let upcast = match parent {
            Some(_) => link.map(|link| link.upcast().clone()),
            None => None,
        };
        cx.set_parent(handle, parent, upcast);

        let mut own = Vec::new();
        if let Some(model) = model {
            for member in model.members() {
                if let Some(field) = self.generate_field(cx, &descriptor, member)? {
                    own.push(field);
                }
            }
        }
        cx.set_own_fields(handle, own);

        Ok(descriptor)
    }
}
