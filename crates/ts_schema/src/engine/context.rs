use std::sync::Arc;

use ts_utils::hash::HashMap;

use crate::ConfigError;
use crate::descriptor::{FieldDescriptor, TypeDescriptor};
use crate::engine::DescriptorCache;
use crate::handle::TypeHandle;
use crate::model::{Hooks, Upcast};

struct Pending {
    descriptor: Arc<TypeDescriptor>,
    parent: Option<Arc<TypeDescriptor>>,
    upcast: Option<Arc<dyn Upcast>>,
    own: Vec<FieldDescriptor>,
}

/// The state of one outermost [`generate_type`] request.
///
/// Every descriptor allocated by the request is registered here as
/// *pending* before its parent and fields are resolved, so a nested
/// reference to a type that is still being built finds the pending
/// descriptor instead of starting over. Pending descriptors are frozen
/// and published together when the request succeeds, and dropped when it
/// fails.
///
/// [`generate_type`]: crate::engine::DescriptorEngine::generate_type
pub struct GenerationContext {
    pending: HashMap<TypeHandle, Pending>,
    order: Vec<TypeHandle>,
}

impl GenerationContext {
    pub(crate) fn new() -> Self {
        Self {
            pending: HashMap::default(),
            order: Vec::new(),
        }
    }

    /// Returns the pending descriptor of `handle`.
    pub fn pending(&self, handle: &TypeHandle) -> Option<&Arc<TypeDescriptor>> {
        self.pending.get(handle).map(|pending| &pending.descriptor)
    }

    /// Number of descriptors allocated by this request so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub(crate) fn insert(&mut self, descriptor: Arc<TypeDescriptor>) {
        let handle = descriptor.handle().clone();
        self.order.push(handle.clone());
        self.pending.insert(
            handle,
            Pending {
                descriptor,
                parent: None,
                upcast: None,
                own: Vec::new(),
            },
        );
    }

    pub(crate) fn set_parent(
        &mut self,
        handle: &TypeHandle,
        parent: Option<Arc<TypeDescriptor>>,
        upcast: Option<Arc<dyn Upcast>>,
    ) {
        if let Some(pending) = self.pending.get_mut(handle) {
            pending.parent = parent;
            pending.upcast = upcast;
        }
    }

    pub(crate) fn set_own_fields(&mut self, handle: &TypeHandle, own: Vec<FieldDescriptor>) {
        if let Some(pending) = self.pending.get_mut(handle) {
            pending.own = own;
        }
    }

    /// Freezes every pending descriptor, parents before children, and
    /// publishes the batch into `cache`.
    ///
    /// On error nothing is published.
    pub(crate) fn finish(mut self, cache: &DescriptorCache) -> Result<(), ConfigError> {
        let mut order = Vec::with_capacity(self.order.len());
        for handle in self.order.drain(..) {
            order.push((handle.ancestors()?.len(), handle));
        }
        // Stable: siblings keep their allocation order.
        order.sort_by_key(|(depth, _)| *depth);

        #[cfg(all(debug_assertions, feature = "debug"))]
        log::trace!(
            "finalizing {} descriptor(s): {:?}",
            order.len(),
            order.iter().map(|(_, h)| h.name()).collect::<Vec<_>>()
        );

        let mut batch = Vec::with_capacity(order.len());
        for (_, handle) in order {
            let Some(pending) = self.pending.remove(&handle) else {
                continue;
            };
            freeze(pending, &mut batch)?;
        }

        cache.publish(batch);
        Ok(())
    }
}

fn freeze(pending: Pending, batch: &mut Vec<Arc<TypeDescriptor>>) -> Result<(), ConfigError> {
    let Pending {
        descriptor,
        parent,
        upcast,
        own,
    } = pending;

    let own_hooks = match descriptor.handle().model() {
        Some(model) => model.hooks().clone(),
        None => Hooks::new(),
    };

    let mut fields = Vec::new();
    let hooks = match (&parent, &upcast) {
        (Some(parent), Some(upcast)) => {
            fields.reserve(parent.field_len() + own.len());
            for field in parent.fields() {
                if !field.is_contained_by(parent) {
                    return Err(ConfigError::ForeignField {
                        ty: parent.handle().path().to_owned(),
                        field: field.name().to_owned(),
                        container: field
                            .containing_type()
                            .map_or_else(|| String::from("<detached>"), |c| c.handle().path().to_owned()),
                    });
                }
                #[cfg(all(debug_assertions, feature = "debug"))]
                check_declaring(parent, field)?;
                fields.push(field.clone_for(&descriptor, upcast));
            }
            own_hooks.or_inherit(parent.hooks(), upcast)
        }
        _ => own_hooks,
    };
    fields.extend(own);

    descriptor.set_parent(parent)?;
    descriptor.set_hooks(hooks)?;
    descriptor.set_fields(fields)?;
    batch.push(descriptor);
    Ok(())
}

/// An inherited field must be declared by the parent or one of its ancestors.
#[cfg(all(debug_assertions, feature = "debug"))]
fn check_declaring(parent: &Arc<TypeDescriptor>, field: &FieldDescriptor) -> Result<(), ConfigError> {
    let declaring = field.declaring_type();
    let mut cursor = Some(parent);
    while let Some(current) = cursor {
        if declaring.as_ref().is_some_and(|d| Arc::ptr_eq(d, current)) {
            return Ok(());
        }
        cursor = current.parent();
    }
    Err(ConfigError::ForeignField {
        ty: parent.handle().path().to_owned(),
        field: field.name().to_owned(),
        container: declaring.map_or_else(|| String::from("<detached>"), |d| d.handle().path().to_owned()),
    })
}
