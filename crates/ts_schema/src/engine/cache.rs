use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use arc_swap::ArcSwap;
use ts_utils::hash::HashMap;

use crate::descriptor::TypeDescriptor;
use crate::handle::TypeHandle;

type Snapshot = HashMap<TypeHandle, Arc<TypeDescriptor>>;

/// The descriptors published by one engine.
///
/// - Reads load an immutable snapshot and take no lock.
/// - Generation is serialized by one mutex; a finished batch is published
///   with a single atomic swap, so readers never see a half-built
///   descriptor.
///
/// The cache is the only strong owner of the descriptors it publishes;
/// dropping it detaches every weak reference handed out by its fields.
pub struct DescriptorCache {
    published: ArcSwap<Snapshot>,
    generation: Mutex<()>,
}

impl DescriptorCache {
    pub fn new() -> Self {
        Self {
            published: ArcSwap::from_pointee(Snapshot::default()),
            generation: Mutex::new(()),
        }
    }

    /// Returns the published descriptor of `handle`.
    pub fn get(&self, handle: &TypeHandle) -> Option<Arc<TypeDescriptor>> {
        self.published.load().get(handle).cloned()
    }

    #[inline]
    pub fn contains(&self, handle: &TypeHandle) -> bool {
        self.published.load().contains_key(handle)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.published.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.published.load().is_empty()
    }

    /// Returns every published descriptor, in no particular order.
    pub fn descriptors(&self) -> Vec<Arc<TypeDescriptor>> {
        self.published.load().values().cloned().collect()
    }

    /// Serializes generation. Held for the whole of one request.
    pub(crate) fn lock_generation(&self) -> MutexGuard<'_, ()> {
        self.generation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publishes a finished batch. Must be called with the generation lock held.
    pub(crate) fn publish(&self, batch: impl IntoIterator<Item = Arc<TypeDescriptor>>) {
        let current = self.published.load();
        let mut next: Snapshot = (**current).clone();
        for descriptor in batch {
            log::debug!("publishing descriptor `{}`", descriptor.handle());
            next.insert(descriptor.handle().clone(), descriptor);
        }
        self.published.store(Arc::new(next));
    }
}

impl Default for DescriptorCache {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for DescriptorCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DescriptorCache").field("len", &self.len()).finish()
    }
}
