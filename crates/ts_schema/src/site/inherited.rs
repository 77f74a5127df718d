use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::AccessError;
use crate::handle::TypeHandle;
use crate::model::Upcast;
use crate::site::DataSite;
use crate::value::Value;

/// A parent's [`DataSite`] seen from a child class.
///
/// The child instance is first upcast to its embedded parent, then handed
/// to the parent's site.
#[derive(Clone)]
pub struct InheritedSite {
    inner: Arc<dyn DataSite>,
    upcast: Arc<dyn Upcast>,
    child: TypeHandle,
}

impl InheritedSite {
    pub fn new(inner: Arc<dyn DataSite>, upcast: Arc<dyn Upcast>, child: TypeHandle) -> Self {
        Self {
            inner,
            upcast,
            child,
        }
    }

    /// The parent's site.
    #[inline]
    pub fn inner(&self) -> &Arc<dyn DataSite> {
        &self.inner
    }

    #[cold]
    fn wrong_instance(&self) -> AccessError {
        AccessError::WrongInstance {
            site: self.inner.name().to_owned(),
            expected: self.child.path().to_owned(),
        }
    }
}

impl DataSite for InheritedSite {
    #[inline]
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let parent = self.upcast.upcast(instance).ok_or_else(|| self.wrong_instance())?;
        self.inner.get(parent)
    }

    fn set(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let Some(parent) = self.upcast.upcast_mut(instance) else {
            return Err(self.wrong_instance());
        };
        self.inner.set(parent, value)
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }
}

impl fmt::Debug for InheritedSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InheritedSite")
            .field("child", &self.child.path())
            .field("inner", &self.inner)
            .finish()
    }
}
