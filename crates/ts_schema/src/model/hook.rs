use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::HookError;
use crate::handle::Typed;
use crate::model::Upcast;

type HookFn = dyn Fn(&mut dyn Any) -> Result<(), HookError> + Send + Sync;

// -----------------------------------------------------------------------------
// Hook

/// A lifecycle callback bound to one class.
///
/// Created from a typed `fn(&mut C) -> Result<(), HookError>`; calling it
/// with an instance of another type fails with [`HookError::WrongInstance`].
#[derive(Clone)]
pub struct Hook {
    owner: &'static str,
    func: Arc<HookFn>,
}

impl Hook {
    /// Wraps a typed callback.
    pub fn new<C: Typed>(f: fn(&mut C) -> Result<(), HookError>) -> Self {
        let owner = core::any::type_name::<C>();
        Self {
            owner,
            func: Arc::new(move |instance: &mut dyn Any| match instance.downcast_mut::<C>() {
                Some(instance) => f(instance),
                None => Err(HookError::WrongInstance {
                    expected: C::type_handle().path().to_owned(),
                }),
            }),
        }
    }

    /// Re-targets this hook at a child class, reaching the parent through `upcast`.
    pub fn through(&self, upcast: Arc<dyn Upcast>) -> Self {
        let inner = self.func.clone();
        let owner = self.owner;
        Self {
            owner,
            func: Arc::new(move |instance: &mut dyn Any| match upcast.upcast_mut(instance) {
                Some(parent) => inner(parent),
                None => Err(HookError::WrongInstance {
                    expected: owner.to_owned(),
                }),
            }),
        }
    }

    /// Runs the hook.
    #[inline]
    pub fn call(&self, instance: &mut dyn Any) -> Result<(), HookError> {
        (self.func)(instance)
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.owner).finish()
    }
}

// -----------------------------------------------------------------------------
// Hooks

/// The lifecycle hooks of a class.
#[derive(Debug, Clone, Default)]
pub struct Hooks {
    post_construct: Option<Hook>,
    validate: Option<Hook>,
}

impl Hooks {
    #[inline]
    pub const fn new() -> Self {
        Self {
            post_construct: None,
            validate: None,
        }
    }

    /// Called after an instance has been populated from an external form.
    #[inline]
    pub fn post_construct(&self) -> Option<&Hook> {
        self.post_construct.as_ref()
    }

    #[inline]
    pub fn validate(&self) -> Option<&Hook> {
        self.validate.as_ref()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.post_construct.is_none() && self.validate.is_none()
    }

    pub(crate) fn set_post_construct(&mut self, hook: Hook) {
        self.post_construct = Some(hook);
    }

    pub(crate) fn set_validate(&mut self, hook: Hook) {
        self.validate = Some(hook);
    }

    /// Fills each missing hook with the parent's, re-targeted through `upcast`.
    pub fn or_inherit(&self, parent: &Hooks, upcast: &Arc<dyn Upcast>) -> Hooks {
        Hooks {
            post_construct: self
                .post_construct
                .clone()
                .or_else(|| parent.post_construct.as_ref().map(|h| h.through(upcast.clone()))),
            validate: self
                .validate
                .clone()
                .or_else(|| parent.validate.as_ref().map(|h| h.through(upcast.clone()))),
        }
    }
}
