use core::any::Any;
use core::fmt;
use std::sync::Arc;

use crate::HookError;
use crate::handle::{TypeHandle, Typed};
use crate::model::{FieldMarker, Hook, Hooks, TypeMarker};
use crate::site::{DataSite, FieldSite};
use crate::value::{FromValue, Instance, ToValue};

// -----------------------------------------------------------------------------
// Upcast

/// Reaches the embedded parent value of a child instance.
pub trait Upcast: Send + Sync {
    fn upcast<'a>(&self, child: &'a dyn Any) -> Option<&'a dyn Any>;

    fn upcast_mut<'a>(&self, child: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

struct UpcastFn<C, P> {
    get: fn(&C) -> &P,
    get_mut: fn(&mut C) -> &mut P,
}

impl<C: Any, P: Any> Upcast for UpcastFn<C, P> {
    fn upcast<'a>(&self, child: &'a dyn Any) -> Option<&'a dyn Any> {
        let child = child.downcast_ref::<C>()?;
        Some((self.get)(child))
    }

    fn upcast_mut<'a>(&self, child: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        let child = child.downcast_mut::<C>()?;
        Some((self.get_mut)(child))
    }
}

// -----------------------------------------------------------------------------
// ParentLink

/// The parent of a class: its handle and the way to reach it.
#[derive(Clone)]
pub struct ParentLink {
    handle: TypeHandle,
    upcast: Arc<dyn Upcast>,
}

impl ParentLink {
    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    #[inline]
    pub fn upcast(&self) -> &Arc<dyn Upcast> {
        &self.upcast
    }
}

impl fmt::Debug for ParentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ParentLink").field(&self.handle.path()).finish()
    }
}

// -----------------------------------------------------------------------------
// Factory

/// A zero-argument constructor producing a blank instance.
#[derive(Clone, Copy)]
pub struct Factory(fn() -> Box<dyn Instance>);

impl Factory {
    /// Uses `C::default()`.
    pub fn of<C: Instance + Default>() -> Self {
        Self(|| Box::new(C::default()))
    }

    #[inline]
    pub fn create(&self) -> Box<dyn Instance> {
        (self.0)()
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad("Factory")
    }
}

// -----------------------------------------------------------------------------
// Member

/// One declared member of a class, as handed over by the marker layer.
#[derive(Clone)]
pub struct Member {
    name: &'static str,
    declared: TypeHandle,
    site: Arc<dyn DataSite>,
    marker: Option<FieldMarker>,
}

impl Member {
    /// A read-write member backed by field accessors.
    pub fn field<C, F>(name: &'static str, get: fn(&C) -> &F, get_mut: fn(&mut C) -> &mut F) -> Self
    where
        C: Typed,
        F: Typed + ToValue + FromValue,
    {
        Self::with_site(
            name,
            F::type_handle(),
            Arc::new(FieldSite::new(name, get, Some(get_mut))),
        )
    }

    /// A member that can be read but never written.
    pub fn read_only<C, F>(name: &'static str, get: fn(&C) -> &F) -> Self
    where
        C: Typed,
        F: Typed + ToValue + FromValue,
    {
        Self::with_site(name, F::type_handle(), Arc::new(FieldSite::new(name, get, None)))
    }

    /// A member with a custom site.
    pub fn with_site(name: &'static str, declared: TypeHandle, site: Arc<dyn DataSite>) -> Self {
        Self {
            name,
            declared,
            site,
            marker: None,
        }
    }

    /// Attaches a field marker; unmarked members are skipped.
    pub fn marked(mut self, marker: FieldMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// The member's statically declared type.
    #[inline]
    pub fn declared(&self) -> &TypeHandle {
        &self.declared
    }

    #[inline]
    pub fn site(&self) -> &Arc<dyn DataSite> {
        &self.site
    }

    #[inline]
    pub fn marker(&self) -> Option<&FieldMarker> {
        self.marker.as_ref()
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("declared", &self.declared.path())
            .field("marker", &self.marker)
            .finish()
    }
}

// -----------------------------------------------------------------------------
// ClassModel

/// The structure of a host class, as exposed by the marker layer.
///
/// # Examples
///
/// ```
/// use ts_schema::handle::{TypeHandle, Typed};
/// use ts_schema::model::{ClassModel, FieldMarker, Member, TypeMarker};
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl Typed for Point {
///     fn type_handle() -> TypeHandle {
///         TypeHandle::class::<Self>("demo::Point", || {
///             ClassModel::new()
///                 .marked(TypeMarker::new())
///                 .with_factory::<Point>()
///                 .with_member(Member::field("x", |p: &Point| &p.x, |p| &mut p.x).marked(FieldMarker::new()))
///                 .with_member(Member::field("y", |p: &Point| &p.y, |p| &mut p.y).marked(FieldMarker::new()))
///         })
///     }
/// }
///
/// let model = Point::type_handle();
/// assert_eq!(model.model().unwrap().members().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClassModel {
    marker: Option<TypeMarker>,
    parent: Option<ParentLink>,
    factory: Option<Factory>,
    hooks: Hooks,
    members: Vec<Member>,
}

impl ClassModel {
    /// An unmarked model without members.
    #[inline]
    pub const fn new() -> Self {
        Self {
            marker: None,
            parent: None,
            factory: None,
            hooks: Hooks::new(),
            members: Vec::new(),
        }
    }

    /// Makes the class participate.
    pub fn marked(mut self, marker: TypeMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    /// Declares `P` as the parent, embedded in `C` and reached through the accessors.
    pub fn with_parent<C: Typed, P: Typed>(
        mut self,
        get: fn(&C) -> &P,
        get_mut: fn(&mut C) -> &mut P,
    ) -> Self {
        self.parent = Some(ParentLink {
            handle: P::type_handle(),
            upcast: Arc::new(UpcastFn { get, get_mut }),
        });
        self
    }

    /// Uses `C::default()` as the blank-instance factory.
    pub fn with_factory<C: Instance + Default>(mut self) -> Self {
        self.factory = Some(Factory::of::<C>());
        self
    }

    /// Registers the callback run after an instance is populated.
    pub fn with_post_construct<C: Typed>(mut self, f: fn(&mut C) -> Result<(), HookError>) -> Self {
        self.hooks.set_post_construct(Hook::new(f));
        self
    }

    /// Registers the validation callback.
    pub fn with_validation<C: Typed>(mut self, f: fn(&mut C) -> Result<(), HookError>) -> Self {
        self.hooks.set_validate(Hook::new(f));
        self
    }

    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    #[inline]
    pub fn marker(&self) -> Option<&TypeMarker> {
        self.marker.as_ref()
    }

    #[inline]
    pub fn parent(&self) -> Option<&ParentLink> {
        self.parent.as_ref()
    }

    #[inline]
    pub fn factory(&self) -> Option<Factory> {
        self.factory
    }

    /// Hooks declared directly on this class.
    #[inline]
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// Members in declaration order.
    #[inline]
    pub fn members(&self) -> &[Member] {
        &self.members
    }
}
