use core::fmt;
use std::borrow::Cow;
use std::sync::{Arc, Weak};

use crate::AccessError;
use crate::descriptor::{FieldValue, TypeDescriptor, TypeSet, ValueCategory};
use crate::model::Upcast;
use crate::site::{DataSite, InheritedSite};
use crate::value::{Instance, Value};

/// One exposed member of a described type.
///
/// A field knows two types: the *declaring* type that introduced it and
/// the *containing* type whose field table holds it. They differ for
/// fields inherited from a parent.
///
/// Field descriptors are immutable; inheriting a field produces a new
/// descriptor through [`clone_for`](Self::clone_for).
#[derive(Clone)]
pub struct FieldDescriptor {
    name: Cow<'static, str>,
    member: &'static str,
    value: FieldValue,
    site: Arc<dyn DataSite>,
    declaring: Weak<TypeDescriptor>,
    containing: Weak<TypeDescriptor>,
}

impl FieldDescriptor {
    /// A field introduced by `owner`, which both declares and contains it.
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        member: &'static str,
        value: FieldValue,
        site: Arc<dyn DataSite>,
        owner: &Arc<TypeDescriptor>,
    ) -> Self {
        Self {
            name: name.into(),
            member,
            value,
            site,
            declaring: Arc::downgrade(owner),
            containing: Arc::downgrade(owner),
        }
    }

    /// Copies this field into `child`, reaching the original member
    /// through `upcast`.
    ///
    /// The copy keeps the declaring type; its containing type is `child`.
    pub fn clone_for(&self, child: &Arc<TypeDescriptor>, upcast: &Arc<dyn Upcast>) -> Self {
        let site = InheritedSite::new(self.site.clone(), upcast.clone(), child.handle().clone());
        Self {
            name: self.name.clone(),
            member: self.member,
            value: self.value.clone(),
            site: Arc::new(site),
            declaring: self.declaring.clone(),
            containing: Arc::downgrade(child),
        }
    }

    /// The display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The host member name.
    #[inline]
    pub fn member(&self) -> &'static str {
        self.member
    }

    #[inline]
    pub fn category(&self) -> ValueCategory {
        self.value.category()
    }

    #[inline]
    pub fn value(&self) -> &FieldValue {
        &self.value
    }

    /// The legal value (or element) types.
    #[inline]
    pub fn value_types(&self) -> &TypeSet {
        self.value.values()
    }

    /// The legal key types, `None` unless the field is a map.
    #[inline]
    pub fn key_types(&self) -> Option<&TypeSet> {
        self.value.keys()
    }

    #[inline]
    pub fn is_polymorphic(&self) -> bool {
        self.value.is_polymorphic()
    }

    #[inline]
    pub fn site(&self) -> &Arc<dyn DataSite> {
        &self.site
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.site.is_read_only()
    }

    /// The type that introduced this field.
    pub fn declaring_type(&self) -> Option<Arc<TypeDescriptor>> {
        self.declaring.upgrade()
    }

    /// The type whose field table holds this field.
    pub fn containing_type(&self) -> Option<Arc<TypeDescriptor>> {
        self.containing.upgrade()
    }

    /// Returns `true` if `descriptor` is the containing type.
    #[inline]
    pub fn is_contained_by(&self, descriptor: &Arc<TypeDescriptor>) -> bool {
        core::ptr::eq(self.containing.as_ptr(), Arc::as_ptr(descriptor))
    }

    /// Returns `true` if `descriptor` is the declaring type.
    #[inline]
    pub fn is_declared_by(&self, descriptor: &Arc<TypeDescriptor>) -> bool {
        core::ptr::eq(self.declaring.as_ptr(), Arc::as_ptr(descriptor))
    }

    /// Reads the field from `instance`.
    pub fn get_data(&self, instance: &dyn Instance) -> Result<Value, AccessError> {
        self.site.get(instance.as_any())
    }

    /// Writes `value` into the field of `instance`.
    pub fn set_data(&self, instance: &mut dyn Instance, value: Value) -> Result<(), AccessError> {
        self.site.set(instance.as_any_mut(), value)
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let declaring = self.declaring_type();
        let containing = self.containing_type();
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("member", &self.member)
            .field("value", &self.value)
            .field("declaring", &declaring.as_ref().map(|d| d.name()))
            .field("containing", &containing.as_ref().map(|d| d.name()))
            .finish()
    }
}
