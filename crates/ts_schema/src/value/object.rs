use core::any::Any;
use core::fmt;

use crate::handle::{TypeHandle, Typed};

// -----------------------------------------------------------------------------
// Instance

/// A host instance that can travel inside a [`Value`](super::Value).
///
/// Blanket-implemented for every `Typed + Clone + PartialEq + Debug` type.
pub trait Instance: Any + Send + Sync + fmt::Debug {
    /// Returns the handle of the concrete runtime type.
    fn instance_handle(&self) -> TypeHandle;

    fn clone_instance(&self) -> Box<dyn Instance>;

    /// Returns `false` for instances of different types.
    fn eq_instance(&self, other: &dyn Instance) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Typed + Clone + PartialEq + fmt::Debug> Instance for T {
    #[inline]
    fn instance_handle(&self) -> TypeHandle {
        T::type_handle()
    }

    #[inline]
    fn clone_instance(&self) -> Box<dyn Instance> {
        Box::new(self.clone())
    }

    fn eq_instance(&self, other: &dyn Instance) -> bool {
        match other.as_any().downcast_ref::<T>() {
            Some(other) => self == other,
            None => false,
        }
    }

    #[inline(always)]
    fn as_any(&self) -> &dyn Any {
        self
    }

    #[inline(always)]
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    #[inline(always)]
    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl dyn Instance {
    /// Returns `true` if the underlying value is of type `T`.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Downcasts the box to `T`, giving it back on a type mismatch.
    #[inline]
    #[expect(unsafe_code, reason = "type is already checked")]
    pub fn downcast<T: Any>(self: Box<Self>) -> Result<Box<T>, Box<dyn Instance>> {
        if self.is::<T>() {
            Ok(unsafe { self.into_any().downcast::<T>().unwrap_unchecked() })
        } else {
            Err(self)
        }
    }
}

// -----------------------------------------------------------------------------
// ObjectValue

/// A boxed host instance of any type.
///
/// `ObjectValue` is also the universal root type: a member declared as
/// `ObjectValue` accepts every concrete type.
///
/// # Examples
///
/// ```
/// use ts_schema::handle::Typed;
/// use ts_schema::value::ObjectValue;
///
/// let value = ObjectValue::new(String::from("hello"));
/// assert_eq!(value.handle(), String::type_handle());
/// assert_eq!(value.downcast_ref::<String>().unwrap(), "hello");
///
/// // Wrapping an object value does not nest it.
/// let again = ObjectValue::new(value.clone());
/// assert_eq!(again, value);
/// ```
pub struct ObjectValue(Box<dyn Instance>);

impl ObjectValue {
    pub fn new<T: Instance>(value: T) -> Self {
        let boxed: Box<dyn Instance> = Box::new(value);
        match boxed.downcast::<ObjectValue>() {
            Ok(nested) => *nested,
            Err(boxed) => Self(boxed),
        }
    }

    #[inline]
    pub fn from_boxed(value: Box<dyn Instance>) -> Self {
        Self(value)
    }

    /// Returns the handle of the wrapped value's runtime type.
    #[inline]
    pub fn handle(&self) -> TypeHandle {
        self.0.instance_handle()
    }

    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.0.is::<T>()
    }

    #[inline]
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref()
    }

    #[inline]
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.0.downcast_mut()
    }

    /// Moves the wrapped value out, giving `self` back on a type mismatch.
    pub fn take<T: Any>(self) -> Result<T, Self> {
        self.0.downcast::<T>().map(|value| *value).map_err(Self)
    }

    #[inline]
    pub fn as_instance(&self) -> &dyn Instance {
        &*self.0
    }

    #[inline]
    pub fn as_instance_mut(&mut self) -> &mut dyn Instance {
        &mut *self.0
    }

    #[inline]
    pub fn into_boxed(self) -> Box<dyn Instance> {
        self.0
    }
}

impl Clone for ObjectValue {
    fn clone(&self) -> Self {
        Self(self.0.clone_instance())
    }
}

impl PartialEq for ObjectValue {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_instance(&*other.0)
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl Typed for ObjectValue {
    fn type_handle() -> TypeHandle {
        TypeHandle::root::<Self>("ts_schema::value::ObjectValue", "Object")
    }
}

#[cfg(test)]
mod tests {
    use super::{Instance, ObjectValue};
    use crate::handle::Typed;

    #[test]
    fn take_returns_the_value_or_itself() {
        let value = ObjectValue::new(7_i32);
        let value = value.take::<String>().unwrap_err();
        assert_eq!(value.take::<i32>().unwrap(), 7);
    }

    #[test]
    fn downcast_and_flattening() {
        let boxed: Box<dyn Instance> = Box::new(3_i64);
        let boxed = boxed.downcast::<i32>().unwrap_err();
        assert_eq!(*boxed.downcast::<i64>().unwrap(), 3);

        let inner = ObjectValue::new(String::from("x"));
        let outer = ObjectValue::new(inner.clone());
        assert_eq!(outer.handle(), String::type_handle());
        assert_eq!(outer, inner);
    }

    #[test]
    fn equality_requires_same_type() {
        let a = ObjectValue::new(1_i32);
        let b = ObjectValue::new(1_i64);
        assert_ne!(a, b);
        assert_eq!(a, ObjectValue::new(1_i32));
    }

    #[test]
    fn boxed_instance_reports_runtime_handle() {
        let boxed: Box<dyn Instance> = Box::new(String::from("x"));
        assert_eq!(boxed.instance_handle(), String::type_handle());
        assert!(boxed.is::<String>());
    }
}
