use core::any::Any;
use core::fmt;

use crate::AccessError;
use crate::handle::Typed;
use crate::site::DataSite;
use crate::value::{FromValue, ToValue, Value};

/// A [`DataSite`] over a field of `C` with type `F`.
///
/// Built from a shared accessor and, for writable members, a mutable one.
pub struct FieldSite<C, F> {
    name: &'static str,
    get: fn(&C) -> &F,
    get_mut: Option<fn(&mut C) -> &mut F>,
}

impl<C, F> FieldSite<C, F> {
    #[inline]
    pub const fn new(
        name: &'static str,
        get: fn(&C) -> &F,
        get_mut: Option<fn(&mut C) -> &mut F>,
    ) -> Self {
        Self { name, get, get_mut }
    }
}

impl<C: Typed, F> FieldSite<C, F> {
    #[cold]
    fn wrong_instance(&self) -> AccessError {
        AccessError::WrongInstance {
            site: self.name.to_owned(),
            expected: C::type_handle().path().to_owned(),
        }
    }
}

impl<C, F> DataSite for FieldSite<C, F>
where
    C: Typed,
    F: ToValue + FromValue + Send + Sync + 'static,
{
    #[inline]
    fn name(&self) -> &str {
        self.name
    }

    fn get(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let instance = instance.downcast_ref::<C>().ok_or_else(|| self.wrong_instance())?;
        Ok((self.get)(instance).to_value())
    }

    fn set(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let Some(get_mut) = self.get_mut else {
            return Err(AccessError::ReadOnly {
                field: self.name.to_owned(),
            });
        };
        let instance = instance.downcast_mut::<C>().ok_or_else(|| self.wrong_instance())?;
        let value = F::from_value(value).map_err(|source| AccessError::Conversion {
            field: self.name.to_owned(),
            source,
        })?;
        *get_mut(instance) = value;
        Ok(())
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.get_mut.is_none()
    }
}

impl<C, F> fmt::Debug for FieldSite<C, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSite")
            .field("name", &self.name)
            .field("owner", &core::any::type_name::<C>())
            .field("read_only", &self.get_mut.is_none())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::FieldSite;
    use crate::AccessError;
    use crate::ConversionError;
    use crate::handle::{TypeHandle, Typed};
    use crate::model::ClassModel;
    use crate::site::DataSite;
    use crate::value::Value;

    #[derive(Debug, Default)]
    struct Sample {
        count: i32,
    }

    impl Typed for Sample {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Sample", ClassModel::new)
        }
    }

    fn count(s: &Sample) -> &i32 {
        &s.count
    }

    fn count_mut(s: &mut Sample) -> &mut i32 {
        &mut s.count
    }

    #[test]
    fn reads_and_writes() {
        let site = FieldSite::new("count", count, Some(count_mut));
        let mut sample = Sample::default();
        site.set(&mut sample, Value::Int32(3)).unwrap();
        assert_eq!(sample.count, 3);
        assert_eq!(site.get(&sample).unwrap(), Value::Int32(3));
    }

    #[test]
    fn failures_are_reported() {
        let read_only = FieldSite::new("count", count, None);
        let mut sample = Sample::default();
        assert_eq!(
            read_only.set(&mut sample, Value::Int32(1)),
            Err(AccessError::ReadOnly {
                field: "count".into()
            })
        );

        let site = FieldSite::new("count", count, Some(count_mut));
        assert!(matches!(
            site.get(&String::new()),
            Err(AccessError::WrongInstance { .. })
        ));
        assert_eq!(
            site.set(&mut sample, Value::Text("x".into())),
            Err(AccessError::Conversion {
                field: "count".into(),
                source: ConversionError::UnexpectedValue {
                    expected: "integer",
                    found: "text",
                },
            })
        );
    }
}
