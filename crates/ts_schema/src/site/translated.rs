use core::any::Any;
use std::sync::Arc;

use crate::AccessError;
use crate::site::DataSite;
use crate::translate::SharedTranslator;
use crate::value::Value;

/// A [`DataSite`] that converts values on their way in and out.
///
/// Reads return `getter(inner.get(instance))`; writes store
/// `setter(value)` through the inner site.
#[derive(Debug, Clone)]
pub struct TranslatedDataSite {
    inner: Arc<dyn DataSite>,
    getter: SharedTranslator,
    setter: SharedTranslator,
}

impl TranslatedDataSite {
    pub fn new(inner: Arc<dyn DataSite>, getter: SharedTranslator, setter: SharedTranslator) -> Self {
        Self {
            inner,
            getter,
            setter,
        }
    }

    #[inline]
    pub fn inner(&self) -> &Arc<dyn DataSite> {
        &self.inner
    }

    #[inline]
    pub fn getter(&self) -> &SharedTranslator {
        &self.getter
    }

    #[inline]
    pub fn setter(&self) -> &SharedTranslator {
        &self.setter
    }
}

impl DataSite for TranslatedDataSite {
    #[inline]
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn get(&self, instance: &dyn Any) -> Result<Value, AccessError> {
        let raw = self.inner.get(instance)?;
        self.getter.convert(raw).map_err(|source| AccessError::Conversion {
            field: self.name().to_owned(),
            source,
        })
    }

    fn set(&self, instance: &mut dyn Any, value: Value) -> Result<(), AccessError> {
        let value = self.setter.convert(value).map_err(|source| AccessError::Conversion {
            field: self.name().to_owned(),
            source,
        })?;
        self.inner.set(instance, value)
    }

    #[inline]
    fn is_read_only(&self) -> bool {
        self.inner.is_read_only()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::TranslatedDataSite;
    use crate::handle::{TypeHandle, Typed};
    use crate::model::ClassModel;
    use crate::site::{DataSite, FieldSite};
    use crate::{AccessError, ConversionError};
    use crate::translate::Translator;
    use crate::value::Value;

    #[derive(Debug)]
    struct IntToText;

    impl Translator for IntToText {
        fn convert(&self, value: Value) -> Result<Value, ConversionError> {
            match value {
                Value::Int32(v) => Ok(Value::Text(v.to_string())),
                other => Err(other.unexpected("int32")),
            }
        }
    }

    #[derive(Debug)]
    struct TextToInt;

    impl Translator for TextToInt {
        fn convert(&self, value: Value) -> Result<Value, ConversionError> {
            let text = value.into_text()?;
            text.parse::<i32>()
                .map(Value::Int32)
                .map_err(|err| ConversionError::Malformed {
                    input: text.clone(),
                    reason: err.to_string(),
                })
        }
    }

    #[derive(Debug, Default)]
    struct Counter {
        count: i32,
    }

    impl Typed for Counter {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Counter", ClassModel::new)
        }
    }

    fn count(c: &Counter) -> &i32 {
        &c.count
    }

    fn count_mut(c: &mut Counter) -> &mut i32 {
        &mut c.count
    }

    #[test]
    fn converts_both_ways() {
        let inner = Arc::new(FieldSite::new("count", count, Some(count_mut)));
        let site = TranslatedDataSite::new(inner, Arc::new(IntToText), Arc::new(TextToInt));

        let mut counter = Counter { count: 5 };
        assert_eq!(site.get(&counter).unwrap(), Value::Text("5".into()));
        site.set(&mut counter, Value::Text("12".into())).unwrap();
        assert_eq!(counter.count, 12);
        assert!(matches!(
            site.set(&mut counter, Value::Text("x".into())),
            Err(AccessError::Conversion { .. })
        ));
        assert!(!site.is_read_only());
    }
}
