//! Pure value-to-value conversions.

use core::fmt;
use std::sync::Arc;

use crate::ConversionError;
use crate::value::Value;

/// A pure conversion from one [`Value`] to another.
///
/// Translators hold configuration only, so one instance may be shared by
/// any number of sites and threads.
pub trait Translator: Send + Sync + fmt::Debug {
    fn convert(&self, value: Value) -> Result<Value, ConversionError>;
}

/// A translator shared between sites and registries.
pub type SharedTranslator = Arc<dyn Translator>;

impl<T: Translator + ?Sized> Translator for Arc<T> {
    #[inline]
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        (**self).convert(value)
    }
}

/// Returns its input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Translator for Identity {
    #[inline]
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        Ok(value)
    }
}

/// Runs `first`, then `second` on its output.
#[derive(Debug, Clone)]
pub struct Chain {
    first: SharedTranslator,
    second: SharedTranslator,
}

impl Chain {
    pub fn new(first: SharedTranslator, second: SharedTranslator) -> Self {
        Self { first, second }
    }
}

impl Translator for Chain {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        self.second.convert(self.first.convert(value)?)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Chain, Identity, Translator};
    use crate::ConversionError;
    use crate::value::Value;

    #[derive(Debug)]
    struct Negate;

    impl Translator for Negate {
        fn convert(&self, value: Value) -> Result<Value, ConversionError> {
            match value {
                Value::Int32(v) => Ok(Value::Int32(-v)),
                other => Err(other.unexpected("int32")),
            }
        }
    }

    #[test]
    fn chain_applies_in_order() {
        let chain = Chain::new(Arc::new(Negate), Arc::new(Identity));
        assert_eq!(chain.convert(Value::Int32(4)).unwrap(), Value::Int32(-4));
        assert!(chain.convert(Value::Bool(true)).is_err());
    }
}
