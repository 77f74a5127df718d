use core::fmt;
use core::marker::PhantomData;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use ts_schema::handle::{TypeHandle, TypeKind};
use ts_utils::hash::HashMap;

use crate::LookupError;
use crate::registry::{Format, TranslatorPair, terminal_handles};

type Snapshot = HashMap<TypeHandle, TranslatorPair>;

/// Translator pairs of one [`Format`], keyed by type handle.
///
/// - `Nullable` handles resolve to their inner type.
/// - Enumerations without an entry get the format's label translators,
///   built and cached on first request.
/// - Anything else without an entry is [`LookupError::NotRegistered`].
///
/// # Examples
///
/// ```
/// use ts_format::registry::{Text, TranslatorRegistry};
/// use ts_schema::handle::Typed;
/// use ts_schema::translate::Translator;
/// use ts_schema::value::Value;
///
/// let registry = TranslatorRegistry::<Text>::with_defaults();
/// let pair = registry.get(&Option::<i64>::type_handle()).unwrap();
///
/// assert_eq!(pair.to_external.convert(Value::Int64(7)).unwrap(), Value::from("7"));
/// ```
pub struct TranslatorRegistry<F: Format> {
    entries: ArcSwap<Snapshot>,
    writer: Mutex<()>,
    _format: PhantomData<fn() -> F>,
}

impl<F: Format> TranslatorRegistry<F> {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Snapshot::default()),
            writer: Mutex::new(()),
            _format: PhantomData,
        }
    }

    /// A registry holding the format's translators for every terminal type.
    pub fn with_defaults() -> Self {
        let mut entries = Snapshot::default();
        for handle in terminal_handles() {
            if let TypeKind::Terminal(terminal) = handle.kind() {
                entries.insert(handle, F::terminal_pair(terminal));
            }
        }
        Self {
            entries: ArcSwap::from_pointee(entries),
            writer: Mutex::new(()),
            _format: PhantomData,
        }
    }

    /// Registers `pair` for `handle` (without nullable layers), returning
    /// the pair it replaces.
    pub fn register(&self, handle: &TypeHandle, pair: TranslatorPair) -> Option<TranslatorPair> {
        let handle = handle.non_null();
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next: Snapshot = (**self.entries.load()).clone();
        let previous = next.insert(handle.clone(), pair);
        self.entries.store(Arc::new(next));

        match &previous {
            Some(_) => log::warn!("{} translators for `{handle}` overwritten", F::NAME),
            None => log::debug!("{} translators registered for `{handle}`", F::NAME),
        }
        previous
    }

    /// Returns the pair of `handle`.
    pub fn get(&self, handle: &TypeHandle) -> Result<TranslatorPair, LookupError> {
        let handle = handle.non_null();
        if let Some(pair) = self.entries.load().get(&handle) {
            return Ok(pair.clone());
        }
        if !handle.is_enum() {
            return Err(LookupError::NotRegistered {
                format: F::NAME,
                ty: handle.path().to_owned(),
            });
        }

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.entries.load();
        if let Some(pair) = current.get(&handle) {
            return Ok(pair.clone());
        }

        log::trace!("synthesizing {} translators for enum `{handle}`", F::NAME);
        let pair = F::enum_pair(&handle);
        let mut next: Snapshot = (**current).clone();
        next.insert(handle, pair.clone());
        self.entries.store(Arc::new(next));
        Ok(pair)
    }

    /// Returns `true` if `handle` has an entry, synthesized or registered.
    pub fn contains(&self, handle: &TypeHandle) -> bool {
        self.entries.load().contains_key(&handle.non_null())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }
}

impl<F: Format> Default for TranslatorRegistry<F> {
    #[inline]
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl<F: Format> fmt::Debug for TranslatorRegistry<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslatorRegistry")
            .field("format", &F::NAME)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use ts_schema::handle::Typed;
    use ts_schema::impl_labeled;
    use ts_schema::translate::{Identity, Translator};
    use ts_schema::value::{ObjectValue, ToValue, Value};

    use super::TranslatorRegistry;
    use crate::LookupError;
    use crate::registry::{Binary, Text, TranslatorPair};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Phase {
        New,
        Full,
    }

    impl_labeled!(Phase, "tests::Phase" { New => "NEW", Full => "FULL" });

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Side {
        Buy,
        Sell,
    }

    impl_labeled!(Side, "tests::Side" { Buy => "BUY", Sell => "SELL" });

    #[test]
    fn defaults_cover_terminals() {
        let text = TranslatorRegistry::<Text>::with_defaults();
        let pair = text.get(&u16::type_handle()).unwrap();
        assert_eq!(pair.from_external.convert(Value::from("65")), Ok(Value::Int32(65)));

        let binary = TranslatorRegistry::<Binary>::with_defaults();
        let pair = binary.get(&bool::type_handle()).unwrap();
        assert_eq!(pair.to_external.convert(Value::Bool(true)), Ok(Value::Bytes(vec![1])));
    }

    #[test]
    fn nullable_resolves_inner() {
        let text = TranslatorRegistry::<Text>::with_defaults();
        let pair = text.get(&Option::<Option<f64>>::type_handle()).unwrap();
        assert_eq!(pair.to_external.convert(Value::Float64(0.5)), Ok(Value::from("0.5")));
    }

    #[test]
    fn unregistered_is_an_error() {
        let text = TranslatorRegistry::<Text>::new();
        assert_eq!(
            text.get(&i32::type_handle()).unwrap_err(),
            LookupError::NotRegistered {
                format: "text",
                ty: String::from("i32"),
            }
        );
        assert!(text.get(&ObjectValue::type_handle()).is_err());
    }

    #[test]
    fn enums_are_synthesized_once() {
        let text = TranslatorRegistry::<Text>::new();
        assert!(!text.contains(&Phase::type_handle()));

        let pair = text.get(&Phase::type_handle()).unwrap();
        assert_eq!(pair.to_external.convert(Phase::Full.to_value()), Ok(Value::from("FULL")));
        assert!(text.contains(&Phase::type_handle()));

        let again = text.get(&Phase::type_handle()).unwrap();
        assert!(Arc::ptr_eq(&pair.to_external, &again.to_external));
    }

    #[test]
    fn concurrent_synthesis_agrees() {
        let text = Arc::new(TranslatorRegistry::<Text>::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let text = text.clone();
                thread::spawn(move || text.get(&Side::type_handle()).unwrap())
            })
            .collect();
        let pairs: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        for pair in &pairs[1..] {
            assert!(Arc::ptr_eq(&pairs[0].to_external, &pair.to_external));
        }
        assert_eq!(text.len(), 1);
    }

    #[test]
    fn register_replaces() {
        let text = TranslatorRegistry::<Text>::with_defaults();
        let identity = TranslatorPair::new(Arc::new(Identity), Arc::new(Identity));
        assert!(text.register(&Option::<i32>::type_handle(), identity.clone()).is_some());
        let pair = text.get(&i32::type_handle()).unwrap();
        assert_eq!(pair.to_external.convert(Value::Int32(3)), Ok(Value::Int32(3)));
        assert!(text.register(&Phase::type_handle(), identity).is_none());
    }
}
