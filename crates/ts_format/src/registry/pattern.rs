use core::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwap;
use regex::Regex;
use ts_schema::handle::{Terminal, TypeHandle, TypeKind};
use ts_utils::hash::HashMap;

use crate::LookupError;
use crate::registry::terminal_handles;

type Snapshot = HashMap<TypeHandle, Arc<str>>;

/// The fragment matching the text form of a terminal family.
const fn terminal_fragment(terminal: Terminal) -> &'static str {
    match terminal {
        Terminal::Int32 | Terminal::Int64 => r"[+-]?\d+",
        Terminal::Float32 | Terminal::Float64 => {
            r"(?:[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?|[+-]?inf|NaN)"
        }
        Terminal::Bool => r"(?:true|false)",
        Terminal::Text => r"(?s:.*)",
        Terminal::DateTime => {
            r"\d{4}-\d{2}-\d{2}[Tt]\d{2}:\d{2}:\d{2}(?:\.\d+)?(?:[Zz]|[+-]\d{2}:\d{2})"
        }
        Terminal::Period => r"PT\d+(?:\.\d{1,9})?S",
        Terminal::Identifier => r"[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12}",
        Terminal::Bytes => r"(?:[A-Za-z0-9+/]{4})*(?:[A-Za-z0-9+/]{2}==|[A-Za-z0-9+/]{3}=)?",
    }
}

fn enum_fragment(labels: &[&str]) -> String {
    let alternatives: Vec<String> = labels.iter().map(|label| regex::escape(label)).collect();
    format!("(?:{})", alternatives.join("|"))
}

/// Regular-expression fragments matching the text form of a type.
///
/// Fragments use non-capturing groups only and are not anchored, so they
/// can be embedded in larger patterns; [`anchored`](Self::anchored)
/// compiles one for whole-input matching. Enumerations get a label
/// alternation on first request.
///
/// # Examples
///
/// ```
/// use ts_format::registry::PatternRegistry;
/// use ts_schema::handle::Typed;
///
/// let patterns = PatternRegistry::with_defaults();
/// let int = patterns.anchored(&i32::type_handle()).unwrap();
///
/// assert!(int.is_match("-17"));
/// assert!(!int.is_match("17 apples"));
/// ```
pub struct PatternRegistry {
    entries: ArcSwap<Snapshot>,
    writer: Mutex<()>,
}

impl PatternRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Snapshot::default()),
            writer: Mutex::new(()),
        }
    }

    /// A registry holding fragments for every terminal type.
    pub fn with_defaults() -> Self {
        let mut entries = Snapshot::default();
        for handle in terminal_handles() {
            if let TypeKind::Terminal(terminal) = handle.kind() {
                entries.insert(handle, Arc::from(terminal_fragment(terminal)));
            }
        }
        Self {
            entries: ArcSwap::from_pointee(entries),
            writer: Mutex::new(()),
        }
    }

    /// Registers `fragment` for `handle` (without nullable layers),
    /// returning the fragment it replaces.
    pub fn register(&self, handle: &TypeHandle, fragment: impl Into<Arc<str>>) -> Option<Arc<str>> {
        let handle = handle.non_null();
        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);

        let mut next: Snapshot = (**self.entries.load()).clone();
        let previous = next.insert(handle.clone(), fragment.into());
        self.entries.store(Arc::new(next));

        match &previous {
            Some(_) => log::warn!("pattern for `{handle}` overwritten"),
            None => log::debug!("pattern registered for `{handle}`"),
        }
        previous
    }

    /// Returns the fragment of `handle`.
    pub fn get(&self, handle: &TypeHandle) -> Result<Arc<str>, LookupError> {
        let handle = handle.non_null();
        if let Some(fragment) = self.entries.load().get(&handle) {
            return Ok(fragment.clone());
        }
        let TypeKind::Enum(labels) = handle.kind() else {
            return Err(LookupError::NoPattern {
                ty: handle.path().to_owned(),
            });
        };

        let _guard = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        let current = self.entries.load();
        if let Some(fragment) = current.get(&handle) {
            return Ok(fragment.clone());
        }

        log::trace!("synthesizing pattern for enum `{handle}`");
        let fragment: Arc<str> = Arc::from(enum_fragment(labels));
        let mut next: Snapshot = (**current).clone();
        next.insert(handle, fragment.clone());
        self.entries.store(Arc::new(next));
        Ok(fragment)
    }

    /// Compiles the fragment of `handle` as `^(?:fragment)$`.
    pub fn anchored(&self, handle: &TypeHandle) -> Result<Regex, LookupError> {
        let fragment = self.get(handle)?;
        Regex::new(&format!("^(?:{fragment})$")).map_err(|e| LookupError::InvalidPattern {
            ty: handle.non_null().path().to_owned(),
            reason: e.to_string(),
        })
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

impl Default for PatternRegistry {
    #[inline]
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl fmt::Debug for PatternRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternRegistry").field("len", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use chrono::{DateTime, Utc};
    use ts_schema::handle::Typed;
    use ts_schema::impl_labeled;
    use uuid::Uuid;

    use super::PatternRegistry;
    use crate::LookupError;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Op {
        Plus,
        Star,
    }

    impl_labeled!(Op, "tests::Op" { Plus => "a+b", Star => "a*" });

    #[test]
    fn terminal_fragments() {
        let patterns = PatternRegistry::with_defaults();
        let float = patterns.anchored(&f64::type_handle()).unwrap();
        assert!(float.is_match("1.5e-3"));
        assert!(float.is_match(".5"));
        assert!(!float.is_match("1.5.5"));

        let at = patterns.anchored(&DateTime::<Utc>::type_handle()).unwrap();
        assert!(at.is_match("2024-02-29T12:30:00Z"));
        assert!(at.is_match("2024-02-29T12:30:00.25+02:00"));

        let period = patterns.anchored(&Duration::type_handle()).unwrap();
        assert!(period.is_match("PT1.5S"));
        assert!(!period.is_match("PT1.S"));

        let id = patterns.anchored(&Option::<Uuid>::type_handle()).unwrap();
        assert!(id.is_match("12345678-9abc-def0-1234-56789abcdef0"));
    }

    #[test]
    fn fragments_do_not_capture() {
        let patterns = PatternRegistry::with_defaults();
        for handle in crate::registry::terminal_handles() {
            assert_eq!(patterns.anchored(&handle).unwrap().captures_len(), 1, "{handle}");
        }
    }

    #[test]
    fn enum_labels_are_escaped() {
        let patterns = PatternRegistry::new();
        assert_eq!(&*patterns.get(&Op::type_handle()).unwrap(), r"(?:a\+b|a\*)");

        let op = patterns.anchored(&Op::type_handle()).unwrap();
        assert!(op.is_match("a+b"));
        assert!(!op.is_match("aab"));
        assert_eq!(patterns.len(), 1);
    }

    #[test]
    fn missing_and_invalid() {
        let patterns = PatternRegistry::new();
        assert!(matches!(patterns.get(&i32::type_handle()), Err(LookupError::NoPattern { .. })));

        patterns.register(&i32::type_handle(), "(");
        assert!(matches!(
            patterns.anchored(&i32::type_handle()),
            Err(LookupError::InvalidPattern { .. })
        ));
    }
}
