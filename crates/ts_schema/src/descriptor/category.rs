use core::fmt;

/// How the value of a field is shaped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    /// A single value.
    Object,
    /// An ordered sequence of values.
    Collection,
    /// An association of keys to values.
    Map,
}

impl fmt::Display for ValueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Object => f.pad("Object"),
            Self::Collection => f.pad("Collection"),
            Self::Map => f.pad("Map"),
        }
    }
}
