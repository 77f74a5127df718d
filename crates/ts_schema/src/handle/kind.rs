use core::fmt;

// -----------------------------------------------------------------------------
// Terminal

/// The native value families that never get a structural description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    Int32,
    Int64,
    Float32,
    Float64,
    Bool,
    Text,
    DateTime,
    Period,
    Identifier,
    Bytes,
}

impl fmt::Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int32 => f.pad("Int32"),
            Self::Int64 => f.pad("Int64"),
            Self::Float32 => f.pad("Float32"),
            Self::Float64 => f.pad("Float64"),
            Self::Bool => f.pad("Bool"),
            Self::Text => f.pad("Text"),
            Self::DateTime => f.pad("DateTime"),
            Self::Period => f.pad("Period"),
            Self::Identifier => f.pad("Identifier"),
            Self::Bytes => f.pad("Bytes"),
        }
    }
}

// -----------------------------------------------------------------------------
// TypeKind

/// How a [`TypeHandle`](crate::handle::TypeHandle) is shaped.
///
/// - `Collection`, `Array` and `Nullable` take one generic argument.
/// - `Map` takes two: key then value.
/// - `Class` is the only kind that can be structurally described.
/// - `Root` is the universal root, every type is assignable to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Terminal(Terminal),
    Enum(&'static [&'static str]),
    Collection,
    Array(usize),
    Map,
    Nullable,
    Class,
    Root,
}

impl TypeKind {
    /// Number of generic arguments this kind requires.
    pub const fn arity(&self) -> usize {
        match self {
            Self::Collection | Self::Array(_) | Self::Nullable => 1,
            Self::Map => 2,
            Self::Terminal(_) | Self::Enum(_) | Self::Class | Self::Root => 0,
        }
    }

    /// Returns the terminal family, if any.
    #[inline]
    pub const fn terminal(&self) -> Option<Terminal> {
        match self {
            Self::Terminal(terminal) => Some(*terminal),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Terminal(terminal) => write!(f, "Terminal({terminal})"),
            Self::Enum(labels) => write!(f, "Enum({})", labels.len()),
            Self::Collection => f.pad("Collection"),
            Self::Array(len) => write!(f, "Array({len})"),
            Self::Map => f.pad("Map"),
            Self::Nullable => f.pad("Nullable"),
            Self::Class => f.pad("Class"),
            Self::Root => f.pad("Root"),
        }
    }
}
