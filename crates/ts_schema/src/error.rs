use thiserror::Error;

// -----------------------------------------------------------------------------
// ConfigError

/// A type or field is structurally invalid for the descriptor engine.
///
/// Raised synchronously by [`generate_type`](crate::engine::DescriptorEngine::generate_type);
/// nothing generated by the failing request is published.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("field `{owner}.{field}`: `{alternative}` is not assignable to `{declared}`")]
    NotAssignable {
        owner: String,
        field: String,
        declared: String,
        alternative: String,
    },

    #[error("type `{ty}` expects {expected} generic argument(s), found {found}")]
    MissingTypeArgument {
        ty: String,
        expected: usize,
        found: usize,
    },

    #[error("type `{ty}` introduces field `{field}` more than once")]
    DuplicateField { ty: String, field: String },

    #[error("field `{field}` is contained by `{container}`, not by `{ty}`")]
    ForeignField {
        ty: String,
        field: String,
        container: String,
    },

    #[error("descriptor `{ty}` is already frozen")]
    AlreadyFrozen { ty: String },

    #[error("field `{field}` has no legal value types")]
    EmptyTypeSet { field: String },

    #[error("field `{owner}.{field}` lists key types but is not map-like")]
    UnexpectedKeyTypes { owner: String, field: String },

    #[error("parent chain of `{ty}` loops back to itself")]
    ParentCycle { ty: String },
}

// -----------------------------------------------------------------------------
// ConversionError

/// A translator or value conversion received input of the wrong shape.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConversionError {
    #[error("expected {expected} value, found {found}")]
    UnexpectedValue {
        expected: &'static str,
        found: &'static str,
    },

    #[error("expected an instance of `{expected}`, found `{found}`")]
    WrongObject { expected: String, found: String },

    #[error("`{label}` is not a label of `{ty}`")]
    UnknownLabel { ty: String, label: String },

    #[error("malformed input `{input}`: {reason}")]
    Malformed { input: String, reason: String },

    #[error("dangling escape at the end of `{input}`")]
    DanglingEscape { input: String },

    #[error("unmatched text at offset {offset} of `{input}`")]
    Gap { input: String, offset: usize },

    #[error("{value} is out of range for {target}")]
    OutOfRange { value: String, target: &'static str },
}

// -----------------------------------------------------------------------------
// HookError

/// A lifecycle hook refused or could not handle an instance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HookError {
    #[error("hook of `{expected}` received an instance of another type")]
    WrongInstance { expected: String },

    #[error("hook rejected the instance: {0}")]
    Rejected(String),
}

impl HookError {
    /// Shorthand for [`HookError::Rejected`].
    #[inline]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

// -----------------------------------------------------------------------------
// AccessError

/// A data site could not read or write a member of an instance.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AccessError {
    #[error("site `{site}` of `{expected}` cannot access an instance of another type")]
    WrongInstance { site: String, expected: String },

    #[error("field `{field}` is read-only")]
    ReadOnly { field: String },

    #[error("field `{field}`: {source}")]
    Conversion {
        field: String,
        #[source]
        source: ConversionError,
    },

    #[error("type `{ty}` has no factory")]
    NoFactory { ty: String },

    #[error("descriptor is detached from its engine")]
    Detached,

    #[error(transparent)]
    Hook(#[from] HookError),
}
