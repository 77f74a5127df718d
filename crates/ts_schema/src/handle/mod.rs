//! Type handles: cached identities for concrete types.
//!
//! ## Menu
//!
//! - [`TypeHandle`]: identity of a concrete type plus its generic arguments,
//!   its [`TypeKind`] and, for classes, a lazily built [`ClassModel`].
//! - [`Typed`]: a trait for obtaining a type's handle.
//! - [`TypeKind`] / [`Terminal`]: the shape of a handle.
//!
//! Handles are interned process-wide by [`TypeId`], so calling
//! `T::type_handle()` repeatedly hands out clones of one allocation.

// -----------------------------------------------------------------------------
// Modules

mod kind;
mod table;

// -----------------------------------------------------------------------------
// Exports

pub use kind::{Terminal, TypeKind};

// -----------------------------------------------------------------------------
// TypeHandle

use core::any::{Any, TypeId};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use crate::ConfigError;
use crate::model::ClassModel;

/// A trait for obtaining the [`TypeHandle`] of a type.
///
/// Implemented by this crate for primitives, text, identifiers, date/time
/// values, collections and maps. Host types implement it through
/// [`TypeHandle::class`], enumerations through [`impl_labeled!`](crate::impl_labeled).
pub trait Typed: Any + Send + Sync {
    /// Returns the interned handle of `Self`.
    fn type_handle() -> TypeHandle;
}

struct HandleData {
    id: TypeId,
    path: Cow<'static, str>,
    name: Cow<'static, str>,
    kind: TypeKind,
    args: Box<[TypeHandle]>,
    model: Option<fn() -> ClassModel>,
    model_cell: OnceLock<ClassModel>,
}

/// An equality-comparable reference to a concrete type.
///
/// Identity is `(TypeId, generic arguments)`; equality and hashing use
/// exactly that pair. Cloning is a reference-count bump.
///
/// # Examples
///
/// ```
/// use ts_schema::handle::{TypeKind, Typed};
///
/// let tags = Vec::<String>::type_handle();
///
/// assert_eq!(tags.kind(), TypeKind::Collection);
/// assert_eq!(tags.element().unwrap(), String::type_handle());
/// assert_eq!(tags, Vec::<String>::type_handle());
/// ```
#[derive(Clone)]
pub struct TypeHandle(Arc<HandleData>);

impl TypeHandle {
    /// Returns the interned handle for `T`, building it with `init` on first use.
    ///
    /// `init` runs outside the table lock, so it may intern other handles.
    /// If two threads race, the first published handle wins.
    pub fn intern<T: Any>(init: impl FnOnce() -> TypeHandle) -> TypeHandle {
        table::intern(TypeId::of::<T>(), init)
    }

    fn build<T: Any>(
        path: Cow<'static, str>,
        name: Cow<'static, str>,
        kind: TypeKind,
        args: Box<[TypeHandle]>,
        model: Option<fn() -> ClassModel>,
    ) -> Self {
        Self(Arc::new(HandleData {
            id: TypeId::of::<T>(),
            path,
            name,
            kind,
            args,
            model,
            model_cell: OnceLock::new(),
        }))
    }

    /// Interns a terminal type, e.g. `i32` or `String`.
    pub fn terminal<T: Any>(path: &'static str, terminal: Terminal) -> Self {
        Self::intern::<T>(|| {
            Self::build::<T>(
                Cow::Borrowed(path),
                Cow::Borrowed(last_segment(path)),
                TypeKind::Terminal(terminal),
                Box::new([]),
                None,
            )
        })
    }

    /// Interns an enumeration with a fixed, ordered label list.
    pub fn enumeration<T: Any>(path: &'static str, labels: &'static [&'static str]) -> Self {
        Self::intern::<T>(|| {
            Self::build::<T>(
                Cow::Borrowed(path),
                Cow::Borrowed(last_segment(path)),
                TypeKind::Enum(labels),
                Box::new([]),
                None,
            )
        })
    }

    /// Interns a generic container type.
    ///
    /// `base` is the path without arguments, e.g. `"alloc::vec::Vec"`;
    /// `args` is only evaluated the first time `T` is interned.
    pub fn generic<T: Any, const N: usize>(
        base: &'static str,
        kind: TypeKind,
        args: impl FnOnce() -> [TypeHandle; N],
    ) -> Self {
        Self::intern::<T>(|| {
            let args: Box<[TypeHandle]> = Box::new(args());
            let joined_paths = join(&args, TypeHandle::path);
            let joined_names = join(&args, TypeHandle::name);
            Self::build::<T>(
                Cow::Owned(format!("{base}<{joined_paths}>")),
                Cow::Owned(format!("{}<{joined_names}>", last_segment(base))),
                kind,
                args,
                None,
            )
        })
    }

    /// Interns a fixed-size array `[E; N]`.
    pub fn array<T: Any, const N: usize>(element: impl FnOnce() -> TypeHandle) -> Self {
        Self::intern::<T>(|| {
            let element = element();
            Self::build::<T>(
                Cow::Owned(format!("[{}; {N}]", element.path())),
                Cow::Owned(format!("[{}; {N}]", element.name())),
                TypeKind::Array(N),
                Box::new([element]),
                None,
            )
        })
    }

    /// Interns a host class whose structure is provided by `model`.
    ///
    /// The model is built lazily, the first time [`model`](Self::model)
    /// (or [`parent`](Self::parent)) is called, so it may refer to `T`
    /// itself through its members.
    pub fn class<T: Any>(path: &'static str, model: fn() -> ClassModel) -> Self {
        Self::intern::<T>(|| {
            Self::build::<T>(
                Cow::Borrowed(path),
                Cow::Borrowed(last_segment(path)),
                TypeKind::Class,
                Box::new([]),
                Some(model),
            )
        })
    }

    /// Interns a generic host class, e.g. `Page<T>`.
    pub fn generic_class<T: Any, const N: usize>(
        base: &'static str,
        args: impl FnOnce() -> [TypeHandle; N],
        model: fn() -> ClassModel,
    ) -> Self {
        Self::intern::<T>(|| {
            let args: Box<[TypeHandle]> = Box::new(args());
            let joined_paths = join(&args, TypeHandle::path);
            let joined_names = join(&args, TypeHandle::name);
            Self::build::<T>(
                Cow::Owned(format!("{base}<{joined_paths}>")),
                Cow::Owned(format!("{}<{joined_names}>", last_segment(base))),
                TypeKind::Class,
                args,
                Some(model),
            )
        })
    }

    /// Interns the universal root type.
    pub fn root<T: Any>(path: &'static str, name: &'static str) -> Self {
        Self::intern::<T>(|| {
            Self::build::<T>(
                Cow::Borrowed(path),
                Cow::Borrowed(name),
                TypeKind::Root,
                Box::new([]),
                None,
            )
        })
    }

    /// Returns the underlying [`TypeId`].
    #[inline]
    pub fn id(&self) -> TypeId {
        self.0.id
    }

    /// Check if the given type matches this one.
    #[inline]
    pub fn is<T: Any>(&self) -> bool {
        self.0.id == TypeId::of::<T>()
    }

    /// Returns the full path, including generic arguments.
    #[inline]
    pub fn path(&self) -> &str {
        &self.0.path
    }

    /// Returns the name without module path.
    #[inline]
    pub fn name(&self) -> &str {
        &self.0.name
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.0.kind
    }

    /// Returns the generic arguments in declaration order.
    #[inline]
    pub fn args(&self) -> &[TypeHandle] {
        &self.0.args
    }

    /// Returns the enumeration labels, empty for non-enums.
    pub fn labels(&self) -> &'static [&'static str] {
        match self.0.kind {
            TypeKind::Enum(labels) => labels,
            _ => &[],
        }
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        matches!(self.0.kind, TypeKind::Root)
    }

    #[inline]
    pub fn is_enum(&self) -> bool {
        matches!(self.0.kind, TypeKind::Enum(_))
    }

    fn arg(&self, index: usize) -> Result<&TypeHandle, ConfigError> {
        let expected = self.0.kind.arity();
        match self.0.args.get(index) {
            Some(arg) if index < expected => Ok(arg),
            _ => Err(ConfigError::MissingTypeArgument {
                ty: self.path().to_owned(),
                expected,
                found: self.0.args.len(),
            }),
        }
    }

    /// Returns the element type of a collection, array or nullable handle.
    pub fn element(&self) -> Result<TypeHandle, ConfigError> {
        match self.0.kind {
            TypeKind::Collection | TypeKind::Array(_) | TypeKind::Nullable => self.arg(0).cloned(),
            _ => Err(ConfigError::MissingTypeArgument {
                ty: self.path().to_owned(),
                expected: 1,
                found: 0,
            }),
        }
    }

    /// Returns the key type of a map handle.
    pub fn key(&self) -> Result<TypeHandle, ConfigError> {
        match self.0.kind {
            TypeKind::Map => self.arg(0).cloned(),
            _ => Err(ConfigError::MissingTypeArgument {
                ty: self.path().to_owned(),
                expected: 2,
                found: 0,
            }),
        }
    }

    /// Returns the value type of a map handle.
    pub fn value(&self) -> Result<TypeHandle, ConfigError> {
        match self.0.kind {
            TypeKind::Map => self.arg(1).cloned(),
            _ => Err(ConfigError::MissingTypeArgument {
                ty: self.path().to_owned(),
                expected: 2,
                found: 0,
            }),
        }
    }

    /// Strips any number of `Nullable` layers.
    pub fn non_null(&self) -> TypeHandle {
        let mut current = self.clone();
        loop {
            let inner = match (current.kind(), current.args().first()) {
                (TypeKind::Nullable, Some(inner)) => inner.clone(),
                _ => return current,
            };
            current = inner;
        }
    }

    /// Returns the class model, building it on first call.
    pub fn model(&self) -> Option<&ClassModel> {
        let model = self.0.model?;
        Some(self.0.model_cell.get_or_init(model))
    }

    /// Returns the parent type's handle, if the class declares one.
    pub fn parent(&self) -> Option<TypeHandle> {
        self.model()?.parent().map(|link| link.handle().clone())
    }

    /// Returns the parent chain, nearest first.
    ///
    /// Fails with [`ConfigError::ParentCycle`] if a type appears twice.
    pub fn ancestors(&self) -> Result<Vec<TypeHandle>, ConfigError> {
        let mut chain: Vec<TypeHandle> = Vec::new();
        let mut cursor = self.parent();
        while let Some(parent) = cursor {
            if parent == *self || chain.contains(&parent) {
                return Err(ConfigError::ParentCycle {
                    ty: self.path().to_owned(),
                });
            }
            cursor = parent.parent();
            chain.push(parent);
        }
        Ok(chain)
    }

    /// Returns `true` if a value of `other` may be stored where `self` is declared.
    ///
    /// That is: equal types, `self` is the root, `self` is nullable over a
    /// type assignable from `other`, or `self` is an ancestor of `other`.
    pub fn is_assignable_from(&self, other: &TypeHandle) -> bool {
        let other = other.non_null();
        if *self == other || self.is_root() {
            return true;
        }
        if let TypeKind::Nullable = self.kind() {
            return self.non_null().is_assignable_from(&other);
        }
        match other.ancestors() {
            Ok(chain) => chain.contains(self),
            Err(_) => false,
        }
    }
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}

fn join(args: &[TypeHandle], f: fn(&TypeHandle) -> &str) -> String {
    let mut out = String::new();
    for (index, arg) in args.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(f(arg));
    }
    out
}

impl PartialEq for TypeHandle {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || (self.0.id == other.0.id && self.0.args == other.0.args)
    }
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
        self.0.args.len().hash(state);
    }
}

impl fmt::Debug for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeHandle")
            .field("path", &self.path())
            .field("kind", &self.kind())
            .finish()
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.path())
    }
}
