use core::fmt;
use std::borrow::Cow;
use std::sync::{Arc, OnceLock};

use ts_utils::hash::HashMap;

use crate::descriptor::FieldDescriptor;
use crate::handle::TypeHandle;
use crate::model::{Factory, Hooks};
use crate::value::Instance;
use crate::{AccessError, ConfigError};

static NO_HOOKS: Hooks = Hooks::new();

struct FieldTable {
    fields: Box<[FieldDescriptor]>,
    indices: HashMap<Box<str>, usize>,
}

/// The structural description of one exposed type.
///
/// Descriptors are created by a [`DescriptorEngine`](crate::engine::DescriptorEngine),
/// which owns them and hands out shared references. The field table is
/// set once, when generation of the type completes, and is read-only
/// afterwards.
///
/// # Examples
///
/// ```
/// use ts_schema::engine::{DescriptorEngine, MarkerEngine};
/// use ts_schema::handle::{TypeHandle, Typed};
/// use ts_schema::model::{ClassModel, FieldMarker, Member, TypeMarker};
/// use ts_schema::impl_class_value;
///
/// #[derive(Debug, Clone, Default, PartialEq)]
/// struct Tag {
///     label: String,
/// }
///
/// impl Typed for Tag {
///     fn type_handle() -> TypeHandle {
///         TypeHandle::class::<Self>("demo::Tag", || {
///             ClassModel::new()
///                 .marked(TypeMarker::new())
///                 .with_factory::<Tag>()
///                 .with_member(Member::field("label", |t: &Tag| &t.label, |t| &mut t.label).marked(FieldMarker::new()))
///         })
///     }
/// }
///
/// impl_class_value!(Tag);
///
/// let engine = MarkerEngine::new();
/// let tag = engine.generate::<Tag>().unwrap().unwrap();
/// assert_eq!(tag.name(), "Tag");
/// assert_eq!(tag.field_names().collect::<Vec<_>>(), ["label"]);
///
/// let mut instance = tag.new_instance().unwrap();
/// tag.field("label").unwrap().set_data(&mut *instance, "red".into()).unwrap();
/// assert_eq!(instance.downcast_ref::<Tag>().unwrap().label, "red");
/// ```
pub struct TypeDescriptor {
    name: Cow<'static, str>,
    handle: TypeHandle,
    factory: Option<Factory>,
    parent: OnceLock<Option<Arc<TypeDescriptor>>>,
    hooks: OnceLock<Hooks>,
    table: OnceLock<FieldTable>,
}

impl TypeDescriptor {
    pub(crate) fn new(name: Cow<'static, str>, handle: TypeHandle, factory: Option<Factory>) -> Self {
        Self {
            name,
            handle,
            factory,
            parent: OnceLock::new(),
            hooks: OnceLock::new(),
            table: OnceLock::new(),
        }
    }

    /// The display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }

    /// The descriptor of the parent type, if it is described.
    #[inline]
    pub fn parent(&self) -> Option<&Arc<TypeDescriptor>> {
        self.parent.get()?.as_ref()
    }

    #[inline]
    pub fn factory(&self) -> Option<Factory> {
        self.factory
    }

    /// The effective hooks: the type's own, else those inherited from the parent.
    #[inline]
    pub fn hooks(&self) -> &Hooks {
        self.hooks.get().unwrap_or(&NO_HOOKS)
    }

    /// All fields, parent fields first, each group in declaration order.
    ///
    /// Empty until the descriptor is frozen.
    pub fn fields(&self) -> &[FieldDescriptor] {
        match self.table.get() {
            Some(table) => &table.fields,
            None => &[],
        }
    }

    /// Looks up a field by display name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        let table = self.table.get()?;
        let index = *table.indices.get(name)?;
        table.fields.get(index)
    }

    pub fn field_names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.fields().iter().map(FieldDescriptor::name)
    }

    #[inline]
    pub fn field_len(&self) -> usize {
        self.fields().len()
    }

    /// Returns `true` once the field table has been set.
    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.table.get().is_some()
    }

    /// Creates a blank instance through the type's factory.
    pub fn new_instance(&self) -> Result<Box<dyn Instance>, AccessError> {
        match self.factory {
            Some(factory) => Ok(factory.create()),
            None => Err(AccessError::NoFactory {
                ty: self.handle.path().to_owned(),
            }),
        }
    }

    /// Runs the post-construction hook, if any.
    pub fn call_deserialized_hook(&self, instance: &mut dyn Instance) -> Result<(), AccessError> {
        if let Some(hook) = self.hooks().post_construct() {
            hook.call(instance.as_any_mut())?;
        }
        Ok(())
    }

    /// Runs the validation hook, if any.
    pub fn validate(&self, instance: &mut dyn Instance) -> Result<(), AccessError> {
        if let Some(hook) = self.hooks().validate() {
            hook.call(instance.as_any_mut())?;
        }
        Ok(())
    }

    pub(crate) fn set_parent(&self, parent: Option<Arc<TypeDescriptor>>) -> Result<(), ConfigError> {
        self.parent.set(parent).map_err(|_| self.already_frozen())
    }

    pub(crate) fn set_hooks(&self, hooks: Hooks) -> Result<(), ConfigError> {
        self.hooks.set(hooks).map_err(|_| self.already_frozen())
    }

    fn already_frozen(&self) -> ConfigError {
        ConfigError::AlreadyFrozen {
            ty: self.handle.path().to_owned(),
        }
    }

    /// Freezes the field table.
    ///
    /// Fails if the table is already frozen or two fields share a name.
    pub(crate) fn set_fields(&self, fields: Vec<FieldDescriptor>) -> Result<(), ConfigError> {
        if self.is_frozen() {
            return Err(self.already_frozen());
        }

        let mut indices = HashMap::with_capacity_and_hasher(fields.len(), Default::default());
        for (index, field) in fields.iter().enumerate() {
            if indices.insert(Box::from(field.name()), index).is_some() {
                return Err(ConfigError::DuplicateField {
                    ty: self.handle.path().to_owned(),
                    field: field.name().to_owned(),
                });
            }
        }

        let table = FieldTable {
            fields: fields.into_boxed_slice(),
            indices,
        };
        self.table.set(table).map_err(|_| self.already_frozen())
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.handle == other.handle
    }
}

impl Eq for TypeDescriptor {}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("handle", &self.handle.path())
            .field("parent", &self.parent().map(|p| p.name()))
            .field("fields", &self.field_names().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use std::sync::Arc;

    use super::TypeDescriptor;
    use crate::descriptor::{FieldDescriptor, FieldValue, TypeSet, ValueType};
    use crate::handle::{TypeHandle, Typed};
    use crate::model::{ClassModel, Hooks};
    use crate::site::FieldSite;
    use crate::{AccessError, ConfigError};

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Plain {
        a: i32,
    }

    impl Typed for Plain {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Plain", ClassModel::new)
        }
    }

    fn a(p: &Plain) -> &i32 {
        &p.a
    }

    fn field(owner: &Arc<TypeDescriptor>, name: &'static str) -> FieldDescriptor {
        let types = TypeSet::new(name, vec![ValueType::terminal(i32::type_handle())]).unwrap();
        FieldDescriptor::new(
            name,
            "a",
            FieldValue::Object(types),
            Arc::new(FieldSite::new("a", a, None)),
            owner,
        )
    }

    #[test]
    fn fields_are_set_once() {
        let desc = Arc::new(TypeDescriptor::new(Cow::Borrowed("Plain"), Plain::type_handle(), None));
        assert!(!desc.is_frozen());
        assert_eq!(desc.field_len(), 0);

        desc.set_fields(vec![field(&desc, "a")]).unwrap();
        assert!(desc.is_frozen());
        assert_eq!(desc.field("a").unwrap().member(), "a");
        assert!(desc.field("b").is_none());

        assert_eq!(
            desc.set_fields(Vec::new()),
            Err(ConfigError::AlreadyFrozen {
                ty: "tests::Plain".into()
            })
        );
    }

    #[test]
    fn parent_and_hooks_are_set_once() {
        let desc = TypeDescriptor::new(Cow::Borrowed("Plain"), Plain::type_handle(), None);
        desc.set_parent(None).unwrap();
        desc.set_hooks(Hooks::default()).unwrap();

        let frozen = Err(ConfigError::AlreadyFrozen {
            ty: "tests::Plain".into(),
        });
        assert_eq!(desc.set_parent(None), frozen);
        assert_eq!(desc.set_hooks(Hooks::default()), frozen);
        assert!(desc.parent().is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let desc = Arc::new(TypeDescriptor::new(Cow::Borrowed("Plain"), Plain::type_handle(), None));
        let err = desc.set_fields(vec![field(&desc, "a"), field(&desc, "a")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField { .. }));
        assert!(!desc.is_frozen());
    }

    #[test]
    fn missing_factory() {
        let desc = TypeDescriptor::new(Cow::Borrowed("Plain"), Plain::type_handle(), None);
        assert!(matches!(desc.new_instance(), Err(AccessError::NoFactory { .. })));
    }
}
