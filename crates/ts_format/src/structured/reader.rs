use std::sync::Arc;

use serde_json::{Map, Value as Json};
use ts_schema::descriptor::{FieldValue, TypeDescriptor, TypeSet, ValueType};
use ts_schema::engine::DescriptorEngine;
use ts_schema::handle::{Terminal, TypeHandle, TypeKind, Typed};
use ts_schema::translate::Translator;
use ts_schema::value::{Instance, ObjectValue, Value};
use ts_schema::{AccessError, ConversionError};

use super::{TYPE_KEY, describe};
use crate::StructuredError;
use crate::registry::{Text, TranslatorRegistry};

/// Reads described instances from JSON.
///
/// Every instance is created blank through its descriptor's factory, its
/// present fields are set, and then its deserialized hook and validation
/// hook run. Read-only fields and unknown members are ignored.
///
/// A type tag names one of the field's declared types or, for subtypes
/// and root-typed fields, a descriptor the engine has already published.
#[derive(Clone, Copy)]
pub struct StructuredReader<'a> {
    engine: &'a dyn DescriptorEngine,
    text: &'a TranslatorRegistry<Text>,
}

impl<'a> StructuredReader<'a> {
    pub fn new(engine: &'a dyn DescriptorEngine, text: &'a TranslatorRegistry<Text>) -> Self {
        Self { engine, text }
    }

    /// Reads an instance of `handle`.
    pub fn read(&self, handle: &TypeHandle, json: &Json) -> Result<Box<dyn Instance>, StructuredError> {
        let descriptor = describe(self.engine, handle)?;
        self.read_object(&descriptor, json)
    }

    /// Reads an instance of `T`.
    pub fn read_as<T: Typed>(&self, json: &Json) -> Result<T, StructuredError> {
        let instance = self.read(&T::type_handle(), json)?;
        let found = instance.instance_handle().path().to_owned();
        match instance.into_any().downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(_) => Err(StructuredError::Conversion(ConversionError::WrongObject {
                expected: T::type_handle().path().to_owned(),
                found,
            })),
        }
    }

    fn read_object(&self, descriptor: &Arc<TypeDescriptor>, json: &Json) -> Result<Box<dyn Instance>, StructuredError> {
        let members = json.as_object().ok_or_else(|| StructuredError::shape("an object", json))?;
        if let Some(tag) = members.get(TYPE_KEY) {
            let tag = tag.as_str().ok_or_else(|| StructuredError::shape("a type name", tag))?;
            if tag != descriptor.name() {
                return Err(StructuredError::UnknownType { name: tag.to_owned() });
            }
        }

        let mut instance = descriptor.new_instance()?;
        for field in descriptor.fields() {
            if field.is_read_only() {
                continue;
            }
            let Some(json) = members.get(field.name()) else {
                continue;
            };
            let value = self.read_field(field.value(), json)?;
            field.set_data(&mut *instance, value)?;
        }
        descriptor.call_deserialized_hook(&mut *instance)?;
        descriptor.validate(&mut *instance)?;
        Ok(instance)
    }

    fn read_field(&self, value: &FieldValue, json: &Json) -> Result<Value, StructuredError> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        match value {
            FieldValue::Object(types) => self.read_element(types, json),
            FieldValue::Collection(types) => {
                let items = json.as_array().ok_or_else(|| StructuredError::shape("an array", json))?;
                let items = items
                    .iter()
                    .map(|item| self.read_element(types, item))
                    .collect::<Result<_, _>>()?;
                Ok(Value::List(items))
            }
            FieldValue::Map { keys, values } => {
                let members = json.as_object().ok_or_else(|| StructuredError::shape("an object", json))?;
                self.read_entries(keys.first().handle(), members, |json| self.read_element(values, json))
            }
        }
    }

    fn read_entries(
        &self,
        key: &TypeHandle,
        members: &Map<String, Json>,
        mut value: impl FnMut(&Json) -> Result<Value, StructuredError>,
    ) -> Result<Value, StructuredError> {
        let mut entries = Vec::with_capacity(members.len());
        for (k, v) in members {
            entries.push((self.read_key(key, k)?, value(v)?));
        }
        Ok(Value::Map(entries))
    }

    fn read_element(&self, types: &TypeSet, json: &Json) -> Result<Value, StructuredError> {
        if json.is_null() {
            return Ok(Value::Null);
        }
        if let Json::Object(members) = json {
            let chosen = match members.get(TYPE_KEY) {
                Some(tag) => {
                    let tag = tag.as_str().ok_or_else(|| StructuredError::shape("a type name", tag))?;
                    Some(self.tagged(types, tag)?)
                }
                None if types.iter().any(ValueType::is_described) => Some(
                    types
                        .iter()
                        .find_map(ValueType::descriptor)
                        .ok_or(StructuredError::Access(AccessError::Detached))?,
                ),
                None => None,
            };
            if let Some(descriptor) = chosen {
                let instance = self.read_object(&descriptor, json)?;
                return Ok(Value::Object(ObjectValue::from_boxed(instance)));
            }
        }

        // Alternatives are tried in declaration order; the first error wins.
        let mut first_error = None;
        for ty in types {
            match self.read_terminal(ty.handle(), json) {
                Ok(value) => return Ok(value),
                Err(err) => {
                    first_error.get_or_insert(err);
                }
            }
        }
        Err(first_error.unwrap_or_else(|| StructuredError::shape("a value", json)))
    }

    /// Resolves a type tag to one of `types`, or to a published descriptor
    /// assignable to one of them.
    fn tagged(&self, types: &TypeSet, tag: &str) -> Result<Arc<TypeDescriptor>, StructuredError> {
        if let Some(descriptor) = types
            .iter()
            .filter_map(ValueType::descriptor)
            .find(|descriptor| descriptor.name() == tag)
        {
            return Ok(descriptor);
        }
        self.engine
            .cache()
            .descriptors()
            .into_iter()
            .find(|descriptor| {
                descriptor.name() == tag && types.iter().any(|ty| ty.handle().is_assignable_from(descriptor.handle()))
            })
            .ok_or_else(|| StructuredError::UnknownType { name: tag.to_owned() })
    }

    fn read_terminal(&self, handle: &TypeHandle, json: &Json) -> Result<Value, StructuredError> {
        let handle = handle.non_null();
        match handle.kind() {
            TypeKind::Terminal(Terminal::Bool) => json
                .as_bool()
                .map(Value::Bool)
                .ok_or_else(|| StructuredError::shape("a boolean", json)),
            TypeKind::Terminal(Terminal::Int32) => {
                let v = json.as_i64().ok_or_else(|| StructuredError::shape("an integer", json))?;
                let v = i32::try_from(v).map_err(|_| ConversionError::OutOfRange {
                    value: v.to_string(),
                    target: "int32",
                })?;
                Ok(Value::Int32(v))
            }
            TypeKind::Terminal(Terminal::Int64) => json
                .as_i64()
                .map(Value::Int64)
                .ok_or_else(|| StructuredError::shape("an integer", json)),
            TypeKind::Terminal(Terminal::Float32) if json.is_number() => json
                .as_f64()
                .map(|v| Value::Float32(v as f32))
                .ok_or_else(|| StructuredError::shape("a number", json)),
            TypeKind::Terminal(Terminal::Float64) if json.is_number() => json
                .as_f64()
                .map(Value::Float64)
                .ok_or_else(|| StructuredError::shape("a number", json)),
            TypeKind::Terminal(Terminal::Text) => json
                .as_str()
                .map(Value::from)
                .ok_or_else(|| StructuredError::shape("a string", json)),
            TypeKind::Terminal(_) | TypeKind::Enum(_) => {
                let text = json.as_str().ok_or_else(|| StructuredError::shape("a string", json))?;
                let pair = self.text.get(&handle)?;
                Ok(pair.from_external.convert(Value::from(text))?)
            }
            TypeKind::Collection | TypeKind::Array(_) => {
                let element = handle.element()?;
                let items = json.as_array().ok_or_else(|| StructuredError::shape("an array", json))?;
                let items = items
                    .iter()
                    .map(|item| self.read_terminal(&element, item))
                    .collect::<Result<_, _>>()?;
                Ok(Value::List(items))
            }
            TypeKind::Map => {
                let (key, value) = (handle.key()?, handle.value()?);
                let members = json.as_object().ok_or_else(|| StructuredError::shape("an object", json))?;
                self.read_entries(&key, members, |json| self.read_terminal(&value, json))
            }
            TypeKind::Root => match json {
                Json::Bool(v) => Ok(Value::Bool(*v)),
                Json::Number(n) => match n.as_i64() {
                    Some(v) => Ok(Value::Int64(v)),
                    None => n
                        .as_f64()
                        .map(Value::Float64)
                        .ok_or_else(|| StructuredError::shape("a number", json)),
                },
                Json::String(text) => Ok(Value::from(text.as_str())),
                other => Err(StructuredError::shape("a terminal value", other)),
            },
            TypeKind::Class | TypeKind::Nullable => Err(StructuredError::NotDescribed {
                ty: handle.path().to_owned(),
            }),
        }
    }

    fn read_key(&self, handle: &TypeHandle, key: &str) -> Result<Value, StructuredError> {
        let handle = handle.non_null();
        match handle.kind() {
            TypeKind::Terminal(Terminal::Text) | TypeKind::Root => Ok(Value::from(key)),
            TypeKind::Terminal(_) | TypeKind::Enum(_) => {
                let pair = self.text.get(&handle)?;
                Ok(pair.from_external.convert(Value::from(key))?)
            }
            _ => Err(StructuredError::NotDescribed {
                ty: handle.path().to_owned(),
            }),
        }
    }
}

impl core::fmt::Debug for StructuredReader<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StructuredReader").field("text", self.text).finish_non_exhaustive()
    }
}
