use std::sync::Arc;

use serde_json::{Map, Number, Value as Json};
use ts_schema::descriptor::{FieldValue, TypeDescriptor, TypeSet};
use ts_schema::engine::DescriptorEngine;
use ts_schema::translate::Translator;
use ts_schema::value::{Instance, Value};

use super::{TYPE_KEY, describe, natural_handle};
use crate::StructuredError;
use crate::registry::{Text, TranslatorRegistry};
use crate::type_name::canonical_type_name;

/// Writes described instances as JSON.
#[derive(Clone, Copy)]
pub struct StructuredWriter<'a> {
    engine: &'a dyn DescriptorEngine,
    text: &'a TranslatorRegistry<Text>,
}

impl<'a> StructuredWriter<'a> {
    pub fn new(engine: &'a dyn DescriptorEngine, text: &'a TranslatorRegistry<Text>) -> Self {
        Self { engine, text }
    }

    /// Writes `instance`, untagged.
    pub fn write(&self, instance: &dyn Instance) -> Result<Json, StructuredError> {
        let descriptor = describe(self.engine, &instance.instance_handle())?;
        self.write_object(&descriptor, instance, false)
    }

    fn write_object(
        &self,
        descriptor: &Arc<TypeDescriptor>,
        instance: &dyn Instance,
        tagged: bool,
    ) -> Result<Json, StructuredError> {
        let mut out = Map::new();
        if tagged {
            out.insert(TYPE_KEY.to_owned(), Json::String(descriptor.name().to_owned()));
        }
        for field in descriptor.fields() {
            let value = field.get_data(instance)?;
            let json = match (field.value(), value) {
                (_, Value::Null) => Json::Null,
                (FieldValue::Object(types), value) => self.write_value(types, value)?,
                (FieldValue::Collection(types), value) => {
                    let items = value.into_list()?;
                    Json::Array(
                        items
                            .into_iter()
                            .map(|item| self.write_value(types, item))
                            .collect::<Result<_, _>>()?,
                    )
                }
                (FieldValue::Map { values, .. }, value) => {
                    let mut entries = Map::new();
                    for (key, value) in value.into_map()? {
                        entries.insert(self.write_key(key)?, self.write_value(values, value)?);
                    }
                    Json::Object(entries)
                }
            };
            out.insert(field.name().to_owned(), json);
        }
        Ok(Json::Object(out))
    }

    fn write_value(&self, types: &TypeSet, value: Value) -> Result<Json, StructuredError> {
        Ok(match value {
            Value::Null => Json::Null,
            Value::Bool(v) => Json::Bool(v),
            Value::Int32(v) => Json::from(v),
            Value::Int64(v) => Json::from(v),
            Value::Float32(v) => match Number::from_f64(f64::from(v)) {
                Some(n) => Json::Number(n),
                None => Json::String(self.natural_text(Value::Float32(v))?),
            },
            Value::Float64(v) => match Number::from_f64(v) {
                Some(n) => Json::Number(n),
                None => Json::String(self.natural_text(Value::Float64(v))?),
            },
            Value::Text(v) => Json::String(v),
            Value::Type(handle) => Json::String(canonical_type_name(&handle).to_owned()),
            Value::Object(object) => match self.engine.generate_type(&object.handle())? {
                Some(descriptor) => {
                    let tagged = types.is_polymorphic() || types.find(descriptor.handle()).is_none();
                    self.write_object(&descriptor, object.as_instance(), tagged)?
                }
                // A boxed host terminal, e.g. an `i32` in a root-typed slot.
                None => match object.unboxed() {
                    Some(value) => self.write_value(types, value)?,
                    None => {
                        return Err(StructuredError::NotDescribed {
                            ty: object.handle().path().to_owned(),
                        });
                    }
                },
            },
            Value::List(items) => Json::Array(
                items
                    .into_iter()
                    .map(|item| self.write_value(types, item))
                    .collect::<Result<_, _>>()?,
            ),
            Value::Map(entries) => {
                let mut out = Map::new();
                for (key, value) in entries {
                    out.insert(self.write_key(key)?, self.write_value(types, value)?);
                }
                Json::Object(out)
            }
            other => Json::String(self.natural_text(other)?),
        })
    }

    fn write_key(&self, key: Value) -> Result<String, StructuredError> {
        match key {
            Value::Text(text) => Ok(text),
            other => self.natural_text(other),
        }
    }

    fn natural_text(&self, value: Value) -> Result<String, StructuredError> {
        let handle = natural_handle(&value).ok_or_else(|| StructuredError::Shape {
            expected: "a terminal or enumeration value",
            found: String::from(value.kind_name()),
        })?;
        let pair = self.text.get(&handle)?;
        Ok(pair.to_external.convert(value)?.into_text()?)
    }
}

impl core::fmt::Debug for StructuredWriter<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StructuredWriter").field("text", self.text).finish_non_exhaustive()
    }
}
