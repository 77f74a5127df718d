use ts_schema::ConversionError;
use ts_schema::handle::TypeHandle;
use ts_schema::translate::Translator;
use ts_schema::value::{EnumValue, Value};

use crate::impl_null_substitute;

/// Writes a value of one enumeration as its UTF-8 label.
#[derive(Debug, Clone)]
pub struct EnumToBytes {
    handle: TypeHandle,
    null: Value,
}

impl EnumToBytes {
    pub fn new(handle: TypeHandle) -> Self {
        Self {
            handle,
            null: Value::Null,
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }
}

impl Translator for EnumToBytes {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(self.null.clone()),
            Value::Enum(e) if *e.handle() == self.handle => Ok(Value::Bytes(e.label().as_bytes().to_vec())),
            Value::Enum(e) => Err(ConversionError::WrongObject {
                expected: self.handle.path().to_owned(),
                found: e.handle().path().to_owned(),
            }),
            other => Err(other.unexpected("enum")),
        }
    }
}

/// Reads a UTF-8 label of one enumeration.
#[derive(Debug, Clone)]
pub struct BytesToEnum {
    handle: TypeHandle,
    null: Value,
}

impl BytesToEnum {
    pub fn new(handle: TypeHandle) -> Self {
        Self {
            handle,
            null: Value::Null,
        }
    }

    #[inline]
    pub fn handle(&self) -> &TypeHandle {
        &self.handle
    }
}

impl Translator for BytesToEnum {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let bytes = match value {
            Value::Null => return Ok(self.null.clone()),
            Value::Bytes(bytes) => bytes,
            other => return Err(other.unexpected("bytes")),
        };
        let label = core::str::from_utf8(&bytes).map_err(|e| ConversionError::Malformed {
            input: format!("{} byte(s)", bytes.len()),
            reason: e.to_string(),
        })?;
        EnumValue::from_label(self.handle.clone(), label).map(Value::Enum)
    }
}

impl_null_substitute!(EnumToBytes, BytesToEnum);

#[cfg(test)]
mod tests {
    use ts_schema::ConversionError;
    use ts_schema::handle::Typed;
    use ts_schema::impl_labeled;
    use ts_schema::translate::Translator;
    use ts_schema::value::{ToValue, Value};

    use super::{BytesToEnum, EnumToBytes};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Tone {
        High,
    }

    impl_labeled!(Level, "tests::Level" { Low => "LOW", High => "HIGH" });
    impl_labeled!(Tone, "tests::Tone" { High => "HIGH" });

    #[test]
    fn labels_as_bytes() {
        let bytes = EnumToBytes::new(Level::type_handle()).convert(Level::High.to_value()).unwrap();
        assert_eq!(bytes, Value::Bytes(b"HIGH".to_vec()));
        assert_eq!(BytesToEnum::new(Level::type_handle()).convert(bytes), Ok(Level::High.to_value()));
        assert!(matches!(
            BytesToEnum::new(Level::type_handle()).convert(Value::Bytes(b"MID".to_vec())),
            Err(ConversionError::UnknownLabel { .. })
        ));
    }

    #[test]
    fn foreign_enumerations_are_rejected() {
        assert_eq!(
            EnumToBytes::new(Level::type_handle()).convert(Tone::High.to_value()),
            Err(ConversionError::WrongObject {
                expected: String::from("tests::Level"),
                found: String::from("tests::Tone"),
            })
        );
    }
}
