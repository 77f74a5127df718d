use ts_schema::ConversionError;
use ts_schema::handle::TypeHandle;
use ts_schema::translate::Translator;
use ts_schema::value::{EnumValue, Value};

use crate::impl_null_substitute;

/// Writes a value of one enumeration as its label.
#[derive(Debug, Clone)]
pub struct EnumToText {
    handle: TypeHandle,
    null: Value,
}

impl EnumToText {
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

impl Translator for EnumToText {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(self.null.clone()),
            Value::Enum(e) if *e.handle() == self.handle => Ok(Value::Text(e.label().to_owned())),
            Value::Enum(e) => Err(ConversionError::WrongObject {
                expected: self.handle.path().to_owned(),
                found: e.handle().path().to_owned(),
            }),
            other => Err(other.unexpected("enum")),
        }
    }
}

/// Reads a label of one enumeration.
#[derive(Debug, Clone)]
pub struct TextToEnum {
    handle: TypeHandle,
    null: Value,
}

impl TextToEnum {
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

impl Translator for TextToEnum {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Null => Ok(self.null.clone()),
            Value::Text(label) => EnumValue::from_label(self.handle.clone(), &label).map(Value::Enum),
            other => Err(other.unexpected("text")),
        }
    }
}

impl_null_substitute!(EnumToText, TextToEnum);

#[cfg(test)]
mod tests {
    use ts_schema::ConversionError;
    use ts_schema::handle::Typed;
    use ts_schema::impl_labeled;
    use ts_schema::translate::Translator;
    use ts_schema::value::{ToValue, Value};

    use super::{EnumToText, TextToEnum};

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Suit {
        Hearts,
        Spades,
    }

    impl_labeled!(Suit, "tests::Suit" {
        Hearts => "HEARTS",
        Spades => "SPADES",
    });

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Side {
        Left,
    }

    impl_labeled!(Side, "tests::Side" { Left => "LEFT" });

    #[test]
    fn labels_both_ways() {
        let write = EnumToText::new(Suit::type_handle());
        assert_eq!(write.convert(Suit::Spades.to_value()), Ok(Value::from("SPADES")));
        assert_eq!(
            write.convert(Side::Left.to_value()),
            Err(ConversionError::WrongObject {
                expected: String::from("tests::Suit"),
                found: String::from("tests::Side"),
            })
        );

        let read = TextToEnum::new(Suit::type_handle());
        assert_eq!(read.convert(Value::from("HEARTS")), Ok(Suit::Hearts.to_value()));
        assert_eq!(
            read.convert(Value::from("CLUBS")),
            Err(ConversionError::UnknownLabel {
                ty: String::from("tests::Suit"),
                label: String::from("CLUBS"),
            })
        );
    }

    #[test]
    fn null_substitute() {
        let read = TextToEnum::new(Suit::type_handle()).with_null(Suit::Hearts.to_value());
        assert_eq!(read.convert(Value::Null), Ok(Suit::Hearts.to_value()));
    }
}
