use std::sync::{Arc, LazyLock};

use regex::Regex;
use ts_schema::ConversionError;
use ts_schema::translate::{Identity, SharedTranslator, Translator};
use ts_schema::value::Value;

use crate::impl_null_substitute;

static PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[((?:[^,\[\]\\]|\\.)*),((?:[^,\[\]\\]|\\.)*)\]").expect("pair grammar compiles")
});

fn escape_into(out: &mut String, text: &str) {
    for ch in text.chars() {
        if matches!(ch, '\\' | ',' | '[' | ']') {
            out.push('\\');
        }
        out.push(ch);
    }
}

// The grammar guarantees every `\` is followed by a character.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(ch) = chars.next() {
        match ch {
            '\\' => out.extend(chars.next()),
            _ => out.push(ch),
        }
    }
    out
}

// -----------------------------------------------------------------------------
// PairsToText

/// Writes a map as `[key,value][key,value]...`.
///
/// Keys and values go through their translators and must come out as
/// text; `\`, `,`, `[` and `]` are escaped with a backslash.
#[derive(Debug, Clone)]
pub struct PairsToText {
    key: SharedTranslator,
    value: SharedTranslator,
    null: Value,
}

impl PairsToText {
    /// Writes text keys and values as they are.
    pub fn new() -> Self {
        Self::with_translators(Arc::new(Identity), Arc::new(Identity))
    }

    pub fn with_translators(key: SharedTranslator, value: SharedTranslator) -> Self {
        Self {
            key,
            value,
            null: Value::Null,
        }
    }
}

impl Default for PairsToText {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for PairsToText {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let entries = match value {
            Value::Null => return Ok(self.null.clone()),
            other => other.into_map()?,
        };
        let mut out = String::new();
        for (key, value) in entries {
            let key = self.key.convert(key)?.into_text()?;
            let value = self.value.convert(value)?.into_text()?;
            out.push('[');
            escape_into(&mut out, &key);
            out.push(',');
            escape_into(&mut out, &value);
            out.push(']');
        }
        Ok(Value::Text(out))
    }
}

// -----------------------------------------------------------------------------
// TextToPairs

/// Reads `[key,value]` pairs into an ordered map.
///
/// Pairs must follow each other from the first character to the last; any
/// text before, between or after them is [`ConversionError::Gap`]. The
/// empty string reads as an empty map.
///
/// ```
/// use ts_format::text::TextToPairs;
/// use ts_schema::translate::Translator;
/// use ts_schema::value::Value;
///
/// let map = TextToPairs::new().convert(Value::from("[a,1][b\\,c,2]")).unwrap();
/// assert_eq!(map.into_map().unwrap()[1].0, Value::from("b,c"));
/// ```
#[derive(Debug, Clone)]
pub struct TextToPairs {
    key: SharedTranslator,
    value: SharedTranslator,
    null: Value,
}

impl TextToPairs {
    /// Reads text keys and values as they are.
    pub fn new() -> Self {
        Self::with_translators(Arc::new(Identity), Arc::new(Identity))
    }

    pub fn with_translators(key: SharedTranslator, value: SharedTranslator) -> Self {
        Self {
            key,
            value,
            null: Value::Null,
        }
    }
}

impl Default for TextToPairs {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl Translator for TextToPairs {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let text = match value {
            Value::Null => return Ok(self.null.clone()),
            other => other.into_text()?,
        };

        let gap = |offset| ConversionError::Gap {
            input: text.clone(),
            offset,
        };

        let mut entries = Vec::new();
        let mut offset = 0;
        for captures in PAIR.captures_iter(&text) {
            let (Some(whole), Some(key), Some(value)) = (captures.get(0), captures.get(1), captures.get(2)) else {
                continue;
            };
            if whole.start() != offset {
                return Err(gap(offset));
            }
            offset = whole.end();
            entries.push((
                self.key.convert(Value::Text(unescape(key.as_str())))?,
                self.value.convert(Value::Text(unescape(value.as_str())))?,
            ));
        }
        if offset != text.len() {
            return Err(gap(offset));
        }
        Ok(Value::Map(entries))
    }
}

impl_null_substitute!(PairsToText, TextToPairs);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ts_schema::ConversionError;
    use ts_schema::handle::Terminal;
    use ts_schema::translate::Translator;
    use ts_schema::value::Value;

    use super::{PairsToText, TextToPairs};
    use crate::text::{TerminalToText, TextToTerminal};

    #[test]
    fn contiguous_pairs() {
        let map = TextToPairs::new().convert(Value::from("[k1,v1][k2,v2]")).unwrap();
        assert_eq!(
            map,
            Value::Map(vec![
                (Value::from("k1"), Value::from("v1")),
                (Value::from("k2"), Value::from("v2")),
            ])
        );
    }

    #[test]
    fn gaps_are_rejected() {
        let read = TextToPairs::new();
        assert!(matches!(
            read.convert(Value::from("[k1,v1] [k2,v2]")),
            Err(ConversionError::Gap { offset: 7, .. })
        ));
        assert!(matches!(read.convert(Value::from(" [k,v]")), Err(ConversionError::Gap { offset: 0, .. })));
        assert!(matches!(read.convert(Value::from("[k,v]x")), Err(ConversionError::Gap { offset: 5, .. })));
        assert!(matches!(read.convert(Value::from("nothing")), Err(ConversionError::Gap { offset: 0, .. })));
    }

    #[test]
    fn empty_text_is_empty_map() {
        assert_eq!(TextToPairs::new().convert(Value::from("")), Ok(Value::Map(Vec::new())));
    }

    #[test]
    fn escapes_round_trip() {
        let map = Value::Map(vec![(Value::from("a,[b]"), Value::from(r"c\d"))]);
        let text = PairsToText::new().convert(map.clone()).unwrap();
        assert_eq!(text, Value::from(r"[a\,\[b\],c\\d]"));
        assert_eq!(TextToPairs::new().convert(text), Ok(map));
    }

    #[test]
    fn typed_values() {
        let write = PairsToText::with_translators(
            Arc::new(TerminalToText::new(Terminal::Text)),
            Arc::new(TerminalToText::new(Terminal::Int64)),
        );
        let read = TextToPairs::with_translators(
            Arc::new(TextToTerminal::new(Terminal::Text)),
            Arc::new(TextToTerminal::new(Terminal::Int64)),
        );
        let map = Value::Map(vec![(Value::from("n"), Value::Int64(7))]);
        let text = write.convert(map.clone()).unwrap();
        assert_eq!(text, Value::from("[n,7]"));
        assert_eq!(read.convert(text), Ok(map));
    }
}
