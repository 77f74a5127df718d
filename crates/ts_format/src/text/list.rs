use std::sync::Arc;

use ts_schema::ConversionError;
use ts_schema::translate::{Identity, SharedTranslator, Translator};
use ts_schema::value::Value;

use crate::impl_null_substitute;

// -----------------------------------------------------------------------------
// ListOptions

/// How [`TextToList`] splits its input.
#[derive(Debug, Clone, PartialEq)]
pub struct ListOptions {
    delimiter: char,
    trim: bool,
    empty: Value,
}

impl ListOptions {
    /// Comma-delimited, untrimmed, empty input reads as an empty list.
    pub const fn new() -> Self {
        Self {
            delimiter: ',',
            trim: false,
            empty: Value::List(Vec::new()),
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Trims unescaped whitespace around every element.
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// The value read from empty input.
    pub fn with_empty(mut self, empty: Value) -> Self {
        self.empty = empty;
        self
    }

    #[inline]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    #[inline]
    pub const fn trim(&self) -> bool {
        self.trim
    }

    #[inline]
    pub fn empty(&self) -> &Value {
        &self.empty
    }
}

impl Default for ListOptions {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

// -----------------------------------------------------------------------------
// ListToText

/// Joins a list into delimited text.
///
/// Each element goes through the element translator first and must come
/// out as text; `\` and the delimiter are then escaped with a backslash.
///
/// ```
/// use ts_format::text::ListToText;
/// use ts_schema::translate::Translator;
/// use ts_schema::value::Value;
///
/// let list = Value::List(vec![Value::from("a,b"), Value::from("c")]);
/// assert_eq!(ListToText::new(',').convert(list).unwrap(), Value::from(r"a\,b,c"));
/// ```
#[derive(Debug, Clone)]
pub struct ListToText {
    delimiter: char,
    element: SharedTranslator,
    null: Value,
}

impl ListToText {
    /// Joins text elements as they are.
    pub fn new(delimiter: char) -> Self {
        Self::with_element(delimiter, Arc::new(Identity))
    }

    pub fn with_element(delimiter: char, element: SharedTranslator) -> Self {
        Self {
            delimiter,
            element,
            null: Value::Null,
        }
    }

    #[inline]
    pub const fn delimiter(&self) -> char {
        self.delimiter
    }

    #[inline]
    pub fn element(&self) -> &SharedTranslator {
        &self.element
    }
}

impl Translator for ListToText {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let items = match value {
            Value::Null => return Ok(self.null.clone()),
            other => other.into_list()?,
        };
        let mut out = String::new();
        for (index, item) in items.into_iter().enumerate() {
            if index > 0 {
                out.push(self.delimiter);
            }
            let text = self.element.convert(item)?.into_text()?;
            for ch in text.chars() {
                if ch == '\\' || ch == self.delimiter {
                    out.push('\\');
                }
                out.push(ch);
            }
        }
        Ok(Value::Text(out))
    }
}

// -----------------------------------------------------------------------------
// TextToList

/// Splits delimited text into a list.
///
/// - The input splits on unescaped delimiters, and `\x` reads as `x`.
/// - A lone `\` at the end is [`ConversionError::DanglingEscape`].
/// - Empty input, after trimming if enabled, reads as
///   [`ListOptions::empty`] rather than a one-element list.
///
/// Each element goes through the element translator.
#[derive(Debug, Clone)]
pub struct TextToList {
    options: ListOptions,
    element: SharedTranslator,
    null: Value,
}

impl TextToList {
    /// Reads text elements as they are.
    pub fn new(options: ListOptions) -> Self {
        Self::with_element(options, Arc::new(Identity))
    }

    pub fn with_element(options: ListOptions, element: SharedTranslator) -> Self {
        Self {
            options,
            element,
            null: Value::Null,
        }
    }

    #[inline]
    pub fn options(&self) -> &ListOptions {
        &self.options
    }

    #[inline]
    pub fn element(&self) -> &SharedTranslator {
        &self.element
    }
}

/// One character of a segment, and whether it was escaped.
type Token = (char, bool);

fn split(input: &str, delimiter: char) -> Result<Vec<Vec<Token>>, ConversionError> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            let escaped = chars.next().ok_or_else(|| ConversionError::DanglingEscape {
                input: input.to_owned(),
            })?;
            current.push((escaped, true));
        } else if ch == delimiter {
            segments.push(core::mem::take(&mut current));
        } else {
            current.push((ch, false));
        }
    }
    segments.push(current);
    Ok(segments)
}

fn trim(tokens: &[Token]) -> &[Token] {
    let blank = |(ch, escaped): &Token| !escaped && ch.is_whitespace();
    let start = tokens.iter().position(|t| !blank(t)).unwrap_or(tokens.len());
    let end = tokens.iter().rposition(|t| !blank(t)).map_or(start, |i| i + 1);
    &tokens[start..end]
}

impl Translator for TextToList {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let text = match value {
            Value::Null => return Ok(self.null.clone()),
            other => other.into_text()?,
        };
        let blank = if self.options.trim { text.trim().is_empty() } else { text.is_empty() };
        if blank {
            return Ok(self.options.empty.clone());
        }

        let segments = split(&text, self.options.delimiter)?;
        let mut items = Vec::with_capacity(segments.len());
        for segment in &segments {
            let tokens = if self.options.trim { trim(segment) } else { segment };
            let element: String = tokens.iter().map(|(ch, _)| *ch).collect();
            items.push(self.element.convert(Value::Text(element))?);
        }
        Ok(Value::List(items))
    }
}

impl_null_substitute!(ListToText, TextToList);

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use ts_schema::ConversionError;
    use ts_schema::handle::Terminal;
    use ts_schema::translate::Translator;
    use ts_schema::value::Value;

    use super::{ListOptions, ListToText, TextToList};
    use crate::text::{TerminalToText, TextToTerminal};

    fn texts(items: &[&str]) -> Value {
        Value::List(items.iter().map(|s| Value::from(*s)).collect())
    }

    #[test]
    fn escaped_delimiter() {
        let read = TextToList::new(ListOptions::new());
        assert_eq!(read.convert(Value::from(r"a\,b,c")), Ok(texts(&["a,b", "c"])));
        assert_eq!(read.convert(Value::from(r"x\\,y")), Ok(texts(&[r"x\", "y"])));
    }

    #[test]
    fn round_trip_is_stable() {
        let write = ListToText::new(',');
        let read = TextToList::new(ListOptions::new());
        let list = texts(&["plain", "with,comma", r"back\slash", "", "tail\\"]);

        let once = write.convert(list.clone()).unwrap();
        assert_eq!(read.convert(once.clone()).unwrap(), list);
        let twice = write.convert(read.convert(once.clone()).unwrap()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn dangling_escape() {
        let read = TextToList::new(ListOptions::new());
        assert_eq!(
            read.convert(Value::from(r"a,b\")),
            Err(ConversionError::DanglingEscape {
                input: String::from(r"a,b\"),
            })
        );
    }

    #[test]
    fn empty_input() {
        let read = TextToList::new(ListOptions::new().with_trim(true));
        assert_eq!(read.convert(Value::from("   ")), Ok(Value::List(Vec::new())));

        let untrimmed = TextToList::new(ListOptions::new());
        assert_eq!(untrimmed.convert(Value::from(" ")), Ok(texts(&[" "])));

        let custom = TextToList::new(ListOptions::new().with_empty(Value::Null));
        assert_eq!(custom.convert(Value::from("")), Ok(Value::Null));
    }

    #[test]
    fn trim_keeps_escaped_space() {
        let read = TextToList::new(ListOptions::new().with_delimiter(';').with_trim(true));
        assert_eq!(read.convert(Value::from(r" a ; b\ ;c")), Ok(texts(&["a", "b ", "c"])));
        assert_eq!(read.convert(Value::from(r"a;b\ ")), Ok(texts(&["a", "b "])));
        assert_eq!(read.convert(Value::from(r"\ x ")), Ok(texts(&[" x"])));
    }

    #[test]
    fn element_translators() {
        let write = ListToText::with_element('|', Arc::new(TerminalToText::new(Terminal::Int32)));
        let read = TextToList::with_element(
            ListOptions::new().with_delimiter('|'),
            Arc::new(TextToTerminal::new(Terminal::Int32)),
        );
        let list = Value::List(vec![Value::Int32(1), Value::Int32(-2)]);
        let text = write.convert(list.clone()).unwrap();
        assert_eq!(text, Value::from("1|-2"));
        assert_eq!(read.convert(text), Ok(list));
    }
}
