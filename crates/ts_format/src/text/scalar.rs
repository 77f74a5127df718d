use core::time::Duration;

use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, SecondsFormat, Utc};
use ts_schema::ConversionError;
use ts_schema::handle::Terminal;
use ts_schema::translate::Translator;
use ts_schema::value::Value;
use uuid::Uuid;

use crate::impl_null_substitute;

/// The terminal family a value belongs to.
pub(crate) fn family(value: &Value) -> Option<Terminal> {
    Some(match value {
        Value::Bool(_) => Terminal::Bool,
        Value::Int32(_) => Terminal::Int32,
        Value::Int64(_) => Terminal::Int64,
        Value::Float32(_) => Terminal::Float32,
        Value::Float64(_) => Terminal::Float64,
        Value::Text(_) => Terminal::Text,
        Value::Bytes(_) => Terminal::Bytes,
        Value::Identifier(_) => Terminal::Identifier,
        Value::DateTime(_) => Terminal::DateTime,
        Value::Period(_) => Terminal::Period,
        _ => return None,
    })
}

/// Error label of a terminal family.
pub(crate) const fn expected(terminal: Terminal) -> &'static str {
    match terminal {
        Terminal::Int32 => "int32",
        Terminal::Int64 => "int64",
        Terminal::Float32 => "float32",
        Terminal::Float64 => "float64",
        Terminal::Bool => "bool",
        Terminal::Text => "text",
        Terminal::DateTime => "datetime",
        Terminal::Period => "period",
        Terminal::Identifier => "identifier",
        Terminal::Bytes => "bytes",
    }
}

fn malformed(input: &str, reason: impl ToString) -> ConversionError {
    ConversionError::Malformed {
        input: input.to_owned(),
        reason: reason.to_string(),
    }
}

// -----------------------------------------------------------------------------
// Periods

/// Formats a period as `PT<secs>S`, with a fraction only when needed.
///
/// ```
/// use core::time::Duration;
/// use ts_format::text::format_period;
///
/// assert_eq!(format_period(Duration::from_secs(90)), "PT90S");
/// assert_eq!(format_period(Duration::from_millis(1500)), "PT1.5S");
/// ```
pub fn format_period(period: Duration) -> String {
    let secs = period.as_secs();
    let nanos = period.subsec_nanos();
    if nanos == 0 {
        return format!("PT{secs}S");
    }
    let frac = format!("{nanos:09}");
    format!("PT{secs}.{}S", frac.trim_end_matches('0'))
}

/// Parses the form written by [`format_period`].
pub fn parse_period(text: &str) -> Result<Duration, ConversionError> {
    let body = text
        .strip_prefix("PT")
        .and_then(|rest| rest.strip_suffix('S'))
        .ok_or_else(|| malformed(text, "expected `PT<seconds>S`"))?;

    let (secs, frac) = match body.split_once('.') {
        Some((secs, frac)) => (secs, Some(frac)),
        None => (body, None),
    };
    if secs.is_empty() || !secs.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed(text, "seconds must be decimal digits"));
    }
    let secs: u64 = secs.parse().map_err(|e| malformed(text, e))?;

    let nanos = match frac {
        None => 0,
        Some(frac) => {
            if frac.is_empty() || frac.len() > 9 || !frac.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed(text, "fraction must be 1 to 9 decimal digits"));
            }
            let scale = 10u32.pow(9 - frac.len() as u32);
            frac.parse::<u32>().map_err(|e| malformed(text, e))? * scale
        }
    };
    Ok(Duration::new(secs, nanos))
}

// -----------------------------------------------------------------------------
// TerminalToText

/// Writes a terminal value of one family as text.
#[derive(Debug, Clone)]
pub struct TerminalToText {
    terminal: Terminal,
    null: Value,
}

impl TerminalToText {
    pub const fn new(terminal: Terminal) -> Self {
        Self {
            terminal,
            null: Value::Null,
        }
    }

    #[inline]
    pub const fn terminal(&self) -> Terminal {
        self.terminal
    }
}

impl Translator for TerminalToText {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        if family(&value) != Some(self.terminal) {
            return match value {
                Value::Null => Ok(self.null.clone()),
                other => Err(other.unexpected(expected(self.terminal))),
            };
        }
        let text = match value {
            Value::Bool(v) => v.to_string(),
            Value::Int32(v) => v.to_string(),
            Value::Int64(v) => v.to_string(),
            Value::Float32(v) => v.to_string(),
            Value::Float64(v) => v.to_string(),
            Value::Text(v) => v,
            Value::Bytes(v) => general_purpose::STANDARD.encode(v),
            Value::Identifier(v) => v.hyphenated().to_string(),
            Value::DateTime(v) => v.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            Value::Period(v) => format_period(v),
            other => return Err(other.unexpected(expected(self.terminal))),
        };
        Ok(Value::Text(text))
    }
}

// -----------------------------------------------------------------------------
// TextToTerminal

/// Reads a terminal value of one family from text.
#[derive(Debug, Clone)]
pub struct TextToTerminal {
    terminal: Terminal,
    null: Value,
}

impl TextToTerminal {
    pub const fn new(terminal: Terminal) -> Self {
        Self {
            terminal,
            null: Value::Null,
        }
    }

    #[inline]
    pub const fn terminal(&self) -> Terminal {
        self.terminal
    }
}

impl Translator for TextToTerminal {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let text = match value {
            Value::Null => return Ok(self.null.clone()),
            Value::Text(text) => text,
            other => return Err(other.unexpected("text")),
        };
        let s = text.as_str();
        Ok(match self.terminal {
            Terminal::Int32 => Value::Int32(s.parse().map_err(|e| malformed(s, e))?),
            Terminal::Int64 => Value::Int64(s.parse().map_err(|e| malformed(s, e))?),
            Terminal::Float32 => Value::Float32(s.parse().map_err(|e| malformed(s, e))?),
            Terminal::Float64 => Value::Float64(s.parse().map_err(|e| malformed(s, e))?),
            Terminal::Bool => match s {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                _ => return Err(malformed(s, "expected `true` or `false`")),
            },
            Terminal::Text => Value::Text(text),
            Terminal::Identifier => Value::Identifier(Uuid::parse_str(s).map_err(|e| malformed(s, e))?),
            Terminal::DateTime => Value::DateTime(
                DateTime::parse_from_rfc3339(s)
                    .map_err(|e| malformed(s, e))?
                    .with_timezone(&Utc),
            ),
            Terminal::Period => Value::Period(parse_period(s)?),
            Terminal::Bytes => Value::Bytes(general_purpose::STANDARD.decode(s).map_err(|e| malformed(s, e))?),
        })
    }
}

impl_null_substitute!(TerminalToText, TextToTerminal);

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use chrono::{TimeZone, Utc};
    use ts_schema::ConversionError;
    use ts_schema::handle::Terminal;
    use ts_schema::translate::Translator;
    use ts_schema::value::Value;
    use uuid::Uuid;

    use super::{TerminalToText, TextToTerminal, parse_period};

    fn write(terminal: Terminal, value: Value) -> String {
        TerminalToText::new(terminal).convert(value).unwrap().into_text().unwrap()
    }

    fn read(terminal: Terminal, text: &str) -> Result<Value, ConversionError> {
        TextToTerminal::new(terminal).convert(Value::from(text))
    }

    #[test]
    fn numbers() {
        assert_eq!(write(Terminal::Int32, Value::Int32(-42)), "-42");
        assert_eq!(write(Terminal::Float64, Value::Float64(0.1)), "0.1");
        assert_eq!(read(Terminal::Int64, "9000000000"), Ok(Value::Int64(9_000_000_000)));
        assert_eq!(read(Terminal::Float32, "2.5"), Ok(Value::Float32(2.5)));
        assert!(matches!(read(Terminal::Int32, "4x"), Err(ConversionError::Malformed { .. })));
    }

    #[test]
    fn family_mismatch() {
        let err = TerminalToText::new(Terminal::Int32).convert(Value::Int64(1)).unwrap_err();
        assert_eq!(
            err,
            ConversionError::UnexpectedValue {
                expected: "int32",
                found: "int64"
            }
        );
    }

    #[test]
    fn booleans_are_strict() {
        assert_eq!(read(Terminal::Bool, "true"), Ok(Value::Bool(true)));
        assert!(read(Terminal::Bool, "True").is_err());
    }

    #[test]
    fn identifiers_and_datetimes() {
        let id = Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0);
        let text = write(Terminal::Identifier, Value::Identifier(id));
        assert_eq!(text, "12345678-9abc-def0-1234-56789abcdef0");
        assert_eq!(read(Terminal::Identifier, &text), Ok(Value::Identifier(id)));

        let at = Utc.with_ymd_and_hms(2024, 2, 29, 12, 30, 0).unwrap();
        assert_eq!(write(Terminal::DateTime, Value::DateTime(at)), "2024-02-29T12:30:00Z");
        assert_eq!(read(Terminal::DateTime, "2024-02-29T14:30:00+02:00"), Ok(Value::DateTime(at)));
    }

    #[test]
    fn periods() {
        assert_eq!(write(Terminal::Period, Value::Period(Duration::new(3, 250_000_000))), "PT3.25S");
        assert_eq!(parse_period("PT3.25S"), Ok(Duration::new(3, 250_000_000)));
        assert_eq!(parse_period("PT0.000000001S"), Ok(Duration::new(0, 1)));
        assert!(parse_period("PT3.S").is_err());
        assert!(parse_period("P1D").is_err());
        assert!(parse_period("PT-1S").is_err());
    }

    #[test]
    fn bytes_are_base64() {
        assert_eq!(write(Terminal::Bytes, Value::Bytes(b"tessera".to_vec())), "dGVzc2VyYQ==");
        assert_eq!(read(Terminal::Bytes, "dGVzc2VyYQ=="), Ok(Value::Bytes(b"tessera".to_vec())));
    }

    #[test]
    fn null_substitute() {
        let read = TextToTerminal::new(Terminal::Int32).with_null(Value::Int32(0));
        assert_eq!(read.convert(Value::Null), Ok(Value::Int32(0)));
        assert_eq!(TerminalToText::new(Terminal::Text).convert(Value::Null), Ok(Value::Null));
    }
}
