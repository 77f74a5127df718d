use core::time::Duration;

use chrono::DateTime;
use ts_schema::ConversionError;
use ts_schema::handle::Terminal;
use ts_schema::translate::Translator;
use ts_schema::value::Value;
use uuid::Uuid;

use crate::impl_null_substitute;
use crate::text::{expected, family};

fn describe(bytes: &[u8]) -> String {
    format!("{} byte(s)", bytes.len())
}

fn fixed<const N: usize>(bytes: &[u8], terminal: Terminal) -> Result<[u8; N], ConversionError> {
    <[u8; N]>::try_from(bytes).map_err(|_| ConversionError::Malformed {
        input: describe(bytes),
        reason: format!("{terminal} takes exactly {N} bytes"),
    })
}

// -----------------------------------------------------------------------------
// TerminalToBytes

/// Writes a terminal value of one family as bytes.
#[derive(Debug, Clone)]
pub struct TerminalToBytes {
    terminal: Terminal,
    null: Value,
}

impl TerminalToBytes {
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

impl Translator for TerminalToBytes {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        if family(&value) != Some(self.terminal) {
            return match value {
                Value::Null => Ok(self.null.clone()),
                other => Err(other.unexpected(expected(self.terminal))),
            };
        }
        let bytes = match value {
            Value::Bool(v) => vec![u8::from(v)],
            Value::Int32(v) => v.to_be_bytes().to_vec(),
            Value::Int64(v) => v.to_be_bytes().to_vec(),
            Value::Float32(v) => v.to_be_bytes().to_vec(),
            Value::Float64(v) => v.to_be_bytes().to_vec(),
            Value::Text(v) => v.into_bytes(),
            Value::Bytes(v) => v,
            Value::Identifier(v) => v.as_bytes().to_vec(),
            Value::DateTime(v) => v.timestamp_micros().to_be_bytes().to_vec(),
            Value::Period(v) => {
                let mut out = Vec::with_capacity(12);
                out.extend_from_slice(&v.as_secs().to_be_bytes());
                out.extend_from_slice(&v.subsec_nanos().to_be_bytes());
                out
            }
            other => return Err(other.unexpected(expected(self.terminal))),
        };
        Ok(Value::Bytes(bytes))
    }
}

// -----------------------------------------------------------------------------
// BytesToTerminal

/// Reads a terminal value of one family from bytes.
#[derive(Debug, Clone)]
pub struct BytesToTerminal {
    terminal: Terminal,
    null: Value,
}

impl BytesToTerminal {
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

impl Translator for BytesToTerminal {
    fn convert(&self, value: Value) -> Result<Value, ConversionError> {
        let bytes = match value {
            Value::Null => return Ok(self.null.clone()),
            Value::Bytes(bytes) => bytes,
            other => return Err(other.unexpected("bytes")),
        };
        let terminal = self.terminal;
        Ok(match terminal {
            Terminal::Bool => match fixed::<1>(&bytes, terminal)? {
                [0] => Value::Bool(false),
                [1] => Value::Bool(true),
                _ => {
                    return Err(ConversionError::Malformed {
                        input: describe(&bytes),
                        reason: String::from("a boolean byte is 0 or 1"),
                    });
                }
            },
            Terminal::Int32 => Value::Int32(i32::from_be_bytes(fixed(&bytes, terminal)?)),
            Terminal::Int64 => Value::Int64(i64::from_be_bytes(fixed(&bytes, terminal)?)),
            Terminal::Float32 => Value::Float32(f32::from_be_bytes(fixed(&bytes, terminal)?)),
            Terminal::Float64 => Value::Float64(f64::from_be_bytes(fixed(&bytes, terminal)?)),
            Terminal::Text => Value::Text(String::from_utf8(bytes).map_err(|e| ConversionError::Malformed {
                input: describe(e.as_bytes()),
                reason: e.utf8_error().to_string(),
            })?),
            Terminal::Bytes => Value::Bytes(bytes),
            Terminal::Identifier => Value::Identifier(Uuid::from_bytes(fixed(&bytes, terminal)?)),
            Terminal::DateTime => {
                let micros = i64::from_be_bytes(fixed(&bytes, terminal)?);
                let at = DateTime::from_timestamp_micros(micros).ok_or_else(|| ConversionError::OutOfRange {
                    value: micros.to_string(),
                    target: "datetime",
                })?;
                Value::DateTime(at)
            }
            Terminal::Period => {
                let raw = fixed::<12>(&bytes, terminal)?;
                let (secs, nanos) = raw.split_at(8);
                let secs = u64::from_be_bytes(fixed(secs, terminal)?);
                let nanos = u32::from_be_bytes(fixed(nanos, terminal)?);
                if nanos >= 1_000_000_000 {
                    return Err(ConversionError::OutOfRange {
                        value: nanos.to_string(),
                        target: "period nanoseconds",
                    });
                }
                Value::Period(Duration::new(secs, nanos))
            }
        })
    }
}

impl_null_substitute!(TerminalToBytes, BytesToTerminal);

#[cfg(test)]
mod tests {
    use core::time::Duration;

    use chrono::{TimeZone, Utc};
    use ts_schema::ConversionError;
    use ts_schema::handle::Terminal;
    use ts_schema::translate::Translator;
    use ts_schema::value::Value;

    use super::{BytesToTerminal, TerminalToBytes};

    fn write(terminal: Terminal, value: Value) -> Vec<u8> {
        match TerminalToBytes::new(terminal).convert(value).unwrap() {
            Value::Bytes(bytes) => bytes,
            other => panic!("expected bytes, found {other:?}"),
        }
    }

    fn read(terminal: Terminal, bytes: &[u8]) -> Result<Value, ConversionError> {
        BytesToTerminal::new(terminal).convert(Value::Bytes(bytes.to_vec()))
    }

    #[test]
    fn big_endian_numbers() {
        assert_eq!(write(Terminal::Int32, Value::Int32(0x0102_0304)), [1, 2, 3, 4]);
        assert_eq!(read(Terminal::Int64, &[0, 0, 0, 0, 0, 0, 1, 0]), Ok(Value::Int64(256)));
        assert_eq!(read(Terminal::Float64, &1.5f64.to_be_bytes()), Ok(Value::Float64(1.5)));
    }

    #[test]
    fn wrong_width_is_malformed() {
        assert!(matches!(read(Terminal::Int32, &[1, 2, 3]), Err(ConversionError::Malformed { .. })));
        assert!(matches!(read(Terminal::Bool, &[2]), Err(ConversionError::Malformed { .. })));
        assert!(matches!(read(Terminal::Identifier, &[0; 15]), Err(ConversionError::Malformed { .. })));
    }

    #[test]
    fn datetimes_keep_microseconds() {
        let at = Utc.timestamp_opt(1_700_000_000, 123_456_000).unwrap();
        let bytes = write(Terminal::DateTime, Value::DateTime(at));
        assert_eq!(bytes.len(), 8);
        assert_eq!(read(Terminal::DateTime, &bytes), Ok(Value::DateTime(at)));
    }

    #[test]
    fn periods_take_twelve_bytes() {
        let period = Duration::new(5, 7);
        let bytes = write(Terminal::Period, Value::Period(period));
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 5, 0, 0, 0, 7]);
        assert_eq!(read(Terminal::Period, &bytes), Ok(Value::Period(period)));

        let mut bad = bytes;
        bad[8..].copy_from_slice(&2_000_000_000u32.to_be_bytes());
        assert!(matches!(read(Terminal::Period, &bad), Err(ConversionError::OutOfRange { .. })));
    }

    #[test]
    fn text_is_utf8() {
        assert_eq!(write(Terminal::Text, Value::from("ü")), [0xc3, 0xbc]);
        assert!(matches!(read(Terminal::Text, &[0xff]), Err(ConversionError::Malformed { .. })));
    }
}
