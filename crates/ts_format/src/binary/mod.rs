//! Byte translators, for storage backends.
//!
//! | family | bytes |
//! |---|---|
//! | integers, floats | big-endian, 4 or 8 bytes |
//! | booleans | one byte, `0` or `1` |
//! | text, enumeration labels | UTF-8 |
//! | identifiers | 16 bytes |
//! | date-times | 8-byte microseconds since the Unix epoch |
//! | periods | 8-byte seconds, then 4-byte nanoseconds |
//! | bytes | as they are |
//!
//! Input of the wrong width is [`ConversionError::Malformed`](ts_schema::ConversionError::Malformed).

// -----------------------------------------------------------------------------
// Modules

mod enums;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use enums::{BytesToEnum, EnumToBytes};
pub use scalar::{BytesToTerminal, TerminalToBytes};
