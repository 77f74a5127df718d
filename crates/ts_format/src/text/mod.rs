//! Text translators.
//!
//! ## Menu
//!
//! - [`TerminalToText`] / [`TextToTerminal`]: terminal values.
//! - [`EnumToText`] / [`TextToEnum`]: enumeration labels.
//! - [`ListToText`] / [`TextToList`]: delimited lists, configured by [`ListOptions`].
//! - [`PairsToText`] / [`TextToPairs`]: bracketed `[key,value]` pairs.
//!
//! Text forms of terminals:
//!
//! | family | form |
//! |---|---|
//! | integers | decimal |
//! | floats | shortest round-trip decimal |
//! | booleans | `true` / `false` |
//! | identifiers | hyphenated UUID |
//! | date-times | RFC 3339, UTC |
//! | periods | `PT<secs>[.<frac>]S` |
//! | bytes | standard base64 |

// -----------------------------------------------------------------------------
// Modules

mod enums;
mod list;
mod pairs;
mod scalar;

// -----------------------------------------------------------------------------
// Exports

pub use enums::{EnumToText, TextToEnum};
pub use list::{ListOptions, ListToText, TextToList};
pub use pairs::{PairsToText, TextToPairs};
pub use scalar::{TerminalToText, TextToTerminal, format_period, parse_period};

pub(crate) use scalar::{expected, family};
