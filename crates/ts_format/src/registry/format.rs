use core::time::Duration;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ts_schema::handle::{Terminal, TypeHandle, Typed};
use ts_schema::translate::SharedTranslator;
use ts_schema::value::ByteBuf;
use uuid::Uuid;

use crate::binary::{BytesToEnum, BytesToTerminal, EnumToBytes, TerminalToBytes};
use crate::text::{EnumToText, TerminalToText, TextToEnum, TextToTerminal};

// -----------------------------------------------------------------------------
// TranslatorPair

/// The two directions between a type's values and one external form.
#[derive(Debug, Clone)]
pub struct TranslatorPair {
    pub to_external: SharedTranslator,
    pub from_external: SharedTranslator,
}

impl TranslatorPair {
    pub fn new(to_external: SharedTranslator, from_external: SharedTranslator) -> Self {
        Self {
            to_external,
            from_external,
        }
    }
}

// -----------------------------------------------------------------------------
// Format

/// An external form with default translators for terminals and enumerations.
pub trait Format: Send + Sync + 'static {
    /// Used in log and error messages.
    const NAME: &'static str;

    fn terminal_pair(terminal: Terminal) -> TranslatorPair;

    fn enum_pair(handle: &TypeHandle) -> TranslatorPair;
}

/// Text, as read and written by [`crate::text`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Text;

impl Format for Text {
    const NAME: &'static str = "text";

    fn terminal_pair(terminal: Terminal) -> TranslatorPair {
        TranslatorPair::new(
            Arc::new(TerminalToText::new(terminal)),
            Arc::new(TextToTerminal::new(terminal)),
        )
    }

    fn enum_pair(handle: &TypeHandle) -> TranslatorPair {
        TranslatorPair::new(Arc::new(EnumToText::new(handle.clone())), Arc::new(TextToEnum::new(handle.clone())))
    }
}

/// Bytes, as read and written by [`crate::binary`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Binary;

impl Format for Binary {
    const NAME: &'static str = "binary";

    fn terminal_pair(terminal: Terminal) -> TranslatorPair {
        TranslatorPair::new(
            Arc::new(TerminalToBytes::new(terminal)),
            Arc::new(BytesToTerminal::new(terminal)),
        )
    }

    fn enum_pair(handle: &TypeHandle) -> TranslatorPair {
        TranslatorPair::new(Arc::new(EnumToBytes::new(handle.clone())), Arc::new(BytesToEnum::new(handle.clone())))
    }
}

/// Handles of every host type with a terminal description.
pub fn terminal_handles() -> [TypeHandle; 15] {
    [
        i8::type_handle(),
        i16::type_handle(),
        i32::type_handle(),
        u8::type_handle(),
        u16::type_handle(),
        i64::type_handle(),
        u32::type_handle(),
        f32::type_handle(),
        f64::type_handle(),
        bool::type_handle(),
        String::type_handle(),
        Uuid::type_handle(),
        DateTime::<Utc>::type_handle(),
        Duration::type_handle(),
        ByteBuf::type_handle(),
    ]
}
