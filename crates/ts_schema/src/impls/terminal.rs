use core::time::Duration;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::handle::{Terminal, TypeHandle, Typed};
use crate::value::ByteBuf;

macro_rules! impl_terminal {
    ($($ty:ty => $path:literal, $terminal:ident);+ $(;)?) => {$(
        impl Typed for $ty {
            fn type_handle() -> TypeHandle {
                TypeHandle::terminal::<Self>($path, Terminal::$terminal)
            }
        }
    )+};
}

impl_terminal!(
    i8 => "i8", Int32;
    i16 => "i16", Int32;
    i32 => "i32", Int32;
    u8 => "u8", Int32;
    u16 => "u16", Int32;
    i64 => "i64", Int64;
    u32 => "u32", Int64;
    f32 => "f32", Float32;
    f64 => "f64", Float64;
    bool => "bool", Bool;
    String => "alloc::string::String", Text;
    Uuid => "uuid::Uuid", Identifier;
    DateTime<Utc> => "chrono::DateTime<Utc>", DateTime;
    Duration => "core::time::Duration", Period;
    ByteBuf => "ts_schema::value::ByteBuf", Bytes;
);
