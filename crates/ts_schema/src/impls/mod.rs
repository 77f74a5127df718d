//! [`Typed`](crate::handle::Typed) implementations for foreign types.
//!
//! ## Implemented Menu
//!
//! - terminal:
//!     - `i8`, `i16`, `i32`, `u8`, `u16` (int32 family)
//!     - `i64`, `u32` (int64 family)
//!     - `f32`, `f64`, `bool`, `String`
//!     - `uuid::Uuid`, `chrono::DateTime<Utc>`, `core::time::Duration`
//!     - [`ByteBuf`](crate::value::ByteBuf)
//! - collections: `Vec<T>`, `VecDeque<T>`, `[T; N]`
//! - maps: `std::collections::HashMap`, `BTreeMap`, `hashbrown::HashMap`
//! - wrappers: `Option<T>` (nullable), `Box<T>` (same handle as `T`)
//!
//! Collections and maps also implement [`ToValue`](crate::value::ToValue)
//! and [`FromValue`](crate::value::FromValue) element-wise.

mod collections;
mod maps;
mod terminal;
mod wrappers;
