//! A JSON reader and writer driven by type descriptors.
//!
//! Described objects are JSON objects keyed by field display name. An
//! object stored where its type is not the only legal one carries its
//! descriptor name under [`TYPE_KEY`]. Numbers, booleans and strings use
//! their JSON form; every other terminal and enumeration is a string in
//! the form of the text registry.
//!
//! ```
//! use ts_format::registry::{Text, TranslatorRegistry};
//! use ts_format::structured::{StructuredReader, StructuredWriter};
//! use ts_schema::engine::MarkerEngine;
//! use ts_schema::handle::{TypeHandle, Typed};
//! use ts_schema::impl_class_value;
//! use ts_schema::model::{ClassModel, FieldMarker, Member, TypeMarker};
//!
//! #[derive(Debug, Clone, PartialEq, Default)]
//! struct Point {
//!     x: i32,
//!     y: i32,
//! }
//!
//! impl Typed for Point {
//!     fn type_handle() -> TypeHandle {
//!         TypeHandle::class::<Self>("demo::Point", || {
//!             ClassModel::new()
//!                 .marked(TypeMarker::new())
//!                 .with_factory::<Point>()
//!                 .with_member(Member::field("x", |p: &Point| &p.x, |p| &mut p.x).marked(FieldMarker::new()))
//!                 .with_member(Member::field("y", |p: &Point| &p.y, |p| &mut p.y).marked(FieldMarker::new()))
//!         })
//!     }
//! }
//!
//! impl_class_value!(Point);
//!
//! let engine = MarkerEngine::new();
//! let text = TranslatorRegistry::<Text>::with_defaults();
//!
//! let json = StructuredWriter::new(&engine, &text).write(&Point { x: 1, y: -2 }).unwrap();
//! assert_eq!(json, serde_json::json!({ "x": 1, "y": -2 }));
//!
//! let point: Point = StructuredReader::new(&engine, &text).read_as(&json).unwrap();
//! assert_eq!(point, Point { x: 1, y: -2 });
//! ```

// -----------------------------------------------------------------------------
// Modules

mod reader;
mod writer;

// -----------------------------------------------------------------------------
// Exports

pub use reader::StructuredReader;
pub use writer::StructuredWriter;

// -----------------------------------------------------------------------------
// Shared

use core::time::Duration;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use ts_schema::descriptor::TypeDescriptor;
use ts_schema::engine::DescriptorEngine;
use ts_schema::handle::{TypeHandle, Typed};
use ts_schema::value::{ByteBuf, Value};
use uuid::Uuid;

use crate::StructuredError;

/// The member naming the concrete type of a tagged object.
pub const TYPE_KEY: &str = "@type";

/// The host type a terminal or enumeration value converts back to.
fn natural_handle(value: &Value) -> Option<TypeHandle> {
    Some(match value {
        Value::Bool(_) => bool::type_handle(),
        Value::Int32(_) => i32::type_handle(),
        Value::Int64(_) => i64::type_handle(),
        Value::Float32(_) => f32::type_handle(),
        Value::Float64(_) => f64::type_handle(),
        Value::Text(_) => String::type_handle(),
        Value::Bytes(_) => ByteBuf::type_handle(),
        Value::Identifier(_) => Uuid::type_handle(),
        Value::DateTime(_) => DateTime::<Utc>::type_handle(),
        Value::Period(_) => Duration::type_handle(),
        Value::Enum(e) => e.handle().clone(),
        _ => return None,
    })
}

fn describe(engine: &dyn DescriptorEngine, handle: &TypeHandle) -> Result<Arc<TypeDescriptor>, StructuredError> {
    engine
        .generate_type(handle)?
        .ok_or_else(|| StructuredError::NotDescribed {
            ty: handle.path().to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;
    use ts_schema::engine::{DescriptorEngine, MarkerEngine};
    use ts_schema::handle::{TypeHandle, Typed};
    use ts_schema::model::{ClassModel, FieldMarker, Member, TypeMarker};
    use ts_schema::value::ObjectValue;
    use ts_schema::{AccessError, HookError, impl_class_value, impl_labeled};
    use uuid::Uuid;

    use super::{StructuredReader, StructuredWriter};
    use crate::StructuredError;
    use crate::registry::{Text, TranslatorRegistry};

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Cat {
        lives: i32,
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Dog {
        name: String,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Status {
        #[default]
        Active,
        Retired,
    }

    impl_labeled!(Status, "tests::Status" { Active => "ACTIVE", Retired => "RETIRED" });

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Record {
        id: Uuid,
        tags: Vec<String>,
        extra: HashMap<String, ObjectValue>,
        status: Status,
        seen: Option<DateTime<Utc>>,
        ratio: f64,
        revision: u32,
        loaded: bool,
    }

    fn mark_loaded(record: &mut Record) -> Result<(), HookError> {
        record.loaded = true;
        Ok(())
    }

    fn check_ratio(record: &mut Record) -> Result<(), HookError> {
        if record.ratio < 0.0 {
            return Err(HookError::rejected("ratio must not be negative"));
        }
        Ok(())
    }

    impl Typed for Cat {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Cat", || {
                ClassModel::new()
                    .marked(TypeMarker::new())
                    .with_factory::<Cat>()
                    .with_member(Member::field("lives", |c: &Cat| &c.lives, |c| &mut c.lives).marked(FieldMarker::new()))
            })
        }
    }

    impl Typed for Dog {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Dog", || {
                ClassModel::new()
                    .marked(TypeMarker::new())
                    .with_factory::<Dog>()
                    .with_member(Member::field("name", |d: &Dog| &d.name, |d| &mut d.name).marked(FieldMarker::new()))
            })
        }
    }

    impl Typed for Record {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Record", || {
                ClassModel::new()
                    .marked(TypeMarker::new())
                    .with_factory::<Record>()
                    .with_post_construct::<Record>(mark_loaded)
                    .with_validation::<Record>(check_ratio)
                    .with_member(Member::field("id", |r: &Record| &r.id, |r| &mut r.id).marked(FieldMarker::new()))
                    .with_member(Member::field("tags", |r: &Record| &r.tags, |r| &mut r.tags).marked(FieldMarker::new()))
                    .with_member(
                        Member::field("extra", |r: &Record| &r.extra, |r| &mut r.extra)
                            .marked(FieldMarker::new().with_type::<Cat>().with_type::<Dog>()),
                    )
                    .with_member(
                        Member::field("status", |r: &Record| &r.status, |r| &mut r.status)
                            .marked(FieldMarker::named("state")),
                    )
                    .with_member(Member::field("seen", |r: &Record| &r.seen, |r| &mut r.seen).marked(FieldMarker::new()))
                    .with_member(Member::field("ratio", |r: &Record| &r.ratio, |r| &mut r.ratio).marked(FieldMarker::new()))
                    .with_member(
                        Member::read_only("revision", |r: &Record| &r.revision).marked(FieldMarker::new()),
                    )
            })
        }
    }

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Holder {
        any: Option<ObjectValue>,
        either: Option<ObjectValue>,
    }

    impl Typed for Holder {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Holder", || {
                ClassModel::new()
                    .marked(TypeMarker::new())
                    .with_factory::<Holder>()
                    .with_member(Member::field("any", |h: &Holder| &h.any, |h| &mut h.any).marked(FieldMarker::new()))
                    .with_member(
                        Member::field("either", |h: &Holder| &h.either, |h| &mut h.either)
                            .marked(FieldMarker::new().with_type::<i32>().with_type::<String>()),
                    )
            })
        }
    }

    impl_class_value!(Cat, Dog, Record, Holder);

    fn record() -> Record {
        Record {
            id: Uuid::from_u128(7),
            tags: vec![String::from("a"), String::from("b")],
            extra: HashMap::from([
                (String::from("tom"), ObjectValue::new(Cat { lives: 9 })),
                (String::from("rex"), ObjectValue::new(Dog { name: String::from("Rex") })),
            ]),
            status: Status::Retired,
            seen: Some(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap()),
            ratio: 0.25,
            revision: 3,
            loaded: false,
        }
    }

    #[test]
    fn writes_fields_by_display_name() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let json = StructuredWriter::new(&engine, &text).write(&record()).unwrap();

        assert_eq!(
            json,
            json!({
                "id": "00000000-0000-0000-0000-000000000007",
                "tags": ["a", "b"],
                "extra": {
                    "tom": { "@type": "Cat", "lives": 9 },
                    "rex": { "@type": "Dog", "name": "Rex" },
                },
                "state": "RETIRED",
                "seen": "2024-05-01T08:00:00Z",
                "ratio": 0.25,
                "revision": 3,
            })
        );
    }

    #[test]
    fn reads_back_and_runs_hooks() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let json = StructuredWriter::new(&engine, &text).write(&record()).unwrap();

        let read: Record = StructuredReader::new(&engine, &text).read_as(&json).unwrap();
        assert!(read.loaded);
        assert_eq!(read.revision, 0);
        assert_eq!(
            read,
            Record {
                loaded: true,
                revision: 0,
                ..record()
            }
        );
    }

    #[test]
    fn missing_members_keep_defaults() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let read: Record = StructuredReader::new(&engine, &text)
            .read_as(&json!({ "tags": [], "seen": null }))
            .unwrap();
        assert_eq!(
            read,
            Record {
                loaded: true,
                ..Record::default()
            }
        );
    }

    #[test]
    fn unknown_discriminator() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let err = StructuredReader::new(&engine, &text)
            .read_as::<Record>(&json!({ "extra": { "x": { "@type": "Fox" } } }))
            .unwrap_err();
        assert_eq!(
            err,
            StructuredError::UnknownType {
                name: String::from("Fox"),
            }
        );
    }

    #[test]
    fn validation_failures_surface() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let err = StructuredReader::new(&engine, &text)
            .read_as::<Record>(&json!({ "ratio": -1.0 }))
            .unwrap_err();
        assert_eq!(
            err,
            StructuredError::Access(AccessError::Hook(HookError::rejected("ratio must not be negative")))
        );
    }

    #[test]
    fn shape_errors() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let reader = StructuredReader::new(&engine, &text);
        assert!(matches!(
            reader.read_as::<Record>(&json!([1, 2])),
            Err(StructuredError::Shape { expected: "an object", .. })
        ));
        assert!(matches!(
            reader.read_as::<Record>(&json!({ "state": "SLEEPING" })),
            Err(StructuredError::Conversion(_))
        ));
        assert!(matches!(
            reader.read(&String::type_handle(), &json!({})),
            Err(StructuredError::NotDescribed { .. })
        ));
    }

    #[test]
    fn root_typed_fields_round_trip() {
        let engine = MarkerEngine::new();
        let text = TranslatorRegistry::<Text>::with_defaults();
        let writer = StructuredWriter::new(&engine, &text);
        let reader = StructuredReader::new(&engine, &text);

        let holder = Holder {
            any: Some(ObjectValue::new(Cat { lives: 3 })),
            either: Some(ObjectValue::new(5_i32)),
        };
        let json = writer.write(&holder).unwrap();
        assert_eq!(json, json!({ "any": { "@type": "Cat", "lives": 3 }, "either": 5 }));
        assert_eq!(reader.read_as::<Holder>(&json).unwrap(), holder);

        let holder = Holder {
            any: Some(ObjectValue::new(5_i64)),
            either: Some(ObjectValue::new(String::from("five"))),
        };
        let json = writer.write(&holder).unwrap();
        assert_eq!(json, json!({ "any": 5, "either": "five" }));
        assert_eq!(reader.read_as::<Holder>(&json).unwrap(), holder);
    }

    #[test]
    fn root_tags_resolve_once_published() {
        let text = TranslatorRegistry::<Text>::with_defaults();
        let json = json!({ "any": { "@type": "Cat", "lives": 3 } });

        let engine = MarkerEngine::new();
        let reader = StructuredReader::new(&engine, &text);
        assert_eq!(
            reader.read_as::<Holder>(&json).unwrap_err(),
            StructuredError::UnknownType {
                name: String::from("Cat"),
            }
        );

        engine.generate::<Cat>().unwrap();
        let read: Holder = reader.read_as(&json).unwrap();
        assert_eq!(read.any, Some(ObjectValue::new(Cat { lives: 3 })));
        assert_eq!(read.either, None);
    }
}
