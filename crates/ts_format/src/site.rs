use std::sync::Arc;

use ts_schema::descriptor::{FieldDescriptor, FieldValue};
use ts_schema::site::TranslatedDataSite;

use crate::LookupError;
use crate::registry::{Text, TranslatorRegistry};
use crate::text::{ListOptions, ListToText, PairsToText, TextToList, TextToPairs};

/// Builds a site reading and writing `field` as text.
///
/// - Object fields use the pair of their value type.
/// - Collection fields join and split comma-delimited lists of the element pair.
/// - Map fields use bracketed `[key,value]` pairs of the key and value pairs.
///
/// Fields accepting more than one value type, or one key type, are
/// [`LookupError::Polymorphic`].
pub fn translated_site(
    registry: &TranslatorRegistry<Text>,
    field: &FieldDescriptor,
) -> Result<TranslatedDataSite, LookupError> {
    if field.is_polymorphic() {
        return Err(LookupError::Polymorphic {
            field: field.name().to_owned(),
        });
    }

    let site = field.site().clone();
    Ok(match field.value() {
        FieldValue::Object(types) => {
            let pair = registry.get(types.first().handle())?;
            TranslatedDataSite::new(site, pair.to_external, pair.from_external)
        }
        FieldValue::Collection(types) => {
            let element = registry.get(types.first().handle())?;
            let options = ListOptions::new();
            TranslatedDataSite::new(
                site,
                Arc::new(ListToText::with_element(options.delimiter(), element.to_external)),
                Arc::new(TextToList::with_element(options, element.from_external)),
            )
        }
        FieldValue::Map { keys, values } => {
            let key = registry.get(keys.first().handle())?;
            let value = registry.get(values.first().handle())?;
            TranslatedDataSite::new(
                site,
                Arc::new(PairsToText::with_translators(key.to_external, value.to_external)),
                Arc::new(TextToPairs::with_translators(key.from_external, value.from_external)),
            )
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use ts_schema::engine::{DescriptorEngine, MarkerEngine};
    use ts_schema::handle::{TypeHandle, Typed};
    use ts_schema::impl_class_value;
    use ts_schema::impl_labeled;
    use ts_schema::model::{ClassModel, FieldMarker, Member, TypeMarker};
    use ts_schema::site::DataSite;
    use ts_schema::value::{ObjectValue, Value};

    use super::translated_site;
    use crate::LookupError;
    use crate::registry::{Text, TranslatorRegistry};

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    enum Tier {
        #[default]
        Free,
        Paid,
    }

    impl_labeled!(Tier, "tests::Tier" { Free => "FREE", Paid => "PAID" });

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Account {
        tier: Tier,
        limit: Option<i64>,
        ports: Vec<u16>,
        quotas: BTreeMap<String, i32>,
        anything: Option<ObjectValue>,
    }

    impl Typed for Account {
        fn type_handle() -> TypeHandle {
            TypeHandle::class::<Self>("tests::Account", || {
                ClassModel::new()
                    .marked(TypeMarker::new())
                    .with_factory::<Account>()
                    .with_member(Member::field("tier", |a: &Account| &a.tier, |a| &mut a.tier).marked(FieldMarker::new()))
                    .with_member(Member::field("limit", |a: &Account| &a.limit, |a| &mut a.limit).marked(FieldMarker::new()))
                    .with_member(Member::field("ports", |a: &Account| &a.ports, |a| &mut a.ports).marked(FieldMarker::new()))
                    .with_member(
                        Member::field("quotas", |a: &Account| &a.quotas, |a| &mut a.quotas).marked(FieldMarker::new()),
                    )
                    .with_member(
                        Member::field("anything", |a: &Account| &a.anything, |a| &mut a.anything)
                            .marked(FieldMarker::new().with_type::<i32>().with_type::<String>()),
                    )
            })
        }
    }

    impl_class_value!(Account);

    fn account() -> Account {
        Account {
            tier: Tier::Paid,
            limit: Some(10),
            ports: vec![80, 443],
            quotas: BTreeMap::from([(String::from("a"), 1), (String::from("b"), 2)]),
            anything: None,
        }
    }

    #[test]
    fn object_list_and_map_fields() {
        let engine = MarkerEngine::new();
        let registry = TranslatorRegistry::<Text>::with_defaults();
        let descriptor = engine.generate::<Account>().unwrap().unwrap();
        let mut account = account();

        let read = |name: &str, account: &Account| {
            let site = translated_site(&registry, descriptor.field(name).unwrap()).unwrap();
            site.get(account).unwrap()
        };
        assert_eq!(read("tier", &account), Value::from("PAID"));
        assert_eq!(read("limit", &account), Value::from("10"));
        assert_eq!(read("ports", &account), Value::from("80,443"));
        assert_eq!(read("quotas", &account), Value::from("[a,1][b,2]"));

        let ports = translated_site(&registry, descriptor.field("ports").unwrap()).unwrap();
        ports.set(&mut account, Value::from("22,8080")).unwrap();
        assert_eq!(account.ports, [22, 8080]);

        let limit = translated_site(&registry, descriptor.field("limit").unwrap()).unwrap();
        limit.set(&mut account, Value::Null).unwrap();
        assert_eq!(account.limit, None);
    }

    #[test]
    fn polymorphic_fields_are_rejected() {
        let engine = MarkerEngine::new();
        let registry = TranslatorRegistry::<Text>::with_defaults();
        let descriptor = engine.generate::<Account>().unwrap().unwrap();
        assert_eq!(
            translated_site(&registry, descriptor.field("anything").unwrap()).unwrap_err(),
            LookupError::Polymorphic {
                field: String::from("anything"),
            }
        );
    }
}
