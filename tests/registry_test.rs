//! Integration tests for the schema registry.

use std::any::Any;
use std::collections::HashMap;

use querybind::{
    parse_query, ConfigError, FieldSpec, ParseError, QueryRecord, RecordSchema, RegistryError,
    SchemaRegistry,
};

#[derive(Debug, Default, PartialEq)]
struct Filter {
    status: String,
    limit: i64,
    tags: Vec<String>,
}

impl QueryRecord for Filter {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new()
            .bind(FieldSpec::named("Status").key("status"), |f| &mut f.status)
            .bind(FieldSpec::named("Limit").key("limit").default("50"), |f| &mut f.limit)
            .bind(FieldSpec::named("Tags").key("tags"), |f| &mut f.tags)
    }
}

#[derive(Debug, Default, PartialEq)]
struct Paging {
    page: Option<i64>,
}

impl QueryRecord for Paging {
    fn schema() -> RecordSchema<Self> {
        RecordSchema::<Self>::new().bind(FieldSpec::named("Page").key("page"), |p| &mut p.page)
    }
}

fn params(entries: &[(&str, &[&str])]) -> HashMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(key, values)| {
            (
                key.to_string(),
                values.iter().map(|v| v.to_string()).collect(),
            )
        })
        .collect()
}

#[test]
fn test_register_and_contains() {
    let registry = SchemaRegistry::new();
    assert!(registry.is_empty());

    registry.register::<Filter>().unwrap();

    assert!(registry.contains::<Filter>());
    assert!(!registry.contains::<Paging>());
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = SchemaRegistry::new();
    registry.register::<Filter>().unwrap();

    let result = registry.register::<Filter>();

    assert!(matches!(result, Err(RegistryError::DuplicateRecord(ref name)) if name.ends_with("Filter")));
    assert_eq!(registry.len(), 1);
}

#[test]
fn test_parse_registers_on_first_use() {
    let registry = SchemaRegistry::new();
    let input = params(&[("page", &["3"])]);

    let mut paging = Paging::default();
    registry.parse(&input, &mut paging, None).unwrap();

    assert_eq!(paging.page, Some(3));
    assert!(registry.contains::<Paging>());
}

#[test]
fn test_parse_matches_parse_query() {
    let registry = SchemaRegistry::new();
    registry.register::<Filter>().unwrap();

    for input in [
        params(&[("status", &["open"]), ("tags", &["a", "b"])]),
        params(&[("limit", &["x"])]),
        params(&[]),
    ] {
        let mut cached = Filter::default();
        let mut fresh = Filter::default();

        let cached_result = registry.parse(&input, &mut cached, None);
        let fresh_result = parse_query(&input, &mut fresh, None);

        assert_eq!(cached_result, fresh_result);
        assert_eq!(cached, fresh);
    }
}

#[test]
fn test_parse_any_binds_registered_record() {
    let registry = SchemaRegistry::new();
    registry.register::<Filter>().unwrap();

    let input = params(&[("status", &["closed"])]);
    let mut filter = Filter::default();
    let target: &mut dyn Any = &mut filter;

    registry.parse_any(&input, Some(target), None).unwrap();

    assert_eq!(
        filter,
        Filter {
            status: "closed".to_string(),
            limit: 50,
            tags: vec![],
        }
    );
}

#[test]
fn test_parse_any_reports_validation_errors() {
    let registry = SchemaRegistry::new();
    registry.register::<Filter>().unwrap();

    let input = params(&[("limit", &["many"])]);
    let mut filter = Filter::default();

    let error = registry
        .parse_any(&input, Some(&mut filter as &mut dyn Any), None)
        .unwrap_err();

    let errors = error.into_validation().unwrap();
    assert_eq!(errors.messages_for("status"), ["field is required"]);
    assert_eq!(errors.messages_for("limit"), ["must be a valid integer"]);
}

#[test]
fn test_parse_any_without_target() {
    let registry = SchemaRegistry::new();
    registry.register::<Filter>().unwrap();

    let result = registry.parse_any(&params(&[]), None, None);

    assert_eq!(result, Err(ParseError::Config(ConfigError::InvalidTarget)));
}

#[test]
fn test_parse_any_with_unregistered_record() {
    let registry = SchemaRegistry::new();
    registry.register::<Filter>().unwrap();

    let mut paging = Paging::default();
    let result = registry.parse_any(
        &params(&[("page", &["1"])]),
        Some(&mut paging as &mut dyn Any),
        None,
    );

    assert_eq!(result, Err(ParseError::Config(ConfigError::InvalidTarget)));
    assert_eq!(paging.page, None);
}

#[test]
fn test_cloned_registry_shares_schemas() {
    let registry = SchemaRegistry::new();
    let clone = registry.clone();

    clone.register::<Paging>().unwrap();

    assert!(registry.contains::<Paging>());
}
