use std::collections::BTreeMap;

use anyhow::Result;
use serde_json::json;

use super::*;
use crate::error::AppError;

fn config(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

fn expect_invalid_value(schema: &ConfigSchema, value: &str, expected_doc: &str) {
    let err = match schema.validate(&config(&[("foo", value)])) {
        Ok(_) => panic!("expected value {:?} to be rejected", value),
        Err(err) => err,
    };
    match AppError::downcast(&err) {
        Some(AppError::InvalidValue { name, doc }) => {
            assert_eq!(name, "foo", "unexpected property name in error");
            assert_eq!(doc, expected_doc, "unexpected doc in error for value {:?}", value);
        }
        other => panic!("expected InvalidValue error for {:?}, got {:?}", value, other),
    }
}

#[test]
fn define_registers_property_and_validates() -> Result<()> {
    let validator = Validator::new("(?i)^foo$", None, None, "foo")?;
    let schema = ConfigSchema::new().define("foo", validator, "somedocs");

    let prop = schema.get("foo").expect("expected foo to be registered");
    assert_eq!(prop.name, "foo");
    assert_eq!(prop.doc, "somedocs");
    assert!(schema.validate(&config(&[])).is_ok(), "expected an empty config to be valid");
    for val in ["foo", "FOO", "Foo"] {
        assert!(schema.validate(&config(&[("foo", val)])).is_ok(), "expected {:?} to be valid", val);
    }

    let err = schema.validate(&config(&[("goo", "goo")])).unwrap_err();
    assert!(
        matches!(AppError::downcast(&err), Some(AppError::UnknownProperty(name)) if name == "goo"),
        "expected UnknownProperty naming goo, got {:?}",
        err
    );
    assert_eq!(err.to_string(), "unknown configuration \"goo\"");
    Ok(())
}

#[test]
fn redefining_a_property_keeps_first_position() -> Result<()> {
    let schema = ConfigSchema::new()
        .define("b", BOOLEAN.clone(), "first")
        .define("a", INT.clone(), "a docs")
        .define("b", INT.clone(), "second");

    assert_eq!(schema.len(), 2, "expected redefinition to not add a property");
    let names: Vec<_> = schema.iter().map(|prop| prop.name.as_str()).collect();
    assert_eq!(names, vec!["b", "a"], "expected registration order to be preserved");
    let prop = schema.get("b").expect("expected b to be registered");
    assert_eq!(prop.doc, "second");
    assert!(prop.is_valid("10"), "expected redefined validator to be used");
    Ok(())
}

#[test]
fn validate_json_rejects_non_objects_and_non_strings() {
    let schema = ConfigSchema::new().define("foo", INT.clone(), "somedocs");

    for input in [json!(null), json!(123), json!("goo"), json!(["foo"])] {
        let err = schema.validate_json(&input).unwrap_err();
        assert!(
            matches!(AppError::downcast(&err), Some(AppError::InvalidInput(msg)) if msg == "config is not an object"),
            "expected non-object error for {}, got {:?}",
            input,
            err
        );
    }
    for input in [json!({"foo": null}), json!({"foo": 0})] {
        let err = schema.validate_json(&input).unwrap_err();
        assert!(
            matches!(AppError::downcast(&err), Some(AppError::InvalidInput(msg)) if msg == "configuration value must be a string"),
            "expected non-string error for {}, got {:?}",
            input,
            err
        );
    }
    assert!(schema.validate_json(&json!({"foo": "42"})).is_ok(), "expected string value to be accepted");
    assert!(schema.validate_json(&json!({})).is_ok(), "expected empty object to be accepted");
}

#[test]
fn int_validator() {
    let schema = ConfigSchema::new().define("foo", INT.clone(), "somedocs");
    for val in ["", "foo", "2147483648", "02147483648", "-2147483649", "-02147483649"] {
        expect_invalid_value(&schema, val, "an INT");
    }
    for val in ["2147483647", "02147483647", "0", "-0", "-2147483648", "-02147483648"] {
        assert!(schema.validate(&config(&[("foo", val)])).is_ok(), "expected {:?} to be a valid INT", val);
    }
}

#[test]
fn int_not_negative_validator() {
    let schema = ConfigSchema::new().define("foo", INT_NOT_NEGATIVE.clone(), "somedocs");
    for val in ["", "foo", "2147483648", "-1", "-0", "-00000000000001", "-2147483648"] {
        expect_invalid_value(&schema, val, "an INT >= 0");
    }
    for val in ["2147483647", "02147483647", "0"] {
        assert!(schema.validate(&config(&[("foo", val)])).is_ok(), "expected {:?} to be a valid INT >= 0", val);
    }
}

#[test]
fn int_1_or_more_validator() {
    let schema = ConfigSchema::new().define("foo", INT_1_OR_MORE.clone(), "somedocs");
    for val in ["", "0", "000", "-0", "-1", "2147483648"] {
        expect_invalid_value(&schema, val, "an INT >= 1");
    }
    for val in ["1", "01", "2147483647"] {
        assert!(schema.validate(&config(&[("foo", val)])).is_ok(), "expected {:?} to be a valid INT >= 1", val);
    }
}

#[test]
fn long_validators() {
    let schema = ConfigSchema::new().define("foo", LONG.clone(), "somedocs");
    for val in ["", "9223372036854775808", "-9223372036854775809", "-09223372036854775809"] {
        expect_invalid_value(&schema, val, "a LONG");
    }
    for val in ["9223372036854775807", "09223372036854775807", "-9223372036854775808", "0"] {
        assert!(schema.validate(&config(&[("foo", val)])).is_ok(), "expected {:?} to be a valid LONG", val);
    }

    let schema = ConfigSchema::new().define("foo", LONG_NOT_NEGATIVE.clone(), "somedocs");
    for val in ["-1", "-0", "9223372036854775808"] {
        expect_invalid_value(&schema, val, "a LONG >= 0");
    }
    assert!(schema.validate(&config(&[("foo", "9223372036854775807")])).is_ok());
}

#[test]
fn boolean_and_double_validators() {
    let schema = ConfigSchema::new().define("foo", BOOLEAN.clone(), "somedocs");
    for val in ["", "0", "1", "TRUE"] {
        expect_invalid_value(&schema, val, "\"true\" or \"false\"");
    }
    assert!(schema.validate(&config(&[("foo", "true")])).is_ok());
    assert!(schema.validate(&config(&[("foo", "false")])).is_ok());

    let schema = ConfigSchema::new().define("foo", DOUBLE_0_1.clone(), "somedocs");
    for val in ["", "-0", "2", "-1", "1.5"] {
        expect_invalid_value(&schema, val, "a DOUBLE between 0 and 1");
    }
    for val in ["0", "0.5", "0.00000000000000123456789", "1"] {
        assert!(schema.validate(&config(&[("foo", val)])).is_ok(), "expected {:?} to be a valid DOUBLE", val);
    }
}

#[test]
fn token_validator_escapes_tokens() {
    let validator = Validator::tokens("a.b c,d");
    assert_eq!(validator.doc(), "\"a.b\" or \"c,d\"");
    assert!(validator.is_valid("a.b"));
    assert!(validator.is_valid("c,d"));
    assert!(!validator.is_valid("axb"), "expected `.` to be matched literally");
    assert!(!validator.is_valid("a.b c,d"));
}

#[test]
fn topic_schema_validation() {
    let err = TOPIC_CONFIG.validate(&config(&[("unknown.key", "1")])).unwrap_err();
    assert!(
        matches!(AppError::downcast(&err), Some(AppError::UnknownProperty(name)) if name == "unknown.key"),
        "expected UnknownProperty naming unknown.key, got {:?}",
        err
    );

    let err = TOPIC_CONFIG.validate(&config(&[("min.insync.replicas", "0")])).unwrap_err();
    assert!(
        matches!(AppError::downcast(&err), Some(AppError::InvalidValue { name, .. }) if name == "min.insync.replicas"),
        "expected InvalidValue naming min.insync.replicas, got {:?}",
        err
    );

    let valid = config(&[
        ("cleanup.policy", "compact"),
        ("retention.ms", "604800000"),
        ("retention.bytes", "-1"),
        ("compression.type", "lz4"),
        ("message.timestamp.type", "LogAppendTime"),
    ]);
    assert!(TOPIC_CONFIG.validate(&valid).is_ok(), "expected topic config to be valid");
    assert!(TOPIC_CONFIG.validate(&config(&[("cleanup.policy", "compact,delete")])).is_ok());
    assert!(TOPIC_CONFIG.validate(&config(&[("cleanup.policy", "archive")])).is_err());
}

#[test]
fn topic_schema_lists_sorted_by_name() {
    let listed = TOPIC_CONFIG.list();
    assert_eq!(listed.len(), TOPIC_CONFIG.len(), "expected every property to be listed");
    assert_eq!(listed.len(), 21, "unexpected number of topic properties");
    let mut sorted: Vec<_> = listed.iter().map(|(name, _)| *name).collect();
    sorted.sort_unstable();
    let names: Vec<_> = listed.iter().map(|(name, _)| *name).collect();
    assert_eq!(names, sorted, "expected listing to be sorted by name");
    assert_eq!(names.first().copied(), Some("cleanup.policy"));
    assert!(listed.iter().all(|(_, doc)| !doc.is_empty()), "expected every property to be documented");
    // Registration order is preserved separately from listing order.
    assert_eq!(TOPIC_CONFIG.iter().next().map(|prop| prop.name.as_str()), Some("segment.bytes"));
}

#[test]
fn client_schema_validation() {
    assert!(CLIENT_CONFIG.validate(&config(&[("producer_byte_rate", "1048576")])).is_ok());
    assert!(CLIENT_CONFIG.validate(&config(&[("consumer_byte_rate", "-1")])).is_err());
    assert!(CLIENT_CONFIG.validate(&config(&[("retention.ms", "1")])).is_err());
}

#[test]
fn numeric_validators_reject_non_ascii_digits() {
    let schema = ConfigSchema::new().define("foo", INT_1_OR_MORE.clone(), "somedocs");
    for val in ["\u{0660}", "\u{0661}", "\u{FF11}", "1\u{0669}"] {
        expect_invalid_value(&schema, val, "an INT >= 1");
    }
    let schema = ConfigSchema::new().define("foo", DOUBLE_0_1.clone(), "somedocs");
    expect_invalid_value(&schema, "0.\u{0665}", "a DOUBLE between 0 and 1");

    for (name, val) in [
        ("min.insync.replicas", "\u{0660}"),
        ("min.insync.replicas", "\u{0661}"),
        ("segment.bytes", "\u{0669}\u{0669}\u{0669}\u{0669}\u{0669}\u{0669}\u{0669}\u{0669}\u{0669}"),
        ("retention.ms", "-\u{0661}"),
    ] {
        let err = match TOPIC_CONFIG.validate(&config(&[(name, val)])) {
            Ok(_) => panic!("expected {:?} to be rejected for {}", val, name),
            Err(err) => err,
        };
        assert!(
            matches!(AppError::downcast(&err), Some(AppError::InvalidValue { name: invalid, .. }) if invalid == name),
            "expected InvalidValue naming {}, got {:?}",
            name,
            err
        );
    }
}
