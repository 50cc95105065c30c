use std::fs;
use std::path::{Path, PathBuf};

use proptest::prelude::*;
use simexp_core::{FlatMap, SimExpError, Value};
use simexp_record::{read_params, write_params, Located, RecordCodec, RecordStore};

const FIXTURE: &str = include_str!("fixtures/dsin.txt");

fn fixture_store() -> RecordStore {
    RecordStore::from_text("fixtures/dsin.txt", FIXTURE)
}

fn copy_fixture(dir: &Path) -> PathBuf {
    let path = dir.join("dsin.txt");
    fs::write(&path, FIXTURE).expect("write fixture");
    path
}

/// Asserts that `after` differs from `before` only inside the value span of
/// `name`, and returns the replaced and replacing text.
fn changed_span(before: &str, after: &str, name: &str) -> (String, String) {
    let Located::Unique(span) = RecordCodec::shared().locate(name, before) else {
        panic!("{name} not located");
    };
    let tail = before.len() - span.value.end;
    assert_eq!(&after[..span.value.start], &before[..span.value.start]);
    assert_eq!(&after[after.len() - tail..], &before[span.value.end..]);
    (
        before[span.value.clone()].to_string(),
        after[span.value.start..after.len() - tail].to_string(),
    )
}

#[test]
fn reads_single_and_wrapped_records() {
    let store = fixture_store();
    assert_eq!(store.read_field("L.L").unwrap(), 18.0);
    assert_eq!(store.read_field("C1.C").unwrap(), 10.0);
    assert_eq!(store.read_field("Ro.R").unwrap(), 0.0125);
    assert_eq!(store.read_field("StopTime").unwrap(), 2500.0);
    assert_eq!(store.read_field("Tolerance").unwrap(), 1e-4);
}

#[test]
fn batch_reads_keep_caller_order() {
    let store = fixture_store();
    assert_eq!(
        store.read_fields(["C2.C", "L.L", "C1.C"]).unwrap(),
        vec![100.0, 18.0, 10.0]
    );
}

#[test]
fn missing_field_names_field_and_file() {
    let err = fixture_store()
        .read_field("nonexistent.path")
        .expect_err("missing field");
    match err {
        SimExpError::FieldNotFound(info) => {
            assert_eq!(info.context["field"], "nonexistent.path");
            assert_eq!(info.context["file"], "fixtures/dsin.txt");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn write_changes_only_the_value_span() {
    let mut store = fixture_store();
    store.write_field("C1.C", &Value::Float(15.5)).unwrap();
    let (old, new) = changed_span(FIXTURE, store.text(), "C1.C");
    assert_eq!(old, "10");
    assert_eq!(new, "15.5");
    assert_eq!(store.read_field("C1.C").unwrap(), 15.5);
    assert_eq!(store.read_field("L.L").unwrap(), 18.0);
}

#[test]
fn booleans_are_written_as_integers() {
    let mut store = fixture_store();
    store.write_field("Algorithm", &Value::Bool(true)).unwrap();
    let (old, new) = changed_span(FIXTURE, store.text(), "Algorithm");
    assert_eq!((old.as_str(), new.as_str()), ("8", "1"));
}

#[test]
fn arrays_are_rejected_without_touching_the_buffer() {
    let mut store = fixture_store();
    let err = store
        .write_field("L.L", &Value::from(vec![1.0, 2.0]))
        .expect_err("array");
    assert!(matches!(err, SimExpError::UnsupportedValueType(_)));
    assert_eq!(store.text(), FIXTURE);
}

#[test]
fn failed_batch_leaves_buffer_and_file_untouched() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture(dir.path());
    let mut params = FlatMap::new();
    params.insert("L.L".to_string(), Value::Int(20));
    params.insert("missing.field".to_string(), Value::Int(1));

    let mut store = RecordStore::open(&path).unwrap();
    let err = store
        .write_fields(params.iter().map(|(k, v)| (k.as_str(), v)))
        .expect_err("batch");
    assert!(matches!(err, SimExpError::FieldNotFound(_)));
    assert_eq!(store.text(), FIXTURE);

    assert!(write_params(&path, &params).is_err());
    assert_eq!(fs::read_to_string(&path).unwrap(), FIXTURE);
}

#[test]
fn write_params_flushes_all_fields() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = copy_fixture(dir.path());
    let mut params = FlatMap::new();
    params.insert("L.L".to_string(), Value::Int(10));
    params.insert("C1.C".to_string(), Value::Int(15));
    write_params(&path, &params).unwrap();
    assert_eq!(read_params(&path, ["L.L", "C1.C"]).unwrap(), vec![10.0, 15.0]);

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains(
        " -1      10                       0                       0                  1   280   # L.L"
    ));
    assert!(text.contains(" -1      15                       0  1.0000000000000000E+100\n  1   280   # C1.C"));
}

#[test]
fn ambiguous_records_are_reported() {
    let text = format!("{FIXTURE} -1      11                       0  0  1   280   # L.L\n");
    let mut store = RecordStore::from_text("dup.txt", text.clone());
    let err = store.write_field("L.L", &Value::Int(1)).expect_err("ambiguous");
    assert!(matches!(err, SimExpError::AmbiguousField(_)));
    assert_eq!(store.text(), text);

    match store.read_field("L.L").expect_err("ambiguous read") {
        SimExpError::AmbiguousField(info) => {
            assert_eq!(info.context["field"], "L.L");
            assert_eq!(info.context["matches"], "2");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(store.read_field("C1.C").unwrap(), 10.0);
}

#[test]
fn null_values_are_not_written() {
    let mut store = fixture_store();
    let err = store.write_field("L.L", &Value::Null).expect_err("null");
    assert!(matches!(err, SimExpError::UnsupportedValueType(_)));
    assert_eq!(store.text(), FIXTURE);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = RecordStore::open("/nonexistent/dsin.txt").expect_err("missing file");
    assert!(matches!(err, SimExpError::Io(_)));
}

proptest! {
    #[test]
    fn written_reals_read_back(value in -1.0e12f64..1.0e12) {
        let mut store = fixture_store();
        store.write_field("C2.C", &Value::Float(value)).unwrap();
        prop_assert_eq!(store.read_field("C2.C").unwrap(), value);
        let (_, new) = changed_span(FIXTURE, store.text(), "C2.C");
        prop_assert_eq!(new, value.to_string());
    }
}
