//! Integration tests for converting a DOTA test split after a train/val run.

use std::fs;
use std::path::Path;

use dota2yolo::config::{ConvertConfig, TestConfig, TrainValConfig};
use dota2yolo::conversion::{convert_test, convert_trainval, ConversionIssueCode};
use dota2yolo::split::SplitOptions;
use dota2yolo::ConvertError;
use serde_yaml::Value;

mod common;
use common::{file_names, DotaFixture};

fn trainval(source: &Path, output: &Path) {
    DotaFixture::new(source)
        .image("P0001.png", 100, 100)
        .image("P0002.png", 100, 100)
        .annotation("P0001", "10 10 50 10 50 50 10 50 ship 0\n")
        .annotation("P0002", "10 10 50 10 50 50 10 50 plane 0\n");

    let config = TrainValConfig {
        convert: ConvertConfig::from_dota_root(source, output),
        split: SplitOptions {
            train_ratio: 0.5,
            seed: Some(42),
        },
    };
    convert_trainval(&config).expect("trainval run");
}

fn test_config(source: &Path, output: &Path) -> TestConfig {
    TestConfig {
        convert: ConvertConfig::from_dota_root(source, output),
    }
}

fn read_yaml(path: &Path) -> Value {
    serde_yaml::from_str(&fs::read_to_string(path).expect("read data.yaml")).expect("parse yaml")
}

#[test]
fn test_split_reuses_class_ids_and_keeps_train_val_entries() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("yolo");
    trainval(&temp.path().join("trainval"), &output);
    let before = read_yaml(&output.join("data.yaml"));

    let test_source = temp.path().join("test");
    DotaFixture::new(&test_source)
        .image("T0001.png", 200, 200)
        .annotation(
            "T0001",
            "20 20 100 20 100 100 20 100 ship 0\n0 0 1 0 1 1 0 1 tank 0\n",
        );

    let report = convert_test(&test_config(&test_source, &output)).expect("test run");

    assert_eq!(report.classes, ["plane", "ship"]);
    assert_eq!(report.split_images("test"), Some(1));
    assert_eq!(report.counts.objects_converted, 1);
    assert_eq!(report.count_code(ConversionIssueCode::UnknownClass), 1);

    assert_eq!(
        fs::read_to_string(output.join("test/labels/T0001.txt")).expect("read label"),
        "1 0.1 0.1 0.5 0.1 0.5 0.5 0.1 0.5\n"
    );
    assert_eq!(
        fs::read_to_string(output.join("classes.txt")).expect("read classes"),
        "plane\nship\n"
    );

    let after = read_yaml(&output.join("data.yaml"));
    assert_eq!(after["train"], before["train"]);
    assert_eq!(after["val"], before["val"]);
    assert_eq!(after["nc"].as_u64(), Some(2));
    let test = after["test"].as_str().expect("test path");
    assert!(Path::new(test).is_absolute());
    assert!(Path::new(test).ends_with("test/images"));

    // The earlier splits are left alone.
    assert_eq!(file_names(&output.join("train/images")).len(), 1);
    assert_eq!(file_names(&output.join("val/images")).len(), 1);
}

#[test]
fn test_split_requires_classes_txt() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("yolo");
    let test_source = temp.path().join("test");
    DotaFixture::new(&test_source)
        .image("T0001.png", 10, 10)
        .annotation("T0001", "0 0 1 0 1 1 0 1 ship 0\n");

    let err = convert_test(&test_config(&test_source, &output)).unwrap_err();
    assert!(matches!(err, ConvertError::ClassListMissing { .. }));
    assert!(!output.join("test").exists());
}

#[test]
fn test_split_rejects_empty_classes_txt() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("yolo");
    fs::create_dir_all(&output).expect("create output");
    fs::write(output.join("classes.txt"), "\n\n").expect("write classes");

    let test_source = temp.path().join("test");
    DotaFixture::new(&test_source).image("T0001.png", 10, 10);

    let err = convert_test(&test_config(&test_source, &output)).unwrap_err();
    assert!(matches!(err, ConvertError::ClassListEmpty { .. }));
}

#[test]
fn test_split_without_train_val_fills_placeholders() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("yolo");
    fs::create_dir_all(&output).expect("create output");
    fs::write(output.join("classes.txt"), "ship\n").expect("write classes");

    let test_source = temp.path().join("test");
    DotaFixture::new(&test_source).image("T0001.png", 10, 10);

    let report = convert_test(&test_config(&test_source, &output)).expect("test run");
    assert_eq!(report.count_code(ConversionIssueCode::MissingAnnotation), 1);
    assert!(fs::read_to_string(output.join("test/labels/T0001.txt"))
        .expect("read label")
        .is_empty());

    let yaml = read_yaml(&output.join("data.yaml"));
    assert!(yaml["train"].as_str().is_some());
    assert!(yaml["val"].as_str().is_some());
    assert_eq!(yaml["names"][0].as_str(), Some("ship"));
}

#[test]
fn unparseable_data_yaml_is_replaced_with_a_warning() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let output = temp.path().join("yolo");
    fs::create_dir_all(&output).expect("create output");
    fs::write(output.join("classes.txt"), "ship\n").expect("write classes");
    fs::write(output.join("data.yaml"), "train: [unclosed\n").expect("write yaml");

    let test_source = temp.path().join("test");
    DotaFixture::new(&test_source).image("T0001.png", 10, 10);

    let report = convert_test(&test_config(&test_source, &output)).expect("test run");
    assert_eq!(report.count_code(ConversionIssueCode::DataYamlReplaced), 1);

    let yaml = read_yaml(&output.join("data.yaml"));
    assert_eq!(yaml["nc"].as_u64(), Some(1));
    assert!(yaml["test"].as_str().is_some());
}
