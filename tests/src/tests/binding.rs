use barrace::binding::{self, BindingError};
use barrace::Limit;
use barrace::meta::ShapeError;

use crate::{assert_race_eq_ref, data_file_str};

#[test]
fn binding_default() {
    let binding = binding::parse_data_binding(&data_file_str("binding.json")).unwrap();
    let race = binding.race().unwrap();
    assert_race_eq_ref!(&race, Limit::default(), "binding-default");
}

#[test]
fn binding_labels() {
    let binding = binding::parse_data_binding(&data_file_str("binding.json")).unwrap();
    let names: Vec<&str> = binding
        .metadata
        .dimensions
        .iter()
        .chain(&binding.metadata.measures)
        .map(|d| d.display_name())
        .collect();
    assert_eq!(names, vec!["Month", "Team", "Points"]);
}

#[test]
fn binding_without_measure() {
    let json = r#"{
        "metadata": {
            "dimensions": { "dimensions_0": { "id": "Month" }, "dimensions_1": { "id": "Team" } },
            "mainStructureMembers": {}
        },
        "data": [
            { "dimensions_0": { "label": "JAN 2024" }, "dimensions_1": { "label": "Lions" } }
        ]
    }"#;
    let err = binding::race_from_json(json).unwrap_err();
    assert!(matches!(
        err,
        BindingError::Shape(ShapeError::MissingMeasure)
    ));
}
