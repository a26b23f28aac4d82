//! Integration tests for document assembly.
//!
//! These tests drive `ResponseAssembler` with hand-built rows, without a
//! database.

use std::cell::RefCell;

use foodcomp::assemble::{AssembleError, AssemblyInput, FoodKey, ResponseAssembler};
use foodcomp::model::{FoodRow, LangualRow, MeasurementRow, ReferenceRow, TranslationRow};
use serde_json::json;

fn food() -> FoodRow {
    FoodRow {
        id: 7,
        code: "CL0007".to_string(),
        strain: None,
        brand: Some("ABC".to_string()),
        observation: Some(String::new()),
        group_code: "A".to_string(),
        group_name: "Cereals".to_string(),
        type_code: "N".to_string(),
        type_name: "Natural".to_string(),
        scientific_name: None,
        subspecies: None,
    }
}

fn measurement(id: i64, nutrient_id: i64, nutrient_type: &str) -> MeasurementRow {
    MeasurementRow {
        id,
        nutrient_id,
        name: format!("N{}", nutrient_id),
        nutrient_type: nutrient_type.to_string(),
        macronutrient_id: None,
        micronutrient_type: None,
        measurement_unit: "g".to_string(),
        average: 1.0,
        deviation: None,
        min: None,
        max: None,
        sample_size: None,
        standardized: false,
        data_type: "analytic".to_string(),
        note: None,
        reference_codes: vec![],
    }
}

fn component(id: i64, nutrient_id: i64, owner: i64) -> MeasurementRow {
    MeasurementRow {
        macronutrient_id: Some(owner),
        ..measurement(id, nutrient_id, "component")
    }
}

fn cited(row: MeasurementRow, codes: &[i64]) -> MeasurementRow {
    MeasurementRow {
        reference_codes: codes.to_vec(),
        ..row
    }
}

fn reference(code: i64) -> ReferenceRow {
    ReferenceRow {
        code,
        title: format!("R{}", code),
        reference_type: "report".to_string(),
        authors: vec!["Author".to_string()],
        other: None,
        year: None,
        city_name: None,
        page_start: None,
        page_end: None,
        volume: None,
        issue: None,
        volume_year: None,
        journal_name: None,
    }
}

fn input(measurements: Vec<MeasurementRow>) -> AssemblyInput {
    AssemblyInput {
        food: Some(food()),
        measurements,
        ..AssemblyInput::default()
    }
}

/// Assemble with a fetch stub that records its calls.
fn assemble_recording(
    input: AssemblyInput,
    calls: &RefCell<Vec<Vec<i64>>>,
) -> Result<foodcomp::model::FoodDocument, AssembleError> {
    ResponseAssembler::assemble(&FoodKey::Id(7), input, |codes| {
        calls.borrow_mut().push(codes.to_vec());
        Ok::<_, AssembleError>(codes.iter().map(|&c| reference(c)).collect())
    })
}

#[test]
fn test_components_grouped_under_their_macronutrient() {
    let calls = RefCell::new(vec![]);
    let doc = assemble_recording(
        input(vec![
            measurement(1, 203, "macronutrient"),
            measurement(2, 204, "macronutrient"),
            component(3, 606, 204),
            component(4, 291, 203),
            component(5, 607, 204),
        ]),
        &calls,
    )
    .unwrap();

    let main = &doc.nutrient_measurements.main_nutrients;
    assert_eq!(main.len(), 2);
    assert_eq!(main[0].measurement.name, "N203");
    assert_eq!(main[0].components.len(), 1);
    assert_eq!(main[0].components[0].name, "N291");
    assert_eq!(main[1].measurement.name, "N204");
    let names: Vec<&str> = main[1].components.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["N606", "N607"]);
}

#[test]
fn test_main_nutrient_order_is_first_occurrence() {
    let calls = RefCell::new(vec![]);
    let doc = assemble_recording(
        input(vec![
            measurement(1, 205, "macronutrient"),
            measurement(2, 203, "macronutrient"),
            measurement(3, 204, "macronutrient"),
        ]),
        &calls,
    )
    .unwrap();

    let ids: Vec<i64> = doc
        .nutrient_measurements
        .main_nutrients
        .iter()
        .map(|m| m.measurement.nutrient_id)
        .collect();
    assert_eq!(ids, vec![205, 203, 204]);
}

#[test]
fn test_langual_child_before_parent_makes_one_node() {
    let calls = RefCell::new(vec![]);
    let rows = vec![
        LangualRow {
            code: "B1".to_string(),
            descriptor: "D_B1".to_string(),
            parent_code: Some("A1".to_string()),
            parent_descriptor: Some("D_A1".to_string()),
        },
        LangualRow {
            code: "A1".to_string(),
            descriptor: "D_A1".to_string(),
            parent_code: None,
            parent_descriptor: None,
        },
    ];
    let doc = assemble_recording(
        AssemblyInput {
            langual_codes: rows,
            ..input(vec![])
        },
        &calls,
    )
    .unwrap();

    assert_eq!(
        serde_json::to_value(&doc.langual_codes).unwrap(),
        json!([{
            "code": "A1",
            "descriptor": "D_A1",
            "children": [{ "code": "B1", "descriptor": "D_B1" }]
        }])
    );
}

#[test]
fn test_reference_set_is_exact_union() {
    let calls = RefCell::new(vec![]);
    let doc = assemble_recording(
        input(vec![
            cited(measurement(1, 208, "energy"), &[4, 2]),
            cited(measurement(2, 203, "macronutrient"), &[2, 9]),
            cited(component(3, 291, 205), &[11]),
        ]),
        &calls,
    )
    .unwrap();

    // Reference 11 is cited by a dropped component and still counts
    assert_eq!(calls.borrow().as_slice(), &[vec![2, 4, 9, 11]]);
    let codes: Vec<i64> = doc.references.iter().map(|r| r.code).collect();
    assert_eq!(codes, vec![2, 4, 9, 11]);
}

#[test]
fn test_optional_fields_are_omitted() {
    let calls = RefCell::new(vec![]);
    let doc = assemble_recording(input(vec![]), &calls).unwrap();
    let value = serde_json::to_value(&doc).unwrap();

    assert_eq!(value["brand"], json!("ABC"));
    assert!(value.get("strain").is_none());
    assert!(value.get("observation").is_none());
    assert!(value.get("scientificName").is_none());
}

#[test]
fn test_zero_average_is_kept() {
    let calls = RefCell::new(vec![]);
    let mut row = measurement(1, 208, "energy");
    row.average = 0.0;
    let doc = assemble_recording(input(vec![row]), &calls).unwrap();
    let value = serde_json::to_value(&doc.nutrient_measurements.energy[0]).unwrap();

    assert_eq!(value["average"], json!(0.0));
    assert!(value.get("referenceCodes").is_none());
}

#[test]
fn test_empty_batch_skips_reference_fetch() {
    let calls = RefCell::new(vec![]);
    let doc = assemble_recording(input(vec![]), &calls).unwrap();

    assert!(calls.borrow().is_empty());
    assert_eq!(
        serde_json::to_value(&doc.nutrient_measurements).unwrap(),
        json!({
            "energy": [],
            "mainNutrients": [],
            "micronutrients": { "vitamins": [], "minerals": [] }
        })
    );
    assert!(doc.references.is_empty());
}

#[test]
fn test_missing_food_is_not_found() {
    let calls = RefCell::new(vec![]);
    let err = assemble_recording(AssemblyInput::default(), &calls).unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Food not found: 7");
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_unknown_micronutrient_type_is_invalid_input() {
    let calls = RefCell::new(vec![]);
    let mut row = measurement(12, 999, "micronutrient");
    row.micronutrient_type = Some("trace".to_string());
    let err = assemble_recording(input(vec![row]), &calls).unwrap_err();

    assert!(matches!(
        err,
        AssembleError::InvalidInput {
            measurement_id: 12,
            ..
        }
    ));
    assert!(calls.borrow().is_empty());
}

#[test]
fn test_translations_reduce_into_language_maps() {
    let calls = RefCell::new(vec![]);
    let translations = vec![
        TranslationRow {
            language_code: "es".to_string(),
            common_name: Some("Arroz".to_string()),
            ingredients: Some(" ".to_string()),
        },
        TranslationRow {
            language_code: "en".to_string(),
            common_name: Some("Rice".to_string()),
            ingredients: Some("rice, water".to_string()),
        },
    ];
    let doc = assemble_recording(
        AssemblyInput {
            translations,
            ..input(vec![])
        },
        &calls,
    )
    .unwrap();

    let value = serde_json::to_value(&doc).unwrap();
    assert_eq!(value["commonName"], json!({ "en": "Rice", "es": "Arroz" }));
    assert_eq!(value["ingredients"], json!({ "en": "rice, water" }));
}

#[test]
fn test_food_key_parse() {
    assert_eq!(FoodKey::parse("42").unwrap(), FoodKey::Id(42));
    assert_eq!(
        FoodKey::parse("CL0001").unwrap(),
        FoodKey::Code("CL0001".to_string())
    );
    assert!(FoodKey::parse("0").unwrap_err().is_not_found());
    assert!(FoodKey::parse("a b").unwrap_err().is_not_found());
}
