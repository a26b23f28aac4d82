//! Integration tests for the SQLite food store.
//!
//! These tests load the sample seed into an in-memory database and check
//! the assembled documents end to end.

use foodcomp::lookup::fetch_food_document;
use foodcomp::store::{FoodSource, Seed, SqliteFoodStore, StoreError};
use serde_json::json;

const SAMPLE: &str = include_str!("../fixtures/sample_food.json");

async fn sample_store() -> SqliteFoodStore {
    let store = SqliteFoodStore::open_in_memory().unwrap();
    let seed = Seed::from_json(SAMPLE).unwrap();
    store.load_seed(&seed).await.unwrap();
    store
}

#[tokio::test]
async fn test_seed_summary() {
    let store = SqliteFoodStore::open_in_memory().unwrap();
    let seed = Seed::from_json(SAMPLE).unwrap();
    let summary = store.load_seed(&seed).await.unwrap();

    assert_eq!(summary.foods, 2);
    assert_eq!(summary.nutrients, 8);
    assert_eq!(summary.measurements, 7);
    assert_eq!(summary.references, 5);
    assert_eq!(summary.langual_codes, 5);
    assert_eq!(store.food_count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_full_document() {
    let store = sample_store().await;
    let doc = fetch_food_document(&store, "1").await.unwrap();

    assert_eq!(
        serde_json::to_value(&doc).unwrap(),
        json!({
            "id": 1,
            "code": "CL0001",
            "brand": "ABC",
            "group": { "code": "A", "name": "Cereals" },
            "type": { "code": "N", "name": "Natural" },
            "scientificName": "Oryza sativa",
            "commonName": { "en": "White rice", "es": "Arroz blanco" },
            "ingredients": { "es": "arroz" },
            "nutrientMeasurements": {
                "energy": [{
                    "name": "Energy",
                    "measurementUnit": "kcal",
                    "average": 360.0,
                    "standardized": true,
                    "dataType": "analytic",
                    "referenceCodes": [1, 2]
                }],
                "mainNutrients": [
                    {
                        "name": "Protein",
                        "measurementUnit": "g",
                        "average": 7.1,
                        "standardized": true,
                        "dataType": "analytic",
                        "referenceCodes": [1],
                        "components": []
                    },
                    {
                        "name": "Total lipid",
                        "measurementUnit": "g",
                        "average": 0.7,
                        "standardized": true,
                        "dataType": "analytic",
                        "components": [{
                            "name": "Saturated fatty acids",
                            "measurementUnit": "g",
                            "average": 0.2,
                            "standardized": false,
                            "dataType": "calculated",
                            "referenceCodes": [3]
                        }]
                    }
                ],
                "micronutrients": {
                    "vitamins": [{
                        "name": "Vitamin C",
                        "measurementUnit": "mg",
                        "average": 0.0,
                        "standardized": false,
                        "dataType": "borrowed",
                        "note": "Total ascorbic acid"
                    }],
                    "minerals": [{
                        "name": "Calcium",
                        "measurementUnit": "mg",
                        "average": 9.0,
                        "deviation": 1.2,
                        "min": 7.0,
                        "max": 11.0,
                        "sampleSize": 6,
                        "standardized": true,
                        "dataType": "analytic",
                        "referenceCodes": [2]
                    }]
                }
            },
            "langualCodes": [
                {
                    "code": "A0002",
                    "descriptor": "COOKING METHOD",
                    "children": [{ "code": "C3", "descriptor": "BOILED" }]
                },
                {
                    "code": "A0001",
                    "descriptor": "PRODUCT TYPE",
                    "children": [
                        { "code": "B1", "descriptor": "CEREAL GRAIN" },
                        { "code": "B2", "descriptor": "RICE" }
                    ]
                }
            ],
            "references": [
                {
                    "code": 1,
                    "title": "Composition of cereals",
                    "type": "report",
                    "authors": ["Smith, J.", "Doe, A."],
                    "year": 2019,
                    "cityName": "Santiago"
                },
                {
                    "code": 2,
                    "title": "Mineral content of grains",
                    "type": "article",
                    "authors": ["Perez, M."],
                    "year": 2021,
                    "pageStart": 10,
                    "pageEnd": 19,
                    "volume": 4,
                    "issue": 2,
                    "journalName": "Journal of Food Composition"
                },
                { "code": 3, "title": "Fatty acid profiles", "type": "thesis", "authors": [] },
                { "code": 4, "title": "Fiber methods", "type": "report", "authors": [] }
            ]
        })
    );
}

#[tokio::test]
async fn test_lookup_by_code() {
    let store = sample_store().await;
    let by_id = fetch_food_document(&store, "1").await.unwrap();
    let by_code = fetch_food_document(&store, "CL0001").await.unwrap();
    assert_eq!(by_id, by_code);
}

#[tokio::test]
async fn test_food_without_measurements() {
    let store = sample_store().await;
    let doc = fetch_food_document(&store, "CL0002").await.unwrap();

    assert!(doc.nutrient_measurements.energy.is_empty());
    assert!(doc.nutrient_measurements.main_nutrients.is_empty());
    assert!(doc.nutrient_measurements.micronutrients.vitamins.is_empty());
    assert!(doc.nutrient_measurements.micronutrients.minerals.is_empty());
    assert!(doc.langual_codes.is_empty());
    assert!(doc.references.is_empty());
    assert!(doc.ingredients.is_empty());
    assert_eq!(doc.common_name.get("es").map(String::as_str), Some("Manzana"));
}

#[tokio::test]
async fn test_unknown_food_is_not_found() {
    let store = sample_store().await;

    for id in ["99", "CL9999", "not a code", ""] {
        let err = fetch_food_document(&store, id).await.unwrap_err();
        assert!(err.is_not_found(), "expected not found for {id:?}, got {err}");
    }
}

#[tokio::test]
async fn test_measurement_rows_fold_references() {
    let store = sample_store().await;
    let rows = store.measurements(1).await.unwrap();

    assert_eq!(rows.len(), 7);
    assert_eq!(rows[0].name, "Energy");
    assert_eq!(rows[0].reference_codes, vec![1, 2]);
    assert_eq!(rows[1].macronutrient_id, Some(204));
    assert!(rows[3].reference_codes.is_empty());
    assert_eq!(rows[6].micronutrient_type.as_deref(), Some("mineral"));
}

#[tokio::test]
async fn test_reference_rows_keep_author_order() {
    let store = sample_store().await;
    let rows = store.references(&[5, 1]).await.unwrap();

    let codes: Vec<i64> = rows.iter().map(|r| r.code).collect();
    assert_eq!(codes, vec![1, 5]);
    assert_eq!(rows[0].authors, vec!["Smith, J.", "Doe, A."]);
    assert!(rows[1].authors.is_empty());
}

#[tokio::test]
async fn test_empty_reference_lookup() {
    let store = sample_store().await;
    let err = store.references(&[]).await.unwrap_err();
    assert!(matches!(err, StoreError::EmptyKeySet));
}

fn two_food_seed(first_code: &str) -> Seed {
    Seed::from_json(&format!(
        r#"{{
            "foodGroups": [{{ "code": "A", "name": "Cereals" }}],
            "foodTypes": [{{ "code": "N", "name": "Natural" }}],
            "foods": [
                {{ "id": 1, "code": "{first_code}", "groupCode": "A", "typeCode": "N" }},
                {{ "id": 2, "code": "X", "groupCode": "A", "typeCode": "N" }}
            ]
        }}"#
    ))
    .unwrap()
}

#[tokio::test]
async fn test_all_digit_food_code_is_rejected() {
    let store = SqliteFoodStore::open_in_memory().unwrap();
    let err = store.load_seed(&two_food_seed("0002")).await.unwrap_err();

    assert!(matches!(err, StoreError::InvalidSeed(_)));
    assert_eq!(store.food_count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_numeric_identifier_never_matches_a_code() {
    let store = SqliteFoodStore::open_in_memory().unwrap();
    store.load_seed(&two_food_seed("A0002")).await.unwrap();

    let by_padded_id = fetch_food_document(&store, "0002").await.unwrap();
    assert_eq!(by_padded_id.id, 2);
    assert_eq!(by_padded_id.code, "X");

    let by_code = fetch_food_document(&store, "A0002").await.unwrap();
    assert_eq!(by_code.id, 1);
}

#[tokio::test]
async fn test_repeated_author_keeps_order() {
    let store = SqliteFoodStore::open_in_memory().unwrap();
    let seed = Seed::from_json(
        r#"{
            "references": [{
                "code": 7,
                "title": "Joint survey",
                "type": "report",
                "authors": ["Smith, J.", "Doe, A.", "Smith, J."]
            }]
        }"#,
    )
    .unwrap();
    let summary = store.load_seed(&seed).await.unwrap();
    assert_eq!(summary.references, 1);

    let rows = store.references(&[7]).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].authors, vec!["Smith, J.", "Doe, A.", "Smith, J."]);
}

#[tokio::test]
async fn test_reopen_file_database() {
    let dir = std::env::temp_dir().join(format!("foodcomp-test-{}", std::process::id()));
    let path = dir.join("nested").join("foods.db");
    let _ = std::fs::remove_dir_all(&dir);

    {
        let store = SqliteFoodStore::open(&path).unwrap();
        let seed = Seed::from_json(SAMPLE).unwrap();
        store.load_seed(&seed).await.unwrap();
    }

    let store = SqliteFoodStore::open(&path).unwrap();
    assert_eq!(store.food_count().await.unwrap(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}
