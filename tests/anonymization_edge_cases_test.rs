//! Edge case tests for the anonymization engine

use healthgate::anonymization::{
    anonymize, anonymize_field, is_anonymized, AnonymizationEngine, PiiKind,
};
use serde_json::{json, Value};
use test_case::test_case;

const SALT: &str = "edge-salt";

fn engine() -> AnonymizationEngine {
    AnonymizationEngine::with_options(true, true, Some(SALT))
}

fn bundle(resources: Vec<Value>) -> Value {
    json!({
        "resourceType": "Bundle",
        "entry": resources.into_iter().map(|r| json!({"resource": r})).collect::<Vec<_>>()
    })
}

#[test]
fn test_empty_entry_list() {
    let input = json!({"resourceType": "Bundle", "entry": []});
    let result = engine().anonymize_with_report(&input).unwrap();

    assert_eq!(result.data, input);
    assert_eq!(result.report.total_entries, 0);
    assert_eq!(result.report.total_substitutions(), 0);
}

#[test]
fn test_null_entry_is_empty_bundle() {
    let input = json!({"resourceType": "Bundle", "entry": null});
    let result = engine().anonymize_with_report(&input).unwrap();
    assert_eq!(result.data, input);
    assert_eq!(result.entry_count(), 0);
}

#[test]
fn test_reference_to_patient_outside_bundle_is_unchanged() {
    let input = bundle(vec![json!({
        "resourceType": "Observation",
        "id": "obs-1",
        "subject": {"reference": "Patient/not-in-bundle"}
    })]);

    let result = engine().anonymize_with_report(&input).unwrap();
    let observation = &result.data["entry"][0]["resource"];

    assert_eq!(observation["subject"]["reference"], "Patient/not-in-bundle");
    assert_eq!(result.report.unresolved_references, 1);
    assert_eq!(result.report.references_rewritten, 0);
    assert!(!result.report.has_warnings());
}

#[test_case("Practitioner/pract-1"; "non patient target")]
#[test_case("patient123"; "no slash")]
#[test_case("https://fhir.example.org/Patient/patient123"; "absolute url")]
#[test_case("#contained-1"; "contained")]
fn test_unresolvable_reference_forms(reference: &str) {
    let input = bundle(vec![
        json!({"resourceType": "Patient", "id": "patient123"}),
        json!({"resourceType": "Encounter", "id": "enc-1", "subject": {"reference": reference}}),
    ]);

    let result = engine().anonymize_with_report(&input).unwrap();

    assert_eq!(
        result.data["entry"][1]["resource"]["subject"]["reference"],
        reference
    );
    assert_eq!(result.report.unresolved_references, 1);
}

#[test]
fn test_reference_without_reference_key() {
    let input = bundle(vec![json!({
        "resourceType": "Observation",
        "id": "obs-1",
        "subject": {"display": "Someone"}
    })]);

    let result = engine().anonymize_with_report(&input).unwrap();
    assert_eq!(
        result.data["entry"][0]["resource"]["subject"],
        json!({"display": "Someone"})
    );
    assert_eq!(result.report.unresolved_references, 0);
}

#[test]
fn test_patient_without_id() {
    let input = bundle(vec![json!({
        "resourceType": "Patient",
        "name": [{"family": "Smith"}]
    })]);

    let result = engine().anonymize_with_report(&input).unwrap();
    let patient = &result.data["entry"][0]["resource"];

    assert!(patient.get("id").is_none());
    assert!(patient["name"][0]["family"]
        .as_str()
        .unwrap()
        .starts_with("Person-"));
    assert!(is_anonymized(patient));
}

#[test]
fn test_null_fields_are_left_alone() {
    let input = bundle(vec![json!({
        "resourceType": "Patient",
        "id": "p1",
        "name": [{"family": null, "given": [null, "Jane"]}],
        "birthDate": null
    })]);

    let result = engine().anonymize_with_report(&input).unwrap();
    let patient = &result.data["entry"][0]["resource"];

    assert!(patient["name"][0]["family"].is_null());
    assert!(patient["name"][0]["given"][0].is_null());
    assert!(patient["name"][0]["given"][1]
        .as_str()
        .unwrap()
        .starts_with("Person-"));
    assert!(patient["birthDate"].is_null());
    assert!(!result.report.has_warnings());
}

#[test]
fn test_empty_and_unicode_strings() {
    let input = bundle(vec![json!({
        "resourceType": "Patient",
        "id": "p1",
        "name": [{"text": "", "family": "Müller-Øberg", "given": ["José"]}]
    })]);

    let anonymized = anonymize(&input, true, true, Some(SALT)).unwrap();
    let name = &anonymized["entry"][0]["resource"]["name"][0];

    assert_eq!(name["text"], anonymize_field("", PiiKind::Name, SALT));
    assert_eq!(
        name["family"],
        anonymize_field("Müller-Øberg", PiiKind::Name, SALT)
    );
    assert_eq!(name["given"][0], anonymize_field("José", PiiKind::Name, SALT));
}

#[test_case("1980-02-29"; "leap day")]
#[test_case("1980-01-01"; "first day of year")]
#[test_case("1980-12-31"; "last day of year")]
fn test_birth_date_shift_stays_in_year(original: &str) {
    let input = bundle(vec![json!({
        "resourceType": "Patient", "id": "p1", "birthDate": original
    })]);

    let anonymized = anonymize(&input, true, true, Some(SALT)).unwrap();
    let shifted = anonymized["entry"][0]["resource"]["birthDate"]
        .as_str()
        .unwrap()
        .to_string();

    assert!(shifted.starts_with("1980-"), "{original} -> {shifted}");
    assert!(chrono::NaiveDate::parse_from_str(&shifted, "%Y-%m-%d").is_ok());
}

#[test_case("unknown"; "free text")]
#[test_case("1980"; "year only")]
#[test_case("15/06/1980"; "day first")]
fn test_unparseable_birth_date_falls_back(original: &str) {
    let input = bundle(vec![json!({
        "resourceType": "Patient", "id": "p1", "birthDate": original
    })]);

    let anonymized = anonymize(&input, true, true, Some(SALT)).unwrap();
    let value = anonymized["entry"][0]["resource"]["birthDate"]
        .as_str()
        .unwrap();

    assert!(value.starts_with("Date-"));
    assert_eq!(value.len(), "Date-".len() + 8);
}

#[test]
fn test_reanonymizing_output_keeps_single_tag() {
    let input = bundle(vec![json!({"resourceType": "Patient", "id": "p1"})]);

    let once = anonymize(&input, true, true, Some(SALT)).unwrap();
    let twice = anonymize(&once, true, true, Some(SALT)).unwrap();

    let labels = twice["entry"][0]["resource"]["meta"]["security"]
        .as_array()
        .unwrap();
    assert_eq!(labels.len(), 1);
    assert_ne!(
        once["entry"][0]["resource"]["id"],
        twice["entry"][0]["resource"]["id"]
    );
}

#[test]
fn test_existing_security_labels_are_kept() {
    let input = bundle(vec![json!({
        "resourceType": "Observation",
        "id": "obs-1",
        "meta": {
            "versionId": "3",
            "security": [{"system": "http://terminology.hl7.org/CodeSystem/v3-Confidentiality", "code": "R"}]
        }
    })]);

    let anonymized = anonymize(&input, true, true, Some(SALT)).unwrap();
    let meta = &anonymized["entry"][0]["resource"]["meta"];

    assert_eq!(meta["versionId"], "3");
    assert_eq!(meta["security"].as_array().unwrap().len(), 2);
    assert_eq!(meta["security"][0]["code"], "R");
    assert_eq!(meta["security"][1]["code"], "anonymized");
}

#[test]
fn test_odd_entries_pass_through() {
    let input = json!({
        "resourceType": "Bundle",
        "entry": [
            "not an object",
            {"request": {"method": "GET", "url": "Patient/p1"}},
            {"resource": null},
            {"resource": {"id": "no-type"}},
            {"resource": {"resourceType": "Patient", "id": "p1"}}
        ]
    });

    let result = engine().anonymize_with_report(&input).unwrap();
    let patient_id = result.data["entry"][4]["resource"]["id"].as_str().unwrap();

    for index in [0, 2, 3] {
        assert_eq!(result.data["entry"][index], input["entry"][index]);
    }
    assert_eq!(result.data["entry"][1]["request"]["method"], "GET");
    assert_eq!(
        result.data["entry"][1]["request"]["url"],
        format!("Patient/{patient_id}")
    );
    assert_ne!(patient_id, "p1");
    assert_eq!(result.report.passed_through, 4);
    assert_eq!(result.report.entry_urls_rewritten, 1);
}

#[test]
fn test_many_patients_keep_their_own_references() {
    let mut resources = Vec::new();
    for i in 0..50 {
        resources.push(json!({
            "resourceType": "Observation",
            "id": format!("obs-{i}"),
            "subject": {"reference": format!("Patient/p{i}")}
        }));
    }
    for i in 0..50 {
        resources.push(json!({"resourceType": "Patient", "id": format!("p{i}")}));
    }

    let result = engine().anonymize_with_report(&bundle(resources)).unwrap();
    let entries = result.data["entry"].as_array().unwrap();

    for i in 0..50 {
        let patient_id = entries[50 + i]["resource"]["id"].as_str().unwrap();
        assert_eq!(
            entries[i]["resource"]["subject"]["reference"],
            format!("Patient/{patient_id}")
        );
    }
    assert_eq!(result.report.references_rewritten, 50);
}
