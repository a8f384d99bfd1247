use serde_json::json;
use vitalis_models::common::{
    Bundle, BundleType, Composition, EntryId, ResourceKind, Value, ValueSet,
};

#[test]
fn parse_document_bundle_with_observation_value() {
    let bundle: Bundle = serde_json::from_value(json!({
        "resourceType": "Bundle",
        "type": "document",
        "entry": [{
            "fullUrl": "urn:uuid:obs-1",
            "resource": {
                "resourceType": "Observation",
                "id": "obs-1",
                "meta": { "profile": ["http://example.org/StructureDefinition/birth-weight"] },
                "code": { "coding": [{ "system": "http://loinc.org", "code": "8339-4" }] },
                "subject": { "reference": "Patient/child" },
                "value": {
                    "valueQuantity": { "value": "3200", "unit": "g" },
                    "extension": [{
                        "url": "http://example.org/StructureDefinition/BypassEditFlag",
                        "valueCodeableConcept": { "coding": [{ "code": "0" }] }
                    }]
                },
                "text": { "status": "generated" }
            }
        }]
    }))
    .expect("bundle should deserialize");

    let entry = bundle.get(&EntryId::from("obs-1")).expect("entry present");
    let resource = &entry.resource;
    assert_eq!(resource.kind(), ResourceKind::Observation);
    assert!(resource.has_code("8339-4"));
    assert_eq!(resource.subject_reference(), Some("Patient/child"));
    assert!(matches!(resource.value(), Some(Value::Quantity(_))));
    assert_eq!(resource.value.as_ref().unwrap().extension.len(), 1);
    assert!(resource.additional.contains_key("text"));
}

#[test]
fn serialize_composition_sections_as_handles() {
    let mut composition = Composition::new("comp-1");
    composition
        .section_or_insert_with("newborn-information", || {
            vitalis_models::Section::new("newborn-information")
        })
        .entry
        .push(EntryId::from("obs-1"));

    let json = serde_json::to_value(&composition).unwrap();
    assert_eq!(json["resourceType"], "Composition");
    assert_eq!(json["section"][0]["entry"][0], "obs-1");
}

#[test]
fn parse_expanded_value_set() {
    let vs: ValueSet = serde_json::from_value(json!({
        "resourceType": "ValueSet",
        "url": "http://example.org/ValueSet/edit-flags",
        "status": "active",
        "expansion": {
            "contains": [
                { "system": "http://example.org/CodeSystem/edit-flags", "code": "0", "display": "Edit Passed" },
                { "system": "http://example.org/CodeSystem/edit-flags", "code": "1", "display": "Edit Failed, Data Queried, and Verified" }
            ]
        }
    }))
    .expect("value set should deserialize");

    assert_eq!(vs.concepts().len(), 2);
    assert_eq!(
        vs.lookup("0").and_then(|c| c.display.as_deref()),
        Some("Edit Passed")
    );
}

#[test]
fn round_trip_bundle_through_json_value() {
    let bundle = Bundle::new(BundleType::Document);
    let value = bundle.to_value().unwrap();
    let parsed = Bundle::from_value(&value).unwrap();
    assert_eq!(parsed, bundle);
}
