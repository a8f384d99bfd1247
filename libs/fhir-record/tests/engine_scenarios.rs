//! End-to-end scenarios over a single record

use rust_decimal::Decimal;
use vitalis_models::{Quantity, Value};
use vitalis_record::concept::{self, CodeDictionary};
use vitalis_record::urls::{BYPASS_EDIT_FLAG_URL, EDIT_FLAGS_SYSTEM};
use vitalis_record::{
    edit_flag, finding, registry, tabulated, DatePart, Fragment, SubjectRole,
};

mod test_support;

#[test]
fn test_birth_weight_with_edit_flag() {
    let mut record = test_support::record();
    let child = record.subject_reference(SubjectRole::Child);

    let id = registry::get_or_create(&mut record, &test_support::birth_weight(), Some(&child))
        .unwrap();
    assert_eq!(record.bundle().entry_count(), 1);
    assert_eq!(record.composition().reference_count(&id), 1);

    let grams = Value::Quantity(Quantity::ucum(Decimal::from(3200), "g"));
    record.resource_mut(&id).unwrap().set_value(grams.clone());
    assert_eq!(record.resource(&id).unwrap().value(), Some(&grams));

    let flag = CodeDictionary::from_triple("0", EDIT_FLAGS_SYSTEM, "Edit Passed");
    edit_flag::set_flag(&mut record, &id, &flag).unwrap();

    let resource = record.resource(&id).unwrap();
    let value = resource.value().and_then(Value::as_quantity).unwrap();
    assert_eq!(value.value, Some(Decimal::from(3200)));

    let read_back = edit_flag::get_flag(&record, &id).unwrap();
    assert_eq!(read_back.code(), "0");
    assert_eq!(read_back.display(), "Edit Passed");
}

#[test]
fn test_get_or_create_twice_adds_one_entry() {
    let mut record = test_support::record();
    let template = test_support::birth_weight();

    let first = registry::get_or_create(&mut record, &template, None).unwrap();
    let second = registry::get_or_create(&mut record, &template, None).unwrap();

    assert_eq!(first, second);
    assert_eq!(record.bundle().entry_count(), 1);
    assert_eq!(record.section_entries("newborn-information").len(), 1);
}

#[test]
fn test_flag_recorded_before_value() {
    let mut record = test_support::record();
    let id = registry::get_or_create(&mut record, &test_support::birth_weight(), None).unwrap();

    let flag = concept::set_helper(record.config(), "edit-flags", "1off").unwrap();
    edit_flag::set_flag(&mut record, &id, &flag).unwrap();
    record
        .resource_mut(&id)
        .unwrap()
        .set_value(Value::Quantity(Quantity::ucum(Decimal::from(2950), "g")));

    assert_eq!(edit_flag::get_flag(&record, &id).unwrap().display(), "Off");
    assert!(edit_flag::clear_flag(&mut record, &id).unwrap());
    assert!(record.resource(&id).unwrap().value().is_some());
    assert_eq!(edit_flag::get_flag(&record, &id).unwrap(), CodeDictionary::default());
}

#[test]
fn test_finding_toggle_closure() {
    let mut record = test_support::record();
    let eclampsia = test_support::eclampsia();

    finding::update_entry(&mut record, &eclampsia, false).unwrap();
    assert_eq!(record.bundle().entry_count(), 0);

    finding::update_entry(&mut record, &eclampsia, true).unwrap();
    assert!(finding::entry_exists(&record, &eclampsia));

    finding::update_entry(&mut record, &eclampsia, false).unwrap();
    assert!(!finding::entry_exists(&record, &eclampsia));
    assert_eq!(record.bundle().entry_count(), 0);
    assert!(record.section_entries("medical-information").is_empty());
}

#[test]
fn test_findings_are_kept_per_subject() {
    let mut record = test_support::record();
    let mother = test_support::eclampsia();
    let mut father = test_support::eclampsia();
    father.entry.subject = Some(SubjectRole::Father);

    finding::update_entry(&mut record, &mother, true).unwrap();
    finding::update_entry(&mut record, &father, true).unwrap();
    assert_eq!(record.bundle().entry_count(), 2);

    finding::update_entry(&mut record, &father, false).unwrap();
    assert!(finding::entry_exists(&record, &mother));
    assert!(!finding::entry_exists(&record, &father));
}

#[test]
fn test_outcome_qualified_findings_coexist() {
    let mut record = test_support::record();
    let successful = test_support::cephalic_version("385669000", "Successful");
    let failed = test_support::cephalic_version("385671000", "Unsuccessful");

    finding::update_entry(&mut record, &successful, true).unwrap();
    finding::update_entry(&mut record, &failed, true).unwrap();
    assert_eq!(record.section_entries("medical-information").len(), 2);

    finding::update_entry(&mut record, &failed, false).unwrap();
    assert!(finding::entry_exists(&record, &successful));
    assert!(!finding::entry_exists(&record, &failed));
}

#[test]
fn test_tabulated_components_omit_unset() {
    let mut record = test_support::record();
    let mother = record.subject_reference(SubjectRole::Mother);
    let id = registry::get_or_create(
        &mut record,
        &test_support::race("mother-information"),
        Some(&mother),
    )
    .unwrap();

    let catalogue = record.config().catalogue("race").unwrap().clone();
    let resource = record.resource_mut(&id).unwrap();
    tabulated::set_all(resource, &[("2106-3", "Y")], &catalogue).unwrap();

    assert_eq!(
        tabulated::get_all(record.resource(&id).unwrap(), &catalogue),
        vec![("2106-3".to_string(), "Y".to_string())]
    );
}

#[test]
fn test_unknown_year_differs_from_unset() {
    let mut record = test_support::record();
    let id =
        registry::get_or_create(&mut record, &test_support::date_of_last_menses(), None).unwrap();
    let codec = record.config().partial_date_codec();

    let resource = record.resource_mut(&id).unwrap();
    assert_eq!(codec.get_fragment(resource.value.as_ref(), DatePart::Year), Fragment::Unset);

    codec.set_fragment(&mut resource.value, DatePart::Year, Fragment::ExplicitlyUnknown);
    assert_eq!(
        codec.get_fragment(resource.value.as_ref(), DatePart::Year),
        Fragment::ExplicitlyUnknown
    );
    assert_eq!(
        codec
            .get_fragment(resource.value.as_ref(), DatePart::Year)
            .to_sentinel(),
        Some(-1)
    );
    assert_eq!(codec.get_fragment(None, DatePart::Year).to_sentinel(), None);
}

#[test]
fn test_partial_date_and_flag_share_value_element() {
    let mut record = test_support::record();
    let id =
        registry::get_or_create(&mut record, &test_support::date_of_last_menses(), None).unwrap();
    let codec = record.config().partial_date_codec();

    let flag = CodeDictionary::from_triple("0", EDIT_FLAGS_SYSTEM, "Edit Passed");
    edit_flag::set_flag(&mut record, &id, &flag).unwrap();

    let resource = record.resource_mut(&id).unwrap();
    for (part, value) in [(DatePart::Year, 2023), (DatePart::Month, 6), (DatePart::Day, 9)] {
        codec.set_fragment(&mut resource.value, part, Fragment::Known(value));
    }

    let resource = record.resource(&id).unwrap();
    assert_eq!(resource.value(), Some(&Value::Date("2023-06-09".to_string())));
    assert_eq!(edit_flag::read_flag(resource, BYPASS_EDIT_FLAG_URL), flag);
}

#[test]
fn test_removed_entry_leaves_no_references() {
    let mut record = test_support::record();
    let id = registry::get_or_create(&mut record, &test_support::birth_weight(), None).unwrap();

    assert!(registry::remove_entry(&mut record, &id));
    assert_eq!(record.composition().reference_count(&id), 0);
    assert!(record.entry(&id).is_none());
    assert!(!registry::remove_entry(&mut record, &id));
}

#[test]
fn test_document_serializes_with_section_references() {
    let mut record = test_support::record();
    record.ensure_person(SubjectRole::Child, None);
    let id = registry::get_or_create(&mut record, &test_support::birth_weight(), None).unwrap();

    let document = record.to_document().unwrap();
    assert_eq!(document["type"], "document");
    let entries = document["entry"].as_array().unwrap();
    assert_eq!(entries.len(), 3);

    let composition = &entries[0]["resource"];
    assert_eq!(composition["resourceType"], "Composition");
    assert_eq!(composition["section"][0]["entry"][0], id.as_str());
    assert_eq!(entries[2]["resource"]["id"], id.as_str());
}
