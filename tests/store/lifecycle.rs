//! Record lifecycle through the public `ContactStore` API.

use contact_store::{
    Contact, ContactStore, ContactUpdate, InMemoryContactStore, SaveOutcome, TEST_CONTACT_ID,
};

fn save_new(store: &InMemoryContactStore, contact: Contact) -> Contact {
    match store.save(contact).unwrap() {
        SaveOutcome::Created(contact) => contact,
        other => panic!("expected Created, got {:?}", other),
    }
}

#[test]
fn seeded_store_scenario() {
    let store = InMemoryContactStore::with_test_contact();

    let a = save_new(&store, Contact::new("A", "Alice", "alice@example.com"));
    assert_ne!(a.id, TEST_CONTACT_ID);
    assert_eq!(store.find(a.id).unwrap().unwrap().title, "A");

    assert!(store.delete(TEST_CONTACT_ID).unwrap());
    assert_eq!(store.find(TEST_CONTACT_ID).unwrap(), None);

    let update = ContactUpdate::from(Contact::new("Back", "Joe", "joe@example.com"));
    assert_eq!(store.update(TEST_CONTACT_ID, &update).unwrap(), None);
    assert_eq!(store.find(TEST_CONTACT_ID).unwrap(), None);
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn saved_records_round_trip_by_id() {
    let store = InMemoryContactStore::new();
    let explicit = save_new(&store, Contact::new("explicit", "", "").with_id(42));
    let allocated = save_new(&store, Contact::new("allocated", "", ""));

    assert_eq!(explicit.id, 42);
    assert_eq!(store.find(42).unwrap(), Some(explicit));
    assert_eq!(store.find(allocated.id).unwrap(), Some(allocated));
}

#[test]
fn delete_missing_is_false_not_an_error() {
    let store = InMemoryContactStore::new();
    assert!(!store.delete(99).unwrap());
}

#[test]
fn update_merges_present_fields_only() {
    let store = InMemoryContactStore::with_test_contact();

    let merged = store
        .update(TEST_CONTACT_ID, &ContactUpdate::new().name("Joe Tested"))
        .unwrap()
        .unwrap();

    assert_eq!(merged.id, TEST_CONTACT_ID);
    assert_eq!(merged.title, "Test contact");
    assert_eq!(merged.name, "Joe Tested");
    assert_eq!(merged.email, "none@testing.com");
    assert_eq!(store.find(TEST_CONTACT_ID).unwrap(), Some(merged));
}

#[test]
fn find_all_counts_successful_saves_minus_deletes() {
    let store = InMemoryContactStore::new();
    let mut ids = Vec::new();
    for i in 0..5 {
        ids.push(save_new(&store, Contact::new(format!("c{}", i), "", "")).id);
    }
    // Conflicting save does not add a record.
    let clash = store
        .save(Contact::new("clash", "", "").with_id(ids[0]))
        .unwrap();
    assert_eq!(clash, SaveOutcome::Conflict { id: ids[0] });
    assert!(!clash.is_success());
    assert_eq!(clash.contact(), None);

    // Re-saving identical content succeeds without adding a record.
    let same = store.find(ids[2]).unwrap().unwrap();
    let again = store.save(same.clone()).unwrap();
    assert!(again.is_success());
    assert_eq!(again.contact(), Some(&same));

    store.delete(ids[1]).unwrap();
    store.delete(ids[3]).unwrap();

    let all = store.find_all().unwrap();
    assert_eq!(all.len(), 3);
    let titles: Vec<&str> = all.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["c0", "c2", "c4"]);
}

#[test]
fn entity_tag_tracks_stored_content() {
    let store = InMemoryContactStore::with_test_contact();

    let first = store.find(TEST_CONTACT_ID).unwrap().unwrap().entity_tag();
    let again = store.find(TEST_CONTACT_ID).unwrap().unwrap().entity_tag();
    assert_eq!(first, again);

    store
        .update(TEST_CONTACT_ID, &ContactUpdate::new().email("joe@example.com"))
        .unwrap();
    let after = store.find(TEST_CONTACT_ID).unwrap().unwrap().entity_tag();
    assert_ne!(first, after);
}

#[test]
fn allocated_ids_are_never_reused() {
    let store = InMemoryContactStore::new();
    let first = save_new(&store, Contact::new("first", "", ""));
    store.delete(first.id).unwrap();

    let second = save_new(&store, Contact::new("second", "", ""));
    assert!(second.id > first.id);
}
