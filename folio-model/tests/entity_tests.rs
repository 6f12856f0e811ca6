use folio_model::{Entity, UUID_FIELD};
use folio_types::{Identifier, Scheme};
use pretty_assertions::assert_eq;
use serde_json::json;

fn make_page(data: serde_json::Value) -> Entity {
    Entity::page("blog/hello", data)
}

// ── Construction & fields ────────────────────────────────────────

#[test]
fn constructors_set_kind_and_key() {
    assert_eq!(Entity::site(json!({})).kind, Scheme::Site);
    assert_eq!(Entity::site(json!({})).key, "");
    assert_eq!(make_page(json!({})).kind, Scheme::Page);
    assert_eq!(Entity::file("blog/cover.jpg", json!({})).kind, Scheme::File);
    assert_eq!(Entity::user("alice", json!({})).key, "alice");
}

#[test]
fn get_str_with_nested_path() {
    let e = make_page(json!({"meta": {"author": "Alice"}}));
    assert_eq!(e.get_str("/meta/author"), Some("Alice"));
    assert_eq!(e.get_str("/meta/missing"), None);
}

// ── uuid field ───────────────────────────────────────────────────

#[test]
fn uuid_reads_content_field() {
    let e = make_page(json!({"title": "Hello", "uuid": "abc"}));
    assert_eq!(e.uuid(), Some("abc"));
}

#[test]
fn uuid_missing_is_none() {
    assert_eq!(make_page(json!({"title": "Hello"})).uuid(), None);
}

#[test]
fn uuid_empty_string_is_none() {
    assert_eq!(make_page(json!({"uuid": ""})).uuid(), None);
}

#[test]
fn uuid_non_string_is_none() {
    assert_eq!(make_page(json!({"uuid": 42})).uuid(), None);
}

#[test]
fn set_uuid_keeps_other_fields() {
    let mut e = make_page(json!({"title": "Hello"}));
    e.set_uuid("xyz");
    assert_eq!(e.data, json!({"title": "Hello", "uuid": "xyz"}));
}

#[test]
fn set_uuid_overwrites_existing() {
    let e = make_page(json!({"uuid": "old"})).with_uuid("new");
    assert_eq!(e.uuid(), Some("new"));
}

#[test]
fn set_uuid_on_null_data_creates_object() {
    let e = make_page(json!(null)).with_uuid("xyz");
    assert_eq!(e.data[UUID_FIELD], "xyz");
}

// ── Stored identifier ────────────────────────────────────────────

#[test]
fn stored_identifier_site() {
    let e = Entity::site(json!({"uuid": "ignored"}));
    assert_eq!(e.stored_identifier(), Some(Identifier::site()));
}

#[test]
fn stored_identifier_user_uses_native_key() {
    let e = Entity::user("alice", json!({}));
    assert_eq!(
        e.stored_identifier().map(|id| id.to_string()),
        Some("user://alice".to_string())
    );
}

#[test]
fn stored_identifier_page_with_uuid() {
    let e = make_page(json!({"uuid": "abc"}));
    assert_eq!(e.stored_identifier(), Some(Identifier::new(Scheme::Page, "abc")));
}

#[test]
fn stored_identifier_file_without_uuid() {
    let e = Entity::file("blog/cover.jpg", json!({}));
    assert_eq!(e.stored_identifier(), None);
}

#[test]
fn filename_is_last_key_segment() {
    assert_eq!(Entity::file("blog/hello/cover.jpg", json!({})).filename(), "cover.jpg");
    assert_eq!(Entity::file("logo.svg", json!({})).filename(), "logo.svg");
}

// ── Serialization roundtrip ──────────────────────────────────────

#[test]
fn deserialize_from_known_json() {
    let json_str = r#"{
        "kind": "file",
        "key": "blog/cover.jpg",
        "data": {"uuid": "f-1", "alt": "cover"}
    }"#;
    let e: Entity = serde_json::from_str(json_str).unwrap();
    assert_eq!(e.kind, Scheme::File);
    assert_eq!(e.uuid(), Some("f-1"));
    assert_eq!(e.get_str("/alt"), Some("cover"));
}

#[test]
fn deserialize_without_data_defaults_to_null() {
    let e: Entity = serde_json::from_str(r#"{"kind": "user", "key": "bob"}"#).unwrap();
    assert_eq!(e.data, json!(null));
    assert_eq!(e.uuid(), None);
}

// ── Clone ────────────────────────────────────────────────────────

#[test]
fn entity_clone_is_independent() {
    let e = make_page(json!({"uuid": "original"}));
    let cloned = e.clone().with_uuid("modified");

    assert_eq!(e.uuid(), Some("original"));
    assert_eq!(cloned.uuid(), Some("modified"));
}
