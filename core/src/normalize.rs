//! Shape normalization for contacts responses and records.
//!
//! # Design
//! Backends disagree on both the envelope (`[...]`, `{items}`, `{data}`,
//! `{results}`) and the record keys (`name` vs `full_name` vs `fullName`).
//! Both are resolved by ordered key lists: the first key holding a non-null
//! value wins. The record side is written against `FieldSource` so the alias
//! table does not depend on how the record was decoded.

use std::collections::HashMap;
use std::hash::BuildHasher;

use serde_json::{Map, Value};

use crate::query::ContactsQuery;
use crate::types::{Contact, ContactField, PageResult};

/// Accepted source keys per canonical field, in priority order.
pub const CONTACT_ALIASES: [(ContactField, &[&str]); 5] = [
    (ContactField::Id, &["id", "contact_id", "uuid", "_id"]),
    (ContactField::Name, &["name", "full_name", "fullName"]),
    (ContactField::Email, &["email"]),
    (ContactField::Phone, &["phone", "phone_number", "phoneNumber"]),
    (ContactField::Address, &["address", "location"]),
];

const ITEM_KEYS: [&str; 3] = ["items", "data", "results"];
const TOTAL_KEYS: [&str; 2] = ["total", "count"];
const PAGE_SIZE_KEYS: [&str; 2] = ["page_size", "pageSize"];

/// Anything a contact record can be read from.
pub trait FieldSource {
    /// Text stored under `key`; `None` when the key is absent or null.
    fn field_text(&self, key: &str) -> Option<String>;
}

impl FieldSource for Map<String, Value> {
    fn field_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(value_text)
    }
}

impl FieldSource for Value {
    fn field_text(&self, key: &str) -> Option<String> {
        match self {
            Value::Object(map) => map.field_text(key),
            _ => None,
        }
    }
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn field_text(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Map an arbitrary contact-shaped record onto the canonical `Contact`.
pub fn normalize_contact<S: FieldSource + ?Sized>(raw: &S) -> Contact {
    let mut contact = Contact::default();
    for (field, keys) in CONTACT_ALIASES {
        if let Some(text) = keys.iter().find_map(|key| raw.field_text(key)) {
            *contact.slot_mut(field) = text;
        }
    }
    contact
}

pub fn normalize_contacts(items: &[Value]) -> Vec<Contact> {
    items.iter().map(|item| normalize_contact(item)).collect()
}

/// Classify a decoded JSON payload and fold it into a `PageResult`.
///
/// Paging fields missing from the payload come from `request`.
pub fn normalize_page(
    payload: Value,
    request: &ContactsQuery,
    default_page_size: u32,
) -> PageResult {
    let requested_size = request.effective_page_size(default_page_size);
    let requested_page = request.page.filter(|&p| p > 0).unwrap_or(1);

    match payload {
        Value::Array(items) => PageResult {
            total: items.len() as u64,
            items,
            page: requested_page,
            page_size: requested_size,
        },
        Value::Object(mut map) => {
            let items = match ITEM_KEYS
                .iter()
                .find_map(|key| map.remove(*key).filter(|v| !v.is_null()))
            {
                Some(Value::Array(items)) => items,
                _ => Vec::new(),
            };
            let total = TOTAL_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(as_count))
                .unwrap_or(items.len() as u64);
            let page = map
                .get("page")
                .and_then(as_positive_u32)
                .unwrap_or(requested_page);
            let page_size = PAGE_SIZE_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(as_positive_u32))
                .unwrap_or(requested_size);
            PageResult {
                items,
                total,
                page,
                page_size,
            }
        }
        _ => PageResult {
            items: Vec::new(),
            total: 0,
            page: requested_page,
            page_size: requested_size,
        },
    }
}

fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        composite => Some(composite.to_string()),
    }
}

/// Non-negative integer from a JSON number or numeric string.
fn as_count(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().and_then(float_count)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<u64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(float_count))
        }
        _ => None,
    }
}

fn float_count(f: f64) -> Option<u64> {
    (f.is_finite() && f >= 0.0).then(|| f.trunc() as u64)
}

fn as_positive_u32(value: &Value) -> Option<u32> {
    as_count(value)
        .filter(|&n| n > 0)
        .and_then(|n| u32::try_from(n).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(page: u32, size: u32) -> ContactsQuery {
        ContactsQuery::default().page(page, size)
    }

    #[test]
    fn aliases_resolve_first_non_null() {
        let raw = json!({"full_name": "Ann", "_id": "x1"});
        assert_eq!(
            normalize_contact(&raw),
            Contact {
                id: "x1".to_string(),
                name: "Ann".to_string(),
                ..Contact::default()
            }
        );
    }

    #[test]
    fn null_is_skipped_but_empty_string_wins() {
        let raw = json!({"name": null, "fullName": "Bo", "phone": "", "phoneNumber": "555"});
        let contact = normalize_contact(&raw);
        assert_eq!(contact.name, "Bo");
        assert_eq!(contact.phone, "");
    }

    #[test]
    fn scalar_and_composite_values_become_text() {
        let raw = json!({"contact_id": 42, "location": {"city": "Oslo"}, "email": true});
        let contact = normalize_contact(&raw);
        assert_eq!(contact.id, "42");
        assert_eq!(contact.address, r#"{"city":"Oslo"}"#);
        assert_eq!(contact.email, "true");
    }

    #[test]
    fn non_object_records_normalize_to_empty() {
        assert_eq!(normalize_contact(&json!("Ann")), Contact::default());
        assert_eq!(normalize_contact(&json!(null)), Contact::default());
    }

    #[test]
    fn string_maps_are_a_field_source() {
        let raw: HashMap<String, String> = [("uuid", "u-7"), ("phone_number", "555-0100")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        let contact = normalize_contact(&raw);
        assert_eq!(contact.id, "u-7");
        assert_eq!(contact.phone, "555-0100");
    }

    #[test]
    fn bare_array_uses_length_and_request_paging() {
        let payload = json!([{}, {}, {}, {}, {}]);
        let page = normalize_page(payload, &request(2, 5), 20);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.page_size, 5);
    }

    #[test]
    fn bare_array_without_requested_page_defaults_to_one() {
        let page = normalize_page(json!([]), &ContactsQuery::default(), 20);
        assert_eq!((page.total, page.page, page.page_size), (0, 1, 20));
    }

    #[test]
    fn results_with_count_reports_server_total() {
        let items: Vec<Value> = (0..12).map(|i| json!({"id": i})).collect();
        let payload = json!({"results": items, "count": 37});
        let page = normalize_page(payload, &request(1, 12), 20);
        assert_eq!(page.items.len(), 12);
        assert_eq!(page.total, 37);
    }

    #[test]
    fn envelope_paging_overrides_request() {
        let payload = json!({"items": [{}], "total": 41, "page": 3, "pageSize": 10});
        let page = normalize_page(payload, &request(1, 20), 20);
        assert_eq!((page.total, page.page, page.page_size), (41, 3, 10));

        let snake = json!({"items": [], "page_size": "15", "pageSize": 10});
        assert_eq!(normalize_page(snake, &request(1, 20), 20).page_size, 15);
    }

    #[test]
    fn item_keys_are_tried_in_order() {
        let payload = json!({"items": null, "data": [{"id": 1}], "results": [{}, {}]});
        let page = normalize_page(payload, &request(1, 20), 20);
        assert_eq!(page.items, vec![json!({"id": 1})]);
        assert_eq!(page.total, 1);
    }

    #[test]
    fn non_array_items_become_empty() {
        let payload = json!({"items": "nope", "data": [{}]});
        let page = normalize_page(payload, &request(1, 20), 20);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 0);
    }

    #[test]
    fn unusable_numbers_fall_back() {
        let payload = json!({"data": [{}, {}], "total": -4, "count": "x", "page": 0});
        let page = normalize_page(payload, &request(2, 20), 20);
        assert_eq!(page.total, 2);
        assert_eq!(page.page, 2);

        let fractional = json!({"data": [], "total": 9.7});
        assert_eq!(normalize_page(fractional, &request(1, 20), 20).total, 9);
    }

    #[test]
    fn scalar_payload_is_an_empty_page() {
        let page = normalize_page(json!("ok"), &request(4, 10), 20);
        assert!(page.items.is_empty());
        assert_eq!((page.total, page.page, page.page_size), (0, 4, 10));
    }
}
