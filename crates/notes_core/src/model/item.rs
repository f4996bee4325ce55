//! Item document model.
//!
//! # Responsibility
//! - Represent items as an ordered map from attribute name to JSON value.
//! - Stamp server-owned attributes (`id`, `createdAt`) onto new items.
//!
//! # Invariants
//! - Caller-supplied values for protected attributes never survive `stamp_new_item`.
//! - Attribute order of the caller's object is preserved.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};

/// One document in the collection.
///
/// Values are a tagged union of string/number/boolean/null/array/object, so
/// arbitrary caller shapes are kept without a fixed schema.
pub type Item = Map<String, Value>;

/// Stable identifier of an item within its collection.
pub type ItemId = String;

/// Reserved identifier attribute.
pub const ID_ATTRIBUTE: &str = "id";
/// Creation timestamp attribute, ISO-8601 UTC.
pub const CREATED_AT_ATTRIBUTE: &str = "createdAt";
/// Attributes callers may never set or change.
pub const PROTECTED_ATTRIBUTES: &[&str] = &[ID_ATTRIBUTE, CREATED_AT_ATTRIBUTE];

/// Returns the identifier of an item when present as a string.
pub fn item_id(item: &Item) -> Option<&str> {
    item.get(ID_ATTRIBUTE).and_then(Value::as_str)
}

/// Overwrites the server-owned attributes of a freshly created item.
///
/// Any caller-supplied `id`/`createdAt` is replaced in place.
pub fn stamp_new_item(mut fields: Item, id: ItemId, created_at: DateTime<Utc>) -> Item {
    fields.insert(ID_ATTRIBUTE.to_string(), Value::String(id));
    fields.insert(
        CREATED_AT_ATTRIBUTE.to_string(),
        Value::String(format_timestamp(created_at)),
    );
    fields
}

/// Formats a timestamp as `YYYY-MM-DDTHH:MM:SS.mmmZ`.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, item_id, stamp_new_item, Item, CREATED_AT_ATTRIBUTE};
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    #[test]
    fn timestamp_uses_millisecond_zulu_format() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).single().unwrap();
        assert_eq!(format_timestamp(at), "2024-03-09T07:05:01.000Z");
    }

    #[test]
    fn stamp_overrides_caller_supplied_protected_fields() {
        let fields: Item = json!({"id": "mine", "text": "hi", "createdAt": "yesterday"})
            .as_object()
            .cloned()
            .unwrap();
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap();

        let item = stamp_new_item(fields, "server-id".to_string(), at);
        assert_eq!(item_id(&item), Some("server-id"));
        assert_eq!(item[CREATED_AT_ATTRIBUTE], "2024-01-01T00:00:00.000Z");
        assert_eq!(item["text"], "hi");
    }
}
