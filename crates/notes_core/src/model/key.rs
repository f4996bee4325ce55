//! Item key generation.

use crate::model::item::ItemId;
use uuid::Uuid;

/// Generates a new random item identifier.
///
/// UUID v4 in lowercase hyphenated form. Stateless; no counter is shared
/// between calls.
pub fn generate_item_id() -> ItemId {
    Uuid::new_v4().to_string()
}

#[cfg(test)]
mod tests {
    use super::generate_item_id;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn consecutive_ids_differ() {
        assert_ne!(generate_item_id(), generate_item_id());
    }

    #[test]
    fn ids_are_canonical_uuid_text() {
        let id = generate_item_id();
        let parsed = Uuid::parse_str(&id).expect("generated id should parse as uuid");
        assert_eq!(parsed.hyphenated().to_string(), id);
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn batch_of_ids_has_no_duplicates() {
        let ids: HashSet<String> = (0..1_000).map(|_| generate_item_id()).collect();
        assert_eq!(ids.len(), 1_000);
    }
}
