//! Item catalog - name to id mapping loaded once at startup

use std::collections::HashMap;

use serde::Deserialize;

use crate::shared::errors::QuoteError;
use crate::shared::types::ItemId;

/// One row of the mapping endpoint. Extra fields (examine, limit, ...) are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct MappingEntry {
    pub id: ItemId,
    pub name: String,
}

/// Immutable name -> id table
#[derive(Debug, Clone, Default)]
pub struct ItemCatalog {
    items: HashMap<String, ItemId>,
}

impl ItemCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = MappingEntry>,
    {
        let items = entries
            .into_iter()
            .map(|entry| (entry.name, entry.id))
            .collect();
        Self { items }
    }

    /// Exact, case-sensitive lookup
    pub fn resolve(&self, name: &str) -> Result<ItemId, QuoteError> {
        self.items
            .get(name)
            .copied()
            .ok_or_else(|| QuoteError::ItemNotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::from_entries(vec![
            MappingEntry { id: ItemId(4151), name: "Abyssal whip".to_string() },
            MappingEntry { id: ItemId(11832), name: "Bandos chestplate".to_string() },
        ])
    }

    #[test]
    fn test_resolve_exact_name() {
        assert_eq!(catalog().resolve("Abyssal whip"), Ok(ItemId(4151)));
    }

    #[test]
    fn test_resolve_is_case_sensitive() {
        let result = catalog().resolve("abyssal whip");
        assert_eq!(result, Err(QuoteError::ItemNotFound("abyssal whip".to_string())));
    }

    #[test]
    fn test_absent_names_not_found() {
        let catalog = catalog();
        for name in ["", "Abyssal", "Abyssal whip ", "Dragon scimitar"] {
            assert!(matches!(catalog.resolve(name), Err(QuoteError::ItemNotFound(_))));
        }
        assert!(matches!(ItemCatalog::empty().resolve("Abyssal whip"), Err(QuoteError::ItemNotFound(_))));
    }

    #[test]
    fn test_mapping_payload_decodes() {
        let body = r#"[
            {"examine":"A weapon from the abyss.","id":4151,"members":true,"lowalch":48000,
             "limit":70,"value":120001,"highalch":72000,"icon":"Abyssal whip.png","name":"Abyssal whip"},
            {"id":2,"name":"Cannonball"}
        ]"#;
        let entries: Vec<MappingEntry> = serde_json::from_str(body).unwrap();
        let catalog = ItemCatalog::from_entries(entries);

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.resolve("Cannonball"), Ok(ItemId(2)));
    }
}
