//! The catalog registry.

use std::collections::BTreeMap;

use demeter_core::ItemId;
use serde::Deserialize;
use thiserror::Error;

use crate::item::{CatalogItem, ItemKind};

/// Errors that can occur while building a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Two entries claimed the same id.
    #[error("duplicate catalog item id: {0}")]
    DuplicateItem(ItemId),

    /// The TOML document did not parse into catalog entries.
    #[error("invalid catalog file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// On-disk shape of a catalog file: a flat list of `[[items]]` tables.
#[derive(Deserialize)]
struct CatalogFile {
    items: Vec<CatalogItem>,
}

/// The immutable item registry.
///
/// Built once at startup (from TOML or the standard dataset) and shared
/// read-only across every request handler afterwards.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    // BTreeMap so iteration order is stable for views and tests.
    items: BTreeMap<ItemId, CatalogItem>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an item.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItem`] if the id is already taken.
    pub fn register(&mut self, item: CatalogItem) -> Result<(), CatalogError> {
        if self.items.contains_key(&item.id) {
            return Err(CatalogError::DuplicateItem(item.id));
        }
        self.items.insert(item.id, item);
        Ok(())
    }

    /// Parses a catalog from a TOML document.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed TOML, or
    /// [`CatalogError::DuplicateItem`] for repeated ids.
    pub fn from_toml_str(source: &str) -> Result<Self, CatalogError> {
        let file: CatalogFile = toml::from_str(source)?;
        let mut catalog = Self::new();
        for item in file.items {
            catalog.register(item)?;
        }
        Ok(catalog)
    }

    /// Looks up an item by id.
    #[must_use]
    pub fn get(&self, id: ItemId) -> Option<&CatalogItem> {
        self.items.get(&id)
    }

    /// Iterates all items in id order.
    pub fn iter(&self) -> impl Iterator<Item = &CatalogItem> {
        self.items.values()
    }

    /// Finds the produce item for a crop category.
    ///
    /// Harvest uses this to turn a seed's category into the item credited
    /// to the silo.
    #[must_use]
    pub fn produce_for_category(&self, category: &str) -> Option<&CatalogItem> {
        self.items
            .values()
            .find(|item| item.kind() == ItemKind::Produce && item.category == category)
    }

    /// Number of registered items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if no items are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{FieldTask, StatBlock};
    use demeter_core::Money;

    fn plow(id: ItemId) -> CatalogItem {
        CatalogItem {
            id,
            name: "Disc Plow".to_string(),
            category: "plow".to_string(),
            price: Money::from_whole(45_000),
            stats: StatBlock::Implement {
                req_hp: 70,
                efficiency_bp: 10_000,
                task: FieldTask::Plowing,
            },
        }
    }

    #[test]
    fn test_register_and_get() {
        let mut catalog = Catalog::new();
        catalog.register(plow(10)).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get(10).unwrap().name, "Disc Plow");
        assert!(catalog.get(11).is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut catalog = Catalog::new();
        catalog.register(plow(10)).unwrap();
        assert!(matches!(
            catalog.register(plow(10)),
            Err(CatalogError::DuplicateItem(10))
        ));
    }

    #[test]
    fn test_from_toml() {
        let source = r#"
            [[items]]
            id = 1
            name = "Light Tractor 75hp"
            category = "small"
            price = 15000000
            stats = { kind = "tractor", hp = 75, speed_bp = 10000 }

            [[items]]
            id = 30
            name = "Soybean Seed"
            category = "soybean"
            price = 500
            stats = { kind = "seed", growth_time_secs = 120, yield_kg_ha = 3500, seed_usage_kg_ha = 60, sell_price = 350 }
        "#;
        let catalog = Catalog::from_toml_str(source).unwrap();
        assert_eq!(catalog.len(), 2);
        let tractor = catalog.get(1).unwrap();
        assert_eq!(tractor.price, Money::from_whole(150_000));
        let seed = catalog.get(30).unwrap();
        assert_eq!(seed.sell_price(), Some(Money::from_parts(3, 50)));
    }

    #[test]
    fn test_produce_lookup_by_category() {
        let mut catalog = Catalog::new();
        catalog
            .register(CatalogItem {
                id: 40,
                name: "Soybeans".to_string(),
                category: "soybean".to_string(),
                price: Money::ZERO,
                stats: StatBlock::Produce {
                    sell_price: Money::from_parts(3, 50),
                },
            })
            .unwrap();
        assert_eq!(catalog.produce_for_category("soybean").unwrap().id, 40);
        assert!(catalog.produce_for_category("corn").is_none());
    }
}
