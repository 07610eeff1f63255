//! The built-in standard dataset.
//!
//! A server boots with this catalog when no external TOML is supplied.
//! The numbers are the live balance set; anything experimental belongs in
//! an external file, not here.

use demeter_core::Money;

use crate::catalog::Catalog;
use crate::item::{CatalogItem, FieldTask, StatBlock};

/// Well-known item ids in the standard dataset.
pub mod items {
    use demeter_core::ItemId;

    /// Entry-level 75 hp tractor.
    pub const LIGHT_TRACTOR: ItemId = 1;
    /// Mid-range 150 hp tractor.
    pub const FIELD_TRACTOR: ItemId = 2;
    /// 370 hp flagship tractor.
    pub const HEAVY_TRACTOR: ItemId = 3;

    /// Basic plow implement.
    pub const DISC_PLOW: ItemId = 10;
    /// Wide heavy plow, needs a big tractor.
    pub const HEAVY_HARROW: ItemId = 11;
    /// Basic seeder implement.
    pub const PRECISION_SEEDER: ItemId = 12;
    /// High-capacity seeder for large areas.
    pub const BROADACRE_SEEDER: ItemId = 13;
    /// Brush-clearing implement for raw land.
    pub const BRUSH_CUTTER: ItemId = 14;

    /// Entry-level combine harvester.
    pub const COMBINE_S400: ItemId = 20;
    /// Heavy machine that clears raw land fast.
    pub const FORESTRY_EXCAVATOR: ItemId = 21;

    /// Soybean seed (fast cycle, good value).
    pub const SOYBEAN_SEED: ItemId = 30;
    /// Corn seed (high volume per hectare).
    pub const CORN_SEED: ItemId = 31;

    /// Harvested soybeans.
    pub const SOYBEANS: ItemId = 40;
    /// Harvested corn.
    pub const CORN: ItemId = 41;
}

impl Catalog {
    /// Builds the standard catalog.
    ///
    /// # Panics
    ///
    /// Panics if the dataset contains a duplicate id - a defect in this
    /// file, caught by the unit tests below.
    #[must_use]
    pub fn standard() -> Self {
        let mut catalog = Self::new();
        for item in standard_items() {
            catalog
                .register(item)
                .expect("standard dataset has unique ids");
        }
        catalog
    }
}

fn standard_items() -> Vec<CatalogItem> {
    vec![
        // --- Tractors ---
        CatalogItem {
            id: items::LIGHT_TRACTOR,
            name: "Light Tractor 75hp".to_string(),
            category: "small".to_string(),
            price: Money::from_whole(150_000),
            stats: StatBlock::Tractor {
                hp: 75,
                speed_bp: 10_000,
            },
        },
        CatalogItem {
            id: items::FIELD_TRACTOR,
            name: "Field Tractor 150hp".to_string(),
            category: "medium".to_string(),
            price: Money::from_whole(350_000),
            stats: StatBlock::Tractor {
                hp: 150,
                speed_bp: 15_000,
            },
        },
        CatalogItem {
            id: items::HEAVY_TRACTOR,
            name: "Heavy Tractor 370hp".to_string(),
            category: "large".to_string(),
            price: Money::from_whole(1_200_000),
            stats: StatBlock::Tractor {
                hp: 370,
                speed_bp: 25_000,
            },
        },
        // --- Implements ---
        CatalogItem {
            id: items::DISC_PLOW,
            name: "Disc Plow".to_string(),
            category: "plow".to_string(),
            price: Money::from_whole(45_000),
            stats: StatBlock::Implement {
                req_hp: 70,
                efficiency_bp: 10_000,
                task: FieldTask::Plowing,
            },
        },
        CatalogItem {
            id: items::HEAVY_HARROW,
            name: "Heavy Harrow Plow".to_string(),
            category: "plow".to_string(),
            price: Money::from_whole(120_000),
            stats: StatBlock::Implement {
                req_hp: 200,
                efficiency_bp: 25_000,
                task: FieldTask::Plowing,
            },
        },
        CatalogItem {
            id: items::PRECISION_SEEDER,
            name: "Precision Seeder".to_string(),
            category: "seeder".to_string(),
            price: Money::from_whole(85_000),
            stats: StatBlock::Implement {
                req_hp: 90,
                efficiency_bp: 15_000,
                task: FieldTask::Sowing,
            },
        },
        CatalogItem {
            id: items::BROADACRE_SEEDER,
            name: "Broadacre Seeder".to_string(),
            category: "seeder".to_string(),
            price: Money::from_whole(450_000),
            stats: StatBlock::Implement {
                req_hp: 300,
                efficiency_bp: 40_000,
                task: FieldTask::Sowing,
            },
        },
        CatalogItem {
            id: items::BRUSH_CUTTER,
            name: "Hydraulic Brush Cutter".to_string(),
            category: "cleaner".to_string(),
            price: Money::from_whole(25_000),
            stats: StatBlock::Implement {
                req_hp: 50,
                efficiency_bp: 8_000,
                task: FieldTask::Cleaning,
            },
        },
        // --- Heavy machinery ---
        CatalogItem {
            id: items::COMBINE_S400,
            name: "Combine S400".to_string(),
            category: "harvester".to_string(),
            price: Money::from_whole(900_000),
            stats: StatBlock::Heavy {
                efficiency_bp: 20_000,
                task: FieldTask::Harvesting,
            },
        },
        CatalogItem {
            id: items::FORESTRY_EXCAVATOR,
            name: "Forestry Excavator".to_string(),
            category: "deforester".to_string(),
            price: Money::from_whole(600_000),
            stats: StatBlock::Heavy {
                efficiency_bp: 15_000,
                task: FieldTask::Cleaning,
            },
        },
        // --- Seeds ---
        // growth_time_secs is demo-paced; a balance file can slow it down
        CatalogItem {
            id: items::SOYBEAN_SEED,
            name: "Soybean Seed".to_string(),
            category: "soybean".to_string(),
            price: Money::from_whole(5),
            stats: StatBlock::Seed {
                growth_time_secs: 120,
                yield_kg_ha: 3_500,
                seed_usage_kg_ha: 60,
                sell_price: Money::from_parts(3, 50),
            },
        },
        CatalogItem {
            id: items::CORN_SEED,
            name: "Corn Seed".to_string(),
            category: "corn".to_string(),
            price: Money::from_whole(3),
            stats: StatBlock::Seed {
                growth_time_secs: 180,
                yield_kg_ha: 9_000,
                seed_usage_kg_ha: 20,
                sell_price: Money::from_parts(1, 20),
            },
        },
        // --- Produce ---
        CatalogItem {
            id: items::SOYBEANS,
            name: "Soybeans".to_string(),
            category: "soybean".to_string(),
            price: Money::ZERO,
            stats: StatBlock::Produce {
                sell_price: Money::from_parts(3, 50),
            },
        },
        CatalogItem {
            id: items::CORN,
            name: "Corn".to_string(),
            category: "corn".to_string(),
            price: Money::ZERO,
            stats: StatBlock::Produce {
                sell_price: Money::from_parts(1, 20),
            },
        },
    ]
}
