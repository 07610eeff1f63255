//! Item definitions and typed stat blocks.

use demeter_core::{ItemId, Money};
use serde::{Deserialize, Serialize};

/// The field task a piece of equipment performs.
///
/// Capability checks in the operation state machine match on this tag;
/// an implement tagged `Plowing` can never be used to sow.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldTask {
    /// Clearing raw land of brush and debris.
    Cleaning,
    /// Turning cleared (or raw) soil.
    Plowing,
    /// Planting seed into plowed soil.
    Sowing,
    /// Taking a mature crop off the field.
    Harvesting,
}

/// Coarse item classification, derived from the stat block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ItemKind {
    /// Self-propelled power unit; does nothing alone.
    Tractor,
    /// Attachable tool that needs a tractor.
    Implement,
    /// Self-contained machine (harvester, excavator).
    Heavy,
    /// Plantable seed, tracked by the kilogram.
    Seed,
    /// Harvested crop, tracked by the kilogram.
    Produce,
}

/// Type-specific stats for a catalog item.
///
/// Work speeds (`efficiency_bp`, `speed_bp`) are basis points of the base
/// unit: 10,000 bp = 1.0 ha/h of field efficiency, or a x1.0 tractor speed
/// multiplier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StatBlock {
    /// A tractor: supplies power and a speed multiplier to its implement.
    Tractor {
        /// Engine power; implements refuse tractors below their `req_hp`.
        hp: u32,
        /// Speed multiplier applied to the attached implement's efficiency.
        speed_bp: u32,
    },
    /// An implement: does the actual field work while mounted.
    Implement {
        /// Minimum tractor power required to mount this implement.
        req_hp: u32,
        /// Base work rate in bp of ha/h.
        efficiency_bp: u32,
        /// The one task this implement performs.
        task: FieldTask,
    },
    /// A heavy machine: self-contained, no attachment involved.
    Heavy {
        /// Work rate in bp of ha/h.
        efficiency_bp: u32,
        /// The one task this machine performs.
        task: FieldTask,
    },
    /// A seed variety.
    Seed {
        /// Seconds from sowing completion to maturity.
        growth_time_secs: u64,
        /// Harvested kilograms per hectare, before the yield roll.
        yield_kg_ha: u64,
        /// Kilograms of seed consumed per hectare sown.
        seed_usage_kg_ha: u64,
        /// Reference market value per kilogram.
        sell_price: Money,
    },
    /// A harvested crop.
    Produce {
        /// Reference market value per kilogram.
        sell_price: Money,
    },
}

impl StatBlock {
    /// The item kind this stat block belongs to.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        match self {
            Self::Tractor { .. } => ItemKind::Tractor,
            Self::Implement { .. } => ItemKind::Implement,
            Self::Heavy { .. } => ItemKind::Heavy,
            Self::Seed { .. } => ItemKind::Seed,
            Self::Produce { .. } => ItemKind::Produce,
        }
    }
}

/// One immutable catalog entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique identifier.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Grouping key: shop section for machinery, crop variety for
    /// seeds/produce (a seed and its produce share a category).
    pub category: String,
    /// Shop price. Zero for items that are never sold in the shop
    /// (produce is only ever harvested).
    pub price: Money,
    /// Type-specific stats.
    pub stats: StatBlock,
}

impl CatalogItem {
    /// The item's kind, read off its stat block.
    #[must_use]
    pub const fn kind(&self) -> ItemKind {
        self.stats.kind()
    }

    /// True for machinery that exists as unique instances (quantity 1,
    /// stable instance id) rather than fungible stacks.
    #[must_use]
    pub const fn is_machinery(&self) -> bool {
        matches!(
            self.kind(),
            ItemKind::Tractor | ItemKind::Implement | ItemKind::Heavy
        )
    }

    /// The market reference price per kilogram, if this item trades on
    /// the produce market.
    #[must_use]
    pub const fn sell_price(&self) -> Option<Money> {
        match self.stats {
            StatBlock::Seed { sell_price, .. } | StatBlock::Produce { sell_price } => {
                Some(sell_price)
            }
            _ => None,
        }
    }
}
