//! Balance configuration.
//!
//! Every tunable in the core lives here, loadable from TOML so balance
//! passes never need a recompile. Defaults are the live values.

use demeter_core::Money;
use serde::Deserialize;

/// All balance tunables for the farming core.
///
/// Multipliers are basis points (10,000 bp = x1). See the field docs for
/// the formula each value feeds.
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds of work per hectare at efficiency 1.0:
    /// `duration = area_ha * base_seconds_per_ha / efficiency`.
    pub base_seconds_per_ha: u64,

    /// Wear added to the working tool when an operation completes
    /// (300 bp = 0.03 of full wear).
    pub wear_per_operation_bp: u32,

    /// Repair pricing: cost = `ceil(base_price * repair_rate * wear)`,
    /// with 1,000 bp = 10% of base price at full wear.
    pub repair_rate_bp: u32,

    /// Demand pricing: +100 bp (1%) per sold neighbor parcel.
    pub demand_bp_per_neighbor: u32,

    /// Demand multiplier ceiling (30,000 bp = x3).
    pub demand_cap_bp: u32,

    /// Radius for the sold-neighbor count, in metres.
    pub neighbor_radius_m: u32,

    /// Largest single market move, either direction (1,500 bp = 15%
    /// of base price).
    pub fluctuation_limit_bp: u32,

    /// Market price floor relative to base price (5,000 bp = 50%).
    pub market_floor_bp: u32,

    /// Market price ceiling relative to base price (15,000 bp = 150%).
    pub market_ceiling_bp: u32,

    /// Trend dead zone: a new price within +-this of the old one reads
    /// as stable (500 bp = 5%).
    pub trend_band_bp: u32,

    /// Harvest yield roll, lower bound (8,000 bp = x0.8).
    pub yield_min_bp: u32,

    /// Harvest yield roll, upper bound (12,000 bp = x1.2).
    pub yield_max_bp: u32,

    /// Balance a new player starts with.
    pub starting_money: Money,

    /// Premium currency a new player starts with.
    pub starting_diamonds: u32,

    /// Land ingestion: suggested base price per square metre.
    pub price_per_sqm: Money,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            base_seconds_per_ha: 30,
            wear_per_operation_bp: 300,
            repair_rate_bp: 1_000,
            demand_bp_per_neighbor: 100,
            demand_cap_bp: 30_000,
            neighbor_radius_m: 50_000,
            fluctuation_limit_bp: 1_500,
            market_floor_bp: 5_000,
            market_ceiling_bp: 15_000,
            trend_band_bp: 500,
            yield_min_bp: 8_000,
            yield_max_bp: 12_000,
            starting_money: Money::from_whole(200_000),
            starting_diamonds: 200,
            price_per_sqm: Money::from_parts(0, 50),
        }
    }
}

impl GameConfig {
    /// Parses a config from a TOML document; absent keys keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns the underlying parse error for malformed TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }
}
