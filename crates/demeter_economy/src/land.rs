//! # The Land Registry's Records
//!
//! Parcel data: ownership, farming condition, and the active operation
//! window. Parcels are produced by an external land-generation pipeline
//! and enter the core through [`crate::granary::TheGranary::register_parcel`];
//! they are never deleted.

use std::fmt;

use demeter_core::{InventoryId, ItemId, LandId, Money, Timestamp, UserId};

use crate::config::GameConfig;

/// Farming readiness of a parcel.
///
/// Transitions are monotonic along clean -> plow -> sow -> grow -> mature,
/// except harvest, which resets a mature parcel to `Cleared`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Condition {
    /// Untouched scrub; must be cleaned (or plowed directly).
    Raw,
    /// Cleared of brush, ready for plowing.
    Cleared,
    /// Plowed and ready to sow.
    Plowed,
    /// Sown; the crop is on its growth countdown.
    Growing,
    /// Ready to harvest.
    Mature,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Cleared => write!(f, "cleared"),
            Self::Plowed => write!(f, "plowed"),
            Self::Growing => write!(f, "growing"),
            Self::Mature => write!(f, "mature"),
        }
    }
}

/// Whether a parcel can still be bought.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LandStatus {
    /// On the market at its dynamic price.
    Available,
    /// Sold; `owner` is set.
    Owned,
}

/// The timed phase a parcel is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperationKind {
    /// Clearing raw land.
    Clean,
    /// Plowing.
    Plow,
    /// Sowing seed.
    Sow,
    /// The crop's growth countdown (armed when sowing completes).
    Grow,
    /// Harvesting the mature crop.
    Harvest,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Plow => write!(f, "plow"),
            Self::Sow => write!(f, "sow"),
            Self::Grow => write!(f, "grow"),
            Self::Harvest => write!(f, "harvest"),
        }
    }
}

/// An active operation window on a parcel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OperationWindow {
    /// What is happening on the field.
    pub kind: OperationKind,
    /// When it started.
    pub start: Timestamp,
    /// When it completes (server authoritative).
    pub end: Timestamp,
    /// The inventory row that takes the wear when the operation
    /// completes. `None` for the growth phase - nothing is working.
    pub tool: Option<InventoryId>,
}

/// One ownable parcel of farmland.
#[derive(Clone, Debug)]
pub struct Land {
    /// Stable parcel id.
    pub id: LandId,
    /// Current owner, if sold.
    pub owner: Option<UserId>,
    /// Surface area in square metres.
    pub area_sqm: u64,
    /// Farming readiness.
    pub condition: Condition,
    /// Base price while available; price paid once sold.
    pub price: Money,
    /// Market status. `Owned` if and only if `owner` is set.
    pub status: LandStatus,
    /// The running operation, if any.
    pub operation: Option<OperationWindow>,
    /// The seed variety growing (or ready to harvest) on the parcel.
    pub current_crop: Option<ItemId>,
    /// Opaque geometry handle from the land-generation pipeline.
    pub geometry: String,
}

impl Land {
    /// Creates an unowned parcel as inserted by the land generator.
    #[must_use]
    pub fn new(
        id: LandId,
        area_sqm: u64,
        condition: Condition,
        price: Money,
        geometry: String,
    ) -> Self {
        Self {
            id,
            owner: None,
            area_sqm,
            condition,
            price,
            status: LandStatus::Available,
            operation: None,
            current_crop: None,
            geometry,
        }
    }

    /// The operation window still in effect at `now`, if any.
    ///
    /// A window whose end has passed no longer blocks new work; it is
    /// waiting to be finished, not running.
    #[must_use]
    pub fn active_operation(&self, now: Timestamp) -> Option<&OperationWindow> {
        self.operation.as_ref().filter(|op| op.end > now)
    }

    /// Seconds until the current window completes, zero if none or done.
    #[must_use]
    pub fn remaining_secs(&self, now: Timestamp) -> u64 {
        self.operation
            .as_ref()
            .map_or(0, |op| op.end.saturating_sub(now))
    }
}

/// Price multiplier the generator applies for an already-worked parcel
/// (basis points): cleared land carries +15%, plowed +35%.
#[must_use]
pub const fn condition_price_bp(condition: Condition) -> u32 {
    match condition {
        Condition::Cleared => 11_500,
        Condition::Plowed => 13_500,
        // the generator only ever inserts raw/cleared/plowed
        _ => 10_000,
    }
}

/// Suggested insertion price for a generated parcel:
/// `area x price-per-m2 x condition multiplier`.
///
/// The generator draws the initial condition with weights 70% raw,
/// 20% cleared, 10% plowed; that draw happens in the pipeline, not here.
#[must_use]
pub fn suggested_price(area_sqm: u64, condition: Condition, config: &GameConfig) -> Money {
    config
        .price_per_sqm
        .checked_mul_int(area_sqm)
        .unwrap_or(Money::MAX)
        .mul_bp(condition_price_bp(condition))
}
