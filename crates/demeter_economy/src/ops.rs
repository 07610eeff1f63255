//! # Operation State Machine
//!
//! The pure rules of field work: which action applies to which parcel
//! condition, what condition an operation leaves behind, and the integer
//! arithmetic for durations, seed requirements, and yields.
//!
//! Everything here is side-effect free; the Granary supplies the locking
//! and persistence around it.

use std::fmt;

use demeter_catalog::FieldTask;
use demeter_core::{ItemId, BP_ONE, SQM_PER_HA};

use crate::error::{GameError, GameResult};
use crate::land::{Condition, OperationKind};

/// A player-startable field action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FarmAction {
    /// Clear raw land.
    Clean,
    /// Plow raw or cleared land.
    Plow,
    /// Sow the given seed variety into plowed land.
    Sow(ItemId),
    /// Harvest a mature crop.
    Harvest,
}

impl FarmAction {
    /// The equipment task this action requires.
    #[must_use]
    pub const fn task(self) -> FieldTask {
        match self {
            Self::Clean => FieldTask::Cleaning,
            Self::Plow => FieldTask::Plowing,
            Self::Sow(_) => FieldTask::Sowing,
            Self::Harvest => FieldTask::Harvesting,
        }
    }

    /// The operation window kind this action runs as.
    #[must_use]
    pub const fn operation(self) -> OperationKind {
        match self {
            Self::Clean => OperationKind::Clean,
            Self::Plow => OperationKind::Plow,
            Self::Sow(_) => OperationKind::Sow,
            Self::Harvest => OperationKind::Harvest,
        }
    }
}

impl fmt::Display for FarmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clean => write!(f, "clean"),
            Self::Plow => write!(f, "plow"),
            Self::Sow(_) => write!(f, "sow"),
            Self::Harvest => write!(f, "harvest"),
        }
    }
}

/// Checks an action against the parcel's condition.
///
/// The transition table:
///
/// | action  | accepted conditions |
/// |---------|---------------------|
/// | clean   | raw                 |
/// | plow    | raw, cleared        |
/// | sow     | plowed              |
/// | harvest | mature              |
///
/// # Errors
///
/// [`GameError::InvalidCondition`] naming both sides of the mismatch.
pub fn validate_condition(condition: Condition, action: FarmAction) -> GameResult<()> {
    let legal = match action {
        FarmAction::Clean => matches!(condition, Condition::Raw),
        FarmAction::Plow => matches!(condition, Condition::Raw | Condition::Cleared),
        FarmAction::Sow(_) => matches!(condition, Condition::Plowed),
        FarmAction::Harvest => matches!(condition, Condition::Mature),
    };
    if legal {
        Ok(())
    } else {
        Err(GameError::InvalidCondition { condition, action })
    }
}

/// The condition a parcel lands in when an operation completes.
///
/// Sow completes into `Growing` (the growth countdown is re-armed by the
/// caller); the growth phase completes into `Mature`; harvest resets the
/// field to `Cleared` for the next cycle.
#[must_use]
pub const fn completed_condition(kind: OperationKind) -> Condition {
    match kind {
        OperationKind::Clean => Condition::Cleared,
        OperationKind::Plow => Condition::Plowed,
        OperationKind::Sow => Condition::Growing,
        OperationKind::Grow => Condition::Mature,
        OperationKind::Harvest => Condition::Cleared,
    }
}

/// Work duration in whole seconds: `floor(area_ha x base / efficiency)`.
///
/// With areas in m2 and efficiency in basis points the hectare and bp
/// scales cancel exactly: `area_sqm x base / efficiency_bp`. A broken
/// efficiency (zero) is treated as 1.0 rather than dividing by zero.
#[must_use]
pub const fn duration_secs(area_sqm: u64, efficiency_bp: u32, base_seconds_per_ha: u64) -> u64 {
    let eff = if efficiency_bp == 0 {
        BP_ONE as u64
    } else {
        efficiency_bp as u64
    };
    area_sqm * base_seconds_per_ha / eff
}

/// Kilograms of seed a sowing consumes: `ceil(area_ha x usage_kg_ha)`.
#[must_use]
pub const fn seed_requirement_kg(area_sqm: u64, usage_kg_ha: u64) -> u64 {
    (area_sqm * usage_kg_ha).div_ceil(SQM_PER_HA)
}

/// Harvested kilograms: `floor(area_ha x yield_kg_ha x roll)`, with the
/// yield roll in basis points (10,000 = x1).
#[must_use]
pub const fn yield_kg(area_sqm: u64, yield_kg_ha: u64, roll_bp: u32) -> u64 {
    let raw = area_sqm as u128 * yield_kg_ha as u128 * roll_bp as u128;
    (raw / (SQM_PER_HA as u128 * BP_ONE as u128)) as u64
}
