//! # Economy Error Types
//!
//! Every way a unit of work can refuse to commit. Validation failures are
//! normal control flow - each variant carries enough context to render a
//! user-facing message (what was required, what was available). The
//! [`GameError::Journal`] variant is the one infrastructure failure kind;
//! unlike the domain variants it is safe to retry, because an aborted unit
//! of work leaves no partial state.

use demeter_core::{InventoryId, ItemId, LandId, Money, UserId};
use thiserror::Error;

use crate::land::Condition;
use crate::ops::FarmAction;

/// Errors that can occur in the farming core.
#[derive(Error, Debug)]
pub enum GameError {
    /// No such user.
    #[error("user not found: {0}")]
    UserNotFound(UserId),

    /// No such land parcel.
    #[error("land parcel not found: {0}")]
    LandNotFound(LandId),

    /// No such catalog item.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// No such entry in the caller's inventory.
    #[error("inventory entry not found: {0}")]
    InventoryNotFound(InventoryId),

    /// The parcel belongs to someone else (or to nobody).
    #[error("parcel is not owned by this player")]
    NotOwner,

    /// A purchase attempt on a parcel that already sold.
    #[error("parcel is already owned")]
    AlreadyOwned,

    /// The parcel is busy with a running operation.
    #[error("operation in progress, {remaining_secs}s remaining")]
    OperationInProgress {
        /// Seconds until the running operation can be finished.
        remaining_secs: u64,
    },

    /// The requested action does not apply to the parcel's condition.
    #[error("cannot {action} a parcel that is {condition}")]
    InvalidCondition {
        /// The parcel's current condition.
        condition: Condition,
        /// The action that was requested.
        action: FarmAction,
    },

    /// The selected equipment cannot perform the requested action.
    #[error("equipment cannot perform this action")]
    WrongEquipment,

    /// The tractor is too weak for the implement.
    #[error("insufficient power: implement needs {required_hp}hp, tractor has {available_hp}hp")]
    InsufficientPower {
        /// Horsepower the implement demands.
        required_hp: u32,
        /// Horsepower the tractor delivers.
        available_hp: u32,
    },

    /// Not enough money.
    #[error("insufficient funds: need {required}, have {available}")]
    InsufficientFunds {
        /// Amount the operation costs.
        required: Money,
        /// The balance that was available.
        available: Money,
    },

    /// Not enough seed in the silo to sow the parcel.
    #[error("insufficient seeds: need {required_kg}kg, have {available_kg}kg")]
    InsufficientSeeds {
        /// Kilograms the sowing requires.
        required_kg: u64,
        /// Kilograms available in the silo.
        available_kg: u64,
    },

    /// Not enough stock in the silo.
    #[error("insufficient stock: need {required}kg, have {available}kg")]
    InsufficientStock {
        /// Kilograms requested.
        required: u64,
        /// Kilograms available.
        available: u64,
    },

    /// The implement is already mounted on a tractor.
    #[error("implement is already attached to a tractor")]
    AlreadyAttached,

    /// Repair was requested on equipment with zero wear.
    #[error("equipment has no wear to repair")]
    NoRepairNeeded,

    /// Arithmetic overflow in an economic calculation.
    #[error("arithmetic overflow in economic calculation")]
    ArithmeticOverflow,

    /// The operation journal could not be written or read.
    ///
    /// Transient infrastructure failure: the unit of work aborted with no
    /// partial state, so the caller may safely retry.
    #[error("journal failure: {0}")]
    Journal(#[from] std::io::Error),
}

/// Result type for economy operations.
pub type GameResult<T> = Result<T, GameError>;
