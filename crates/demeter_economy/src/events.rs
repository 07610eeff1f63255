//! # Game Event Log
//!
//! Committed units of work queue a [`GameEvent`]; the presentation layer
//! drains the buffer on its own schedule to drive HUD updates and map
//! refreshes. Events are fire-and-forget: losing them costs visuals,
//! never state.

use demeter_core::{InventoryId, ItemId, LandId, Money, UserId};
use parking_lot::Mutex;

use crate::land::{Condition, OperationKind};

/// Something observable happened in the economy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    /// A parcel sold.
    LandPurchased {
        /// Buyer.
        user: UserId,
        /// Parcel sold.
        land: LandId,
        /// Price actually paid (after demand pricing).
        price: Money,
    },
    /// A shop purchase completed.
    ItemPurchased {
        /// Buyer.
        user: UserId,
        /// Catalog item bought.
        item: ItemId,
        /// Quantity bought.
        quantity: u64,
        /// Total cost.
        cost: Money,
    },
    /// An implement was mounted on a tractor.
    ImplementAttached {
        /// Owner of both rows.
        user: UserId,
        /// The tractor's inventory row.
        tractor: InventoryId,
        /// The implement's inventory row.
        implement: InventoryId,
    },
    /// An implement was unmounted.
    ImplementDetached {
        /// Owner.
        user: UserId,
        /// The implement's inventory row.
        implement: InventoryId,
    },
    /// Wear was repaired away.
    EquipmentRepaired {
        /// Owner.
        user: UserId,
        /// The repaired inventory row.
        inventory: InventoryId,
        /// What the workshop charged.
        cost: Money,
    },
    /// A field operation was started.
    OperationStarted {
        /// Operator.
        user: UserId,
        /// Parcel being worked.
        land: LandId,
        /// What is running.
        kind: OperationKind,
        /// How long it will take.
        duration_secs: u64,
    },
    /// A field operation completed and the parcel changed condition.
    OperationCompleted {
        /// Operator.
        user: UserId,
        /// Parcel worked.
        land: LandId,
        /// The parcel's new condition.
        condition: Condition,
    },
    /// The maturation sweep ripened a parcel.
    CropMatured {
        /// The parcel that became mature.
        land: LandId,
    },
    /// Harvest banked produce into the silo.
    HarvestBanked {
        /// Harvester.
        user: UserId,
        /// Parcel harvested.
        land: LandId,
        /// Produce item credited.
        item: ItemId,
        /// Kilograms credited.
        kg: u64,
    },
    /// Produce sold at market.
    ProduceSold {
        /// Seller.
        user: UserId,
        /// Produce item sold.
        item: ItemId,
        /// Kilograms sold.
        kg: u64,
        /// Money credited.
        total: Money,
    },
    /// The periodic market update ran.
    PricesUpdated {
        /// Rows touched.
        rows: usize,
    },
}

/// Mutex-guarded event buffer.
#[derive(Debug, Default)]
pub struct EventLog {
    buffer: Mutex<Vec<GameEvent>>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an event.
    pub fn push(&self, event: GameEvent) {
        self.buffer.lock().push(event);
    }

    /// Takes every queued event, oldest first.
    #[must_use]
    pub fn drain(&self) -> Vec<GameEvent> {
        std::mem::take(&mut *self.buffer.lock())
    }

    /// Queued event count (for debug UI).
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.lock().len()
    }
}
