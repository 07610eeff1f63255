//! # Inventory & Equipment
//!
//! Owned item instances, the tractor-implement attachment graph, and the
//! wear/repair arithmetic.
//!
//! Machinery rows are unique instances (quantity 1, stable instance id);
//! seed purchases stack. An implement's `attached_to` is a back-reference
//! to a tractor's instance id - both rows stay independently owned by the
//! same user.

use std::collections::BTreeMap;

use demeter_catalog::{Catalog, FieldTask, StatBlock};
use demeter_core::{InstanceId, InventoryId, ItemId, Money, BP_ONE};

use crate::error::{GameError, GameResult};

/// Full wear, in basis points.
pub const WEAR_FULL_BP: u32 = 10_000;

/// One inventory row: a machine instance or a fungible stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryItem {
    /// Row id, unique per server.
    pub id: InventoryId,
    /// The catalog item this row holds.
    pub item: ItemId,
    /// Stack size; always 1 for machinery.
    pub quantity: u64,
    /// Stable machine identity; `None` for stacks.
    pub instance: Option<InstanceId>,
    /// For implements: the tractor instance this is mounted on.
    pub attached_to: Option<InstanceId>,
    /// Accumulated wear in basis points of full wear, clamped to 10,000.
    pub wear_bp: u32,
}

impl InventoryItem {
    /// Creates a machine instance row.
    #[must_use]
    pub const fn machine(id: InventoryId, item: ItemId, instance: InstanceId) -> Self {
        Self {
            id,
            item,
            quantity: 1,
            instance: Some(instance),
            attached_to: None,
            wear_bp: 0,
        }
    }

    /// Creates a stack row.
    #[must_use]
    pub const fn stack(id: InventoryId, item: ItemId, quantity: u64) -> Self {
        Self {
            id,
            item,
            quantity,
            instance: None,
            attached_to: None,
            wear_bp: 0,
        }
    }

    /// Adds wear, clamping at full.
    pub fn add_wear(&mut self, wear_bp: u32) {
        self.wear_bp = (self.wear_bp + wear_bp).min(WEAR_FULL_BP);
    }
}

/// A user's inventory rows, keyed by row id.
///
/// The whole map sits behind its owner's inventory row lock; every
/// attachment or wear mutation happens under that one guard.
pub type UserInventory = BTreeMap<InventoryId, InventoryItem>;

/// An implement currently mounted on a tractor, resolved from the
/// attachment back-reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttachedImplement {
    /// The implement's inventory row.
    pub inv_id: InventoryId,
    /// The implement's base work rate (bp of ha/h).
    pub efficiency_bp: u32,
    /// The task the implement performs.
    pub task: FieldTask,
}

/// What a selected machine can do, as a tagged variant.
///
/// This replaces ad-hoc type/category checks: the state machine asks one
/// question - [`Capability::resolve`] - and gets either an effective work
/// rate or a refusal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Capability {
    /// A tractor and whatever is mounted on it.
    Tractor {
        /// The tractor's inventory row.
        inv_id: InventoryId,
        /// Speed multiplier applied to the implement's work rate.
        speed_bp: u32,
        /// The mounted implement, if any.
        attached: Option<AttachedImplement>,
    },
    /// A self-contained heavy machine.
    Heavy {
        /// The machine's inventory row.
        inv_id: InventoryId,
        /// The machine's work rate (bp of ha/h).
        efficiency_bp: u32,
        /// The task the machine performs.
        task: FieldTask,
    },
}

/// The outcome of capability resolution: how fast the work goes and which
/// row takes the wear when it completes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolvedEquipment {
    /// Effective work rate (bp of ha/h).
    pub efficiency_bp: u32,
    /// Inventory row that wears out doing the work.
    pub wear_target: InventoryId,
}

impl Capability {
    /// Reads a machine row (and its attachment) into a capability.
    ///
    /// # Errors
    ///
    /// [`GameError::InventoryNotFound`] if the row does not exist;
    /// [`GameError::WrongEquipment`] if the row is not machinery.
    pub fn of(
        inventory: &UserInventory,
        tool: InventoryId,
        catalog: &Catalog,
    ) -> GameResult<Self> {
        let row = inventory
            .get(&tool)
            .ok_or(GameError::InventoryNotFound(tool))?;
        let item = catalog
            .get(row.item)
            .ok_or(GameError::ItemNotFound(row.item))?;

        match item.stats {
            StatBlock::Tractor { speed_bp, .. } => {
                let attached = row.instance.and_then(|instance| {
                    find_attached(inventory, instance).and_then(|imp_row| {
                        match catalog.get(imp_row.item).map(|i| &i.stats) {
                            Some(&StatBlock::Implement {
                                efficiency_bp,
                                task,
                                ..
                            }) => Some(AttachedImplement {
                                inv_id: imp_row.id,
                                efficiency_bp,
                                task,
                            }),
                            _ => None,
                        }
                    })
                });
                Ok(Self::Tractor {
                    inv_id: row.id,
                    speed_bp,
                    attached,
                })
            }
            StatBlock::Heavy {
                efficiency_bp,
                task,
            } => Ok(Self::Heavy {
                inv_id: row.id,
                efficiency_bp,
                task,
            }),
            _ => Err(GameError::WrongEquipment),
        }
    }

    /// Resolves the capability against the task an action requires.
    ///
    /// A heavy machine must be built for the task. A tractor must have an
    /// implement mounted, and the implement must be built for the task;
    /// its work rate is scaled by the tractor's speed multiplier.
    ///
    /// # Errors
    ///
    /// [`GameError::WrongEquipment`] for a bare tractor, a mismatched
    /// implement, or a heavy machine built for another task.
    pub fn resolve(&self, wanted: FieldTask) -> GameResult<ResolvedEquipment> {
        match *self {
            Self::Heavy {
                inv_id,
                efficiency_bp,
                task,
            } if task == wanted => Ok(ResolvedEquipment {
                efficiency_bp,
                wear_target: inv_id,
            }),
            Self::Tractor {
                speed_bp,
                attached: Some(imp),
                ..
            } if imp.task == wanted => Ok(ResolvedEquipment {
                efficiency_bp: scale_bp(imp.efficiency_bp, speed_bp),
                wear_target: imp.inv_id,
            }),
            _ => Err(GameError::WrongEquipment),
        }
    }
}

/// Finds the implement row mounted on the given tractor instance.
fn find_attached(inventory: &UserInventory, tractor: InstanceId) -> Option<&InventoryItem> {
    inventory
        .values()
        .find(|row| row.attached_to == Some(tractor))
}

/// Applies a bp multiplier to a bp quantity.
const fn scale_bp(value_bp: u32, factor_bp: u32) -> u32 {
    ((value_bp as u64 * factor_bp as u64) / BP_ONE as u64) as u32
}

/// Repair pricing: `ceil(base_price x rate x wear)`, rounded up to whole
/// currency units as the workshop bills them.
#[must_use]
pub fn repair_cost(base_price: Money, wear_bp: u32, repair_rate_bp: u32) -> Money {
    let raw = base_price.cents() as u128 * wear_bp as u128 * repair_rate_bp as u128;
    // bp x bp scaling, then cents -> whole units, rounded up
    let denom = (BP_ONE as u128) * (BP_ONE as u128) * 100;
    Money::from_whole(raw.div_ceil(denom) as u64)
}
