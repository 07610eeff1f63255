//! # The Granary - Economy Coordinator
//!
//! **Nothing changes hands without going through here.**
//!
//! Every player action (buy, equip, repair, start/finish field work, sell)
//! enters as one atomic unit of work: the Granary acquires the row locks
//! the operation needs - always in the order **user, land, inventory** -
//! validates everything, then mutates, then releases. A validation failure
//! aborts with every row untouched; no partial effect is ever observable
//! from another thread.
//!
//! ## The Golden Path: Harvest
//!
//! ```text
//! start_action(Harvest) ──> lock user, land, inventory
//!                               │ validate: owner, idle, mature, harvester
//!                               ▼
//!                         arm operation window (area x 30 / efficiency)
//!
//! finish_operation() ─────> lock user, land, inventory
//!                               │ window elapsed?
//!                               ▼
//!                   roll yield ──> credit silo ──> wear the harvester
//!                               │
//!                               ▼
//!                   queue HarvestBanked ──> journal ──> release locks
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use demeter_catalog::{Catalog, CatalogItem, ItemKind, StatBlock};
use demeter_core::{Clock, InventoryId, ItemId, LandId, Money, Timestamp, UserId};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use crate::config::GameConfig;
use crate::equipment::{repair_cost, Capability, InventoryItem, UserInventory};
use crate::error::{GameError, GameResult};
use crate::events::{EventLog, GameEvent};
use crate::journal::Journal;
use crate::land::{Condition, Land, LandStatus, OperationKind, OperationWindow};
use crate::market::{Market, MarketRow, Trend};
use crate::ops::{self, FarmAction};
use crate::pricing::{self, PriceQuote, SpatialIndex};
use crate::silo::SiloBucket;
use crate::store::Table;
use crate::user::User;

/// Receipt for a started field operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StartedOperation {
    /// What is now running on the parcel.
    pub kind: OperationKind,
    /// Seconds of work ahead.
    pub duration_secs: u64,
    /// Server-authoritative completion time.
    pub end: Timestamp,
}

/// Outcome of a finish attempt.
///
/// Finishing early is not an error: the call reports "not completed" and
/// mutates nothing, so clients can poll it safely.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FinishOutcome {
    /// Whether the operation was applied.
    pub completed: bool,
    /// The parcel's condition after completion.
    pub new_condition: Option<Condition>,
    /// Kilograms banked into the silo (harvest only).
    pub harvested_kg: Option<u64>,
    /// Seconds still to wait when not completed.
    pub remaining_secs: Option<u64>,
}

impl FinishOutcome {
    const fn not_completed(remaining_secs: u64) -> Self {
        Self {
            completed: false,
            new_condition: None,
            harvested_kg: None,
            remaining_secs: Some(remaining_secs),
        }
    }
}

/// Receipt for a shop purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PurchaseReceipt {
    /// Total debited.
    pub cost: Money,
    /// Balance after the purchase.
    pub new_balance: Money,
}

/// Receipt for a market sale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SaleReceipt {
    /// Kilograms sold.
    pub quantity_kg: u64,
    /// Money credited.
    pub total: Money,
    /// Balance after settlement.
    pub new_balance: Money,
}

/// A user's silo holdings, joined for display.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SiloView {
    /// Seed stock as (item, kilograms), in item order.
    pub seeds: Vec<(ItemId, u64)>,
    /// Produce stock as (item, kilograms), in item order.
    pub produce: Vec<(ItemId, u64)>,
}

/// A parcel snapshot plus the time its current operation still needs.
#[derive(Clone, Debug)]
pub struct LandView {
    /// The parcel record.
    pub parcel: Land,
    /// Seconds until the running operation completes, zero when idle.
    pub remaining_secs: u64,
}

/// The Granary - the single point of contact for every economic mutation.
///
/// ## Thread Safety
///
/// `TheGranary` is `Send + Sync`; request handlers share one instance
/// behind an `Arc` and call it concurrently. Correctness rests on the
/// row-lock protocol described at the module level, not on any external
/// serialization.
pub struct TheGranary {
    /// Immutable item reference data.
    catalog: Arc<Catalog>,
    /// Balance tunables.
    config: GameConfig,
    /// Server-authoritative time source.
    clock: Arc<dyn Clock>,
    /// Spatial collaborator for demand pricing.
    spatial: Arc<dyn SpatialIndex>,
    /// User rows (money, diamonds, silo).
    users: Table<UserId, User>,
    /// Parcel rows.
    lands: Table<LandId, Land>,
    /// Per-user inventory rows.
    inventories: Table<UserId, UserInventory>,
    /// The shared produce market.
    market: Market,
    /// Server RNG, seeded from the server secret. The only two consumers
    /// are the market update and the harvest yield roll.
    rng: Mutex<ChaCha20Rng>,
    /// Event buffer for the presentation layer.
    events: EventLog,
    /// Optional audit journal.
    journal: Option<Journal>,
    next_user: AtomicU64,
    next_land: AtomicU64,
    next_inventory: AtomicU64,
    next_instance: AtomicU64,
}

impl TheGranary {
    /// Initializes the coordinator.
    ///
    /// The market is seeded from the catalog's sell prices; the RNG from
    /// `server_secret` (32 bytes from secure storage - deterministic under
    /// a known seed, unpredictable to clients).
    #[must_use]
    pub fn init(
        catalog: Arc<Catalog>,
        spatial: Arc<dyn SpatialIndex>,
        clock: Arc<dyn Clock>,
        config: GameConfig,
        server_secret: &[u8; 32],
    ) -> Self {
        let market = Market::seed_from_catalog(&catalog);
        Self {
            catalog,
            config,
            clock,
            spatial,
            users: Table::new(),
            lands: Table::new(),
            inventories: Table::new(),
            market,
            rng: Mutex::new(ChaCha20Rng::from_seed(*server_secret)),
            events: EventLog::new(),
            journal: None,
            next_user: AtomicU64::new(1),
            next_land: AtomicU64::new(1),
            next_inventory: AtomicU64::new(1),
            next_instance: AtomicU64::new(1),
        }
    }

    /// Initializes the coordinator with an audit journal at `path`.
    ///
    /// # Errors
    ///
    /// [`GameError::Journal`] if the journal file cannot be opened.
    pub fn init_with_journal(
        catalog: Arc<Catalog>,
        spatial: Arc<dyn SpatialIndex>,
        clock: Arc<dyn Clock>,
        config: GameConfig,
        server_secret: &[u8; 32],
        path: impl AsRef<std::path::Path>,
    ) -> GameResult<Self> {
        let mut granary = Self::init(catalog, spatial, clock, config, server_secret);
        granary.journal = Some(Journal::open(path)?);
        Ok(granary)
    }

    // ========================================================================
    // Registration - users from the identity provider, parcels from the
    // land-generation pipeline
    // ========================================================================

    /// Creates a user with the configured starting balances and an empty
    /// inventory. Returns the new id.
    pub fn create_user(&self) -> UserId {
        let id = self.next_user.fetch_add(1, Ordering::SeqCst);
        self.users.insert(id, User::new(id, &self.config));
        self.inventories.insert(id, UserInventory::new());
        tracing::info!("user {} registered", id);
        id
    }

    /// Inserts a parcel as the external land generator produces them:
    /// area, initial condition, asking price, and an opaque geometry
    /// handle. Returns the new id.
    ///
    /// [`crate::land::suggested_price`] gives the pipeline's standard
    /// pricing for a parcel; callers may pass any price.
    pub fn register_parcel(
        &self,
        area_sqm: u64,
        condition: Condition,
        price: Money,
        geometry: String,
    ) -> LandId {
        let id = self.next_land.fetch_add(1, Ordering::SeqCst);
        self.lands
            .insert(id, Land::new(id, area_sqm, condition, price, geometry));
        id
    }

    // ========================================================================
    // Land acquisition
    // ========================================================================

    /// Prices a parcel right now: base price times the live demand
    /// multiplier. Never cached - callers see what a purchase this
    /// instant would cost.
    ///
    /// # Errors
    ///
    /// [`GameError::LandNotFound`] for an unknown parcel.
    pub fn dynamic_price(&self, land_id: LandId) -> GameResult<PriceQuote> {
        let land_arc = self.land_row(land_id)?;
        let land = land_arc.lock();
        Ok(self.quote_for(&land))
    }

    /// Buys a parcel at its freshly computed dynamic price.
    ///
    /// Locks user then land; revalidates availability and funds under the
    /// locks, so two racing buyers resolve deterministically: one pays,
    /// the other gets [`GameError::AlreadyOwned`] and is never charged.
    ///
    /// # Errors
    ///
    /// [`GameError::LandNotFound`], [`GameError::UserNotFound`],
    /// [`GameError::AlreadyOwned`], [`GameError::InsufficientFunds`].
    pub fn buy_land(&self, user_id: UserId, land_id: LandId) -> GameResult<Money> {
        let user_arc = self.user_row(user_id)?;
        let land_arc = self.land_row(land_id)?;
        let mut user = user_arc.lock();
        let mut land = land_arc.lock();

        if land.status != LandStatus::Available {
            return Err(GameError::AlreadyOwned);
        }
        // Reprice under the lock - a quote from before the lock could be
        // stale the moment a neighbor sells.
        let quote = self.quote_for(&land);
        user.debit(quote.final_price)?;

        land.owner = Some(user_id);
        land.status = LandStatus::Owned;
        land.price = quote.final_price;

        self.events.push(GameEvent::LandPurchased {
            user: user_id,
            land: land_id,
            price: quote.final_price,
        });
        self.journal_line(&format!(
            "BUY_LAND user={user_id} land={land_id} price={}",
            quote.final_price
        ));
        tracing::info!(
            "parcel {} sold to user {} for {}",
            land_id,
            user_id,
            quote.final_price
        );
        Ok(quote.final_price)
    }

    // ========================================================================
    // Field operations
    // ========================================================================

    /// Starts a field action on an owned, idle parcel.
    ///
    /// Resolves the selected machine into an effective work rate, debits
    /// seed for sowing, and arms the operation window. Duration is
    /// `floor(area_ha x base / efficiency)` seconds.
    ///
    /// # Errors
    ///
    /// [`GameError::NotOwner`], [`GameError::OperationInProgress`],
    /// [`GameError::InvalidCondition`], [`GameError::WrongEquipment`],
    /// [`GameError::InsufficientSeeds`], plus not-found kinds.
    pub fn start_action(
        &self,
        user_id: UserId,
        land_id: LandId,
        action: FarmAction,
        tool: InventoryId,
    ) -> GameResult<StartedOperation> {
        let user_arc = self.user_row(user_id)?;
        let land_arc = self.land_row(land_id)?;
        let inv_arc = self.inventory_row(user_id)?;
        let mut user = user_arc.lock();
        let mut land = land_arc.lock();
        let inv = inv_arc.lock();
        let now = self.clock.now();

        if land.owner != Some(user_id) {
            return Err(GameError::NotOwner);
        }
        if let Some(op) = land.active_operation(now) {
            return Err(GameError::OperationInProgress {
                remaining_secs: op.end.saturating_sub(now),
            });
        }
        ops::validate_condition(land.condition, action)?;

        let capability = Capability::of(&inv, tool, &self.catalog)?;
        let resolved = capability.resolve(action.task())?;

        let mut crop = None;
        if let FarmAction::Sow(seed_id) = action {
            let seed = self.catalog_item(seed_id)?;
            let usage_kg_ha = match seed.stats {
                StatBlock::Seed {
                    seed_usage_kg_ha, ..
                } => seed_usage_kg_ha,
                _ => return Err(GameError::ItemNotFound(seed_id)),
            };
            let required_kg = ops::seed_requirement_kg(land.area_sqm, usage_kg_ha);
            let available_kg = user.silo.quantity(SiloBucket::Seeds, seed_id);
            if available_kg < required_kg {
                return Err(GameError::InsufficientSeeds {
                    required_kg,
                    available_kg,
                });
            }
            user.silo.remove(SiloBucket::Seeds, seed_id, required_kg)?;
            crop = Some(seed_id);
        }

        let duration_secs = ops::duration_secs(
            land.area_sqm,
            resolved.efficiency_bp,
            self.config.base_seconds_per_ha,
        );
        let kind = action.operation();
        let end = now + duration_secs;
        land.operation = Some(OperationWindow {
            kind,
            start: now,
            end,
            tool: Some(resolved.wear_target),
        });
        if crop.is_some() {
            land.current_crop = crop;
        }

        self.events.push(GameEvent::OperationStarted {
            user: user_id,
            land: land_id,
            kind,
            duration_secs,
        });
        self.journal_line(&format!(
            "START user={user_id} land={land_id} op={kind} duration={duration_secs}s"
        ));
        tracing::debug!(
            "user {} started {} on parcel {} ({}s)",
            user_id,
            kind,
            land_id,
            duration_secs
        );
        Ok(StartedOperation {
            kind,
            duration_secs,
            end,
        })
    }

    /// Finishes the parcel's operation if its window has elapsed.
    ///
    /// Idempotent: before the window ends (or once the fields are already
    /// cleared) this reports `completed: false` and mutates nothing.
    /// Completion applies the condition transition, wears the working
    /// tool, re-arms the growth countdown after sowing, and banks the
    /// harvest yield.
    ///
    /// # Errors
    ///
    /// [`GameError::NotOwner`] plus not-found kinds. An early call is not
    /// an error.
    pub fn finish_operation(&self, user_id: UserId, land_id: LandId) -> GameResult<FinishOutcome> {
        let user_arc = self.user_row(user_id)?;
        let land_arc = self.land_row(land_id)?;
        let inv_arc = self.inventory_row(user_id)?;
        let mut user = user_arc.lock();
        let mut land = land_arc.lock();
        let mut inv = inv_arc.lock();
        let now = self.clock.now();

        if land.owner != Some(user_id) {
            return Err(GameError::NotOwner);
        }
        let Some(op) = land.operation else {
            return Ok(FinishOutcome::not_completed(0));
        };
        if now < op.end {
            return Ok(FinishOutcome::not_completed(op.end - now));
        }

        let mut harvested_kg = None;
        match op.kind {
            OperationKind::Clean | OperationKind::Plow => {
                land.condition = ops::completed_condition(op.kind);
                land.operation = None;
            }
            OperationKind::Sow => {
                // The crop starts growing the moment sowing finishes, not
                // when the player gets around to calling us.
                land.condition = Condition::Growing;
                let growth_window = land.current_crop.and_then(|crop| {
                    self.seed_growth_time(crop).map(|growth| OperationWindow {
                        kind: OperationKind::Grow,
                        start: op.end,
                        end: op.end + growth,
                        tool: None,
                    })
                });
                land.operation = growth_window;
            }
            OperationKind::Grow => {
                land.condition = Condition::Mature;
                land.operation = None;
            }
            OperationKind::Harvest => {
                harvested_kg = self.bank_harvest(&mut user, &land, user_id, land_id);
                land.condition = Condition::Cleared;
                land.current_crop = None;
                land.operation = None;
            }
        }

        if let Some(tool) = op.tool {
            if let Some(row) = inv.get_mut(&tool) {
                row.add_wear(self.config.wear_per_operation_bp);
            }
        }

        self.events.push(GameEvent::OperationCompleted {
            user: user_id,
            land: land_id,
            condition: land.condition,
        });
        self.journal_line(&format!(
            "FINISH user={user_id} land={land_id} op={} condition={}",
            op.kind, land.condition
        ));
        tracing::debug!(
            "user {} finished {} on parcel {}, now {}",
            user_id,
            op.kind,
            land_id,
            land.condition
        );
        Ok(FinishOutcome {
            completed: true,
            new_condition: Some(land.condition),
            harvested_kg,
            remaining_secs: None,
        })
    }

    /// Bulk maturation sweep: every parcel still `Growing` whose window
    /// has elapsed becomes `Mature`. Idempotent and safe to run from any
    /// number of timers at once; returns how many parcels ripened.
    pub fn check_maturation(&self) -> usize {
        let now = self.clock.now();
        let mut matured = 0;
        for land_id in self.lands.keys() {
            let Some(land_arc) = self.lands.row(land_id) else {
                continue;
            };
            let mut land = land_arc.lock();
            if land.condition != Condition::Growing {
                continue;
            }
            let due = land.operation.is_some_and(|op| op.end <= now);
            if due {
                land.condition = Condition::Mature;
                land.operation = None;
                matured += 1;
                self.events.push(GameEvent::CropMatured { land: land_id });
            }
        }
        if matured > 0 {
            self.journal_line(&format!("MATURED parcels={matured}"));
            tracing::debug!("maturation sweep ripened {} parcels", matured);
        }
        matured
    }

    // ========================================================================
    // Shop, equipment, repair
    // ========================================================================

    /// Buys catalog items. Machinery materializes as distinct instances
    /// (quantity 1, fresh instance id each); seeds and other goods stack,
    /// and seeds are mirrored into the silo's seed bucket.
    ///
    /// # Errors
    ///
    /// [`GameError::ItemNotFound`], [`GameError::UserNotFound`],
    /// [`GameError::InsufficientFunds`].
    pub fn buy_item(
        &self,
        user_id: UserId,
        item_id: ItemId,
        quantity: u64,
    ) -> GameResult<PurchaseReceipt> {
        let item = self.catalog_item(item_id)?;
        let user_arc = self.user_row(user_id)?;
        let inv_arc = self.inventory_row(user_id)?;
        let mut user = user_arc.lock();
        let mut inv = inv_arc.lock();

        if quantity == 0 {
            return Ok(PurchaseReceipt {
                cost: Money::ZERO,
                new_balance: user.money,
            });
        }

        let cost = item
            .price
            .checked_mul_int(quantity)
            .ok_or(GameError::ArithmeticOverflow)?;
        user.debit(cost)?;

        if item.is_machinery() {
            for _ in 0..quantity {
                let inv_id = self.next_inventory.fetch_add(1, Ordering::SeqCst);
                let instance = self.next_instance.fetch_add(1, Ordering::SeqCst);
                inv.insert(inv_id, InventoryItem::machine(inv_id, item_id, instance));
            }
        } else {
            match inv
                .values_mut()
                .find(|row| row.item == item_id && row.instance.is_none())
            {
                Some(row) => row.quantity += quantity,
                None => {
                    let inv_id = self.next_inventory.fetch_add(1, Ordering::SeqCst);
                    inv.insert(inv_id, InventoryItem::stack(inv_id, item_id, quantity));
                }
            }
            if item.kind() == ItemKind::Seed {
                user.silo.add(SiloBucket::Seeds, item_id, quantity);
            }
        }

        self.events.push(GameEvent::ItemPurchased {
            user: user_id,
            item: item_id,
            quantity,
            cost,
        });
        self.journal_line(&format!(
            "BUY_ITEM user={user_id} item={item_id} qty={quantity} cost={cost}"
        ));
        tracing::info!(
            "user {} bought {}x {} for {}",
            user_id,
            quantity,
            item.name,
            cost
        );
        Ok(PurchaseReceipt {
            cost,
            new_balance: user.money,
        })
    }

    /// Mounts an implement on a tractor the user owns.
    ///
    /// # Errors
    ///
    /// [`GameError::InventoryNotFound`], [`GameError::WrongEquipment`]
    /// (either row is not the right kind of machine),
    /// [`GameError::AlreadyAttached`], [`GameError::InsufficientPower`].
    pub fn equip_implement(
        &self,
        user_id: UserId,
        tractor_inv: InventoryId,
        implement_inv: InventoryId,
    ) -> GameResult<()> {
        let inv_arc = self.inventory_row(user_id)?;
        let mut inv = inv_arc.lock();

        let tractor = inv
            .get(&tractor_inv)
            .ok_or(GameError::InventoryNotFound(tractor_inv))?;
        let available_hp = match self.catalog_item(tractor.item)?.stats {
            StatBlock::Tractor { hp, .. } => hp,
            _ => return Err(GameError::WrongEquipment),
        };
        let Some(tractor_instance) = tractor.instance else {
            return Err(GameError::WrongEquipment);
        };

        let implement = inv
            .get(&implement_inv)
            .ok_or(GameError::InventoryNotFound(implement_inv))?;
        let required_hp = match self.catalog_item(implement.item)?.stats {
            StatBlock::Implement { req_hp, .. } => req_hp,
            _ => return Err(GameError::WrongEquipment),
        };
        if implement.attached_to.is_some() {
            return Err(GameError::AlreadyAttached);
        }
        if available_hp < required_hp {
            return Err(GameError::InsufficientPower {
                required_hp,
                available_hp,
            });
        }

        if let Some(row) = inv.get_mut(&implement_inv) {
            row.attached_to = Some(tractor_instance);
        }

        self.events.push(GameEvent::ImplementAttached {
            user: user_id,
            tractor: tractor_inv,
            implement: implement_inv,
        });
        self.journal_line(&format!(
            "EQUIP user={user_id} tractor={tractor_inv} implement={implement_inv}"
        ));
        Ok(())
    }

    /// Unmounts an implement. Unconditional apart from the ownership
    /// check - detaching an already-free implement is a no-op.
    ///
    /// # Errors
    ///
    /// [`GameError::InventoryNotFound`], [`GameError::UserNotFound`].
    pub fn unequip_implement(
        &self,
        user_id: UserId,
        implement_inv: InventoryId,
    ) -> GameResult<()> {
        let inv_arc = self.inventory_row(user_id)?;
        let mut inv = inv_arc.lock();
        let row = inv
            .get_mut(&implement_inv)
            .ok_or(GameError::InventoryNotFound(implement_inv))?;
        row.attached_to = None;

        self.events.push(GameEvent::ImplementDetached {
            user: user_id,
            implement: implement_inv,
        });
        Ok(())
    }

    /// Repairs a machine back to zero wear.
    ///
    /// Cost is `ceil(base_price x 10% x wear)`. Returns what was charged.
    ///
    /// # Errors
    ///
    /// [`GameError::NoRepairNeeded`] at zero wear,
    /// [`GameError::InsufficientFunds`], plus not-found kinds.
    pub fn repair_equipment(&self, user_id: UserId, inv_id: InventoryId) -> GameResult<Money> {
        let user_arc = self.user_row(user_id)?;
        let inv_arc = self.inventory_row(user_id)?;
        let mut user = user_arc.lock();
        let mut inv = inv_arc.lock();

        let row = inv
            .get(&inv_id)
            .ok_or(GameError::InventoryNotFound(inv_id))?;
        if row.wear_bp == 0 {
            return Err(GameError::NoRepairNeeded);
        }
        let base_price = self.catalog_item(row.item)?.price;
        let cost = repair_cost(base_price, row.wear_bp, self.config.repair_rate_bp);
        user.debit(cost)?;
        if let Some(row) = inv.get_mut(&inv_id) {
            row.wear_bp = 0;
        }

        self.events.push(GameEvent::EquipmentRepaired {
            user: user_id,
            inventory: inv_id,
            cost,
        });
        self.journal_line(&format!("REPAIR user={user_id} inv={inv_id} cost={cost}"));
        tracing::info!("user {} repaired inventory {} for {}", user_id, inv_id, cost);
        Ok(cost)
    }

    // ========================================================================
    // Silo ledger
    // ========================================================================

    /// Adds kilograms to a silo bucket; returns the new quantity.
    ///
    /// # Errors
    ///
    /// [`GameError::UserNotFound`].
    pub fn add_to_silo(
        &self,
        user_id: UserId,
        bucket: SiloBucket,
        item: ItemId,
        kg: u64,
    ) -> GameResult<u64> {
        let user_arc = self.user_row(user_id)?;
        let mut user = user_arc.lock();
        Ok(user.silo.add(bucket, item, kg))
    }

    /// Removes kilograms from a silo bucket; returns the new quantity.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientStock`] (state unchanged),
    /// [`GameError::UserNotFound`].
    pub fn remove_from_silo(
        &self,
        user_id: UserId,
        bucket: SiloBucket,
        item: ItemId,
        kg: u64,
    ) -> GameResult<u64> {
        let user_arc = self.user_row(user_id)?;
        let mut user = user_arc.lock();
        user.silo.remove(bucket, item, kg)
    }

    // ========================================================================
    // Market
    // ========================================================================

    /// Sells produce from the silo at the current market price.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientStock`], [`GameError::ItemNotFound`] (no
    /// market row), [`GameError::UserNotFound`].
    pub fn sell_produce(
        &self,
        user_id: UserId,
        item_id: ItemId,
        kg: u64,
    ) -> GameResult<SaleReceipt> {
        let user_arc = self.user_row(user_id)?;
        let mut user = user_arc.lock();

        let available = user.silo.quantity(SiloBucket::Produce, item_id);
        if available < kg {
            return Err(GameError::InsufficientStock {
                required: kg,
                available,
            });
        }
        let (price, _) = self
            .market
            .price_of(item_id)
            .ok_or(GameError::ItemNotFound(item_id))?;
        let total = price
            .checked_mul_int(kg)
            .ok_or(GameError::ArithmeticOverflow)?;
        let new_balance = user
            .money
            .checked_add(total)
            .ok_or(GameError::ArithmeticOverflow)?;

        user.silo.remove(SiloBucket::Produce, item_id, kg)?;
        user.money = new_balance;

        self.events.push(GameEvent::ProduceSold {
            user: user_id,
            item: item_id,
            kg,
            total,
        });
        self.journal_line(&format!(
            "SELL user={user_id} item={item_id} kg={kg} total={total}"
        ));
        tracing::info!(
            "user {} sold {}kg of item {} for {}",
            user_id,
            kg,
            item_id,
            total
        );
        Ok(SaleReceipt {
            quantity_kg: kg,
            total,
            new_balance,
        })
    }

    /// Runs one stochastic market update across every price row.
    /// Independent of any user transaction; meant for a periodic job.
    pub fn update_prices(&self) -> usize {
        let updated = {
            let mut rng = self.rng.lock();
            self.market.update_prices(&mut *rng, &self.config)
        };
        self.events.push(GameEvent::PricesUpdated { rows: updated });
        self.journal_line(&format!("MARKET_UPDATE rows={updated}"));
        tracing::debug!("market update touched {} rows", updated);
        updated
    }

    // ========================================================================
    // Read views
    // ========================================================================

    /// A user's current balance.
    ///
    /// # Errors
    ///
    /// [`GameError::UserNotFound`].
    pub fn money_of(&self, user_id: UserId) -> GameResult<Money> {
        let user_arc = self.user_row(user_id)?;
        let user = user_arc.lock();
        Ok(user.money)
    }

    /// Snapshot of a user's inventory rows, in row-id order.
    ///
    /// # Errors
    ///
    /// [`GameError::UserNotFound`].
    pub fn inventory_of(&self, user_id: UserId) -> GameResult<Vec<InventoryItem>> {
        let inv_arc = self.inventory_row(user_id)?;
        let inv = inv_arc.lock();
        Ok(inv.values().cloned().collect())
    }

    /// Snapshot of a user's silo holdings.
    ///
    /// # Errors
    ///
    /// [`GameError::UserNotFound`].
    pub fn silo_of(&self, user_id: UserId) -> GameResult<SiloView> {
        let user_arc = self.user_row(user_id)?;
        let user = user_arc.lock();
        Ok(SiloView {
            seeds: user.silo.entries(SiloBucket::Seeds).collect(),
            produce: user.silo.entries(SiloBucket::Produce).collect(),
        })
    }

    /// Snapshots of every parcel a user owns.
    #[must_use]
    pub fn lands_of(&self, user_id: UserId) -> Vec<Land> {
        let mut owned = Vec::new();
        for land_id in self.lands.keys() {
            if let Some(land_arc) = self.lands.row(land_id) {
                let land = land_arc.lock();
                if land.owner == Some(user_id) {
                    owned.push(land.clone());
                }
            }
        }
        owned.sort_by_key(|land| land.id);
        owned
    }

    /// One parcel with the remaining time on its operation window.
    ///
    /// # Errors
    ///
    /// [`GameError::LandNotFound`].
    pub fn land_view(&self, land_id: LandId) -> GameResult<LandView> {
        let land_arc = self.land_row(land_id)?;
        let land = land_arc.lock();
        let now = self.clock.now();
        Ok(LandView {
            remaining_secs: land.remaining_secs(now),
            parcel: land.clone(),
        })
    }

    /// Snapshot of every market row.
    #[must_use]
    pub fn market_prices(&self) -> Vec<MarketRow> {
        let mut rows = self.market.snapshot();
        rows.sort_by_key(|row| row.item);
        rows
    }

    /// Current price and trend for one item.
    #[must_use]
    pub fn price_of(&self, item: ItemId) -> Option<(Money, Trend)> {
        self.market.price_of(item)
    }

    /// Drains queued game events for the presentation layer.
    #[must_use]
    pub fn drain_events(&self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Queued event count.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.events.pending()
    }

    /// Flushes the audit journal, if one is attached.
    ///
    /// # Errors
    ///
    /// [`GameError::Journal`] on I/O failure.
    pub fn flush(&self) -> GameResult<()> {
        if let Some(journal) = &self.journal {
            journal.flush()?;
        }
        Ok(())
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn user_row(&self, user: UserId) -> GameResult<Arc<Mutex<User>>> {
        self.users.row(user).ok_or(GameError::UserNotFound(user))
    }

    fn land_row(&self, land: LandId) -> GameResult<Arc<Mutex<Land>>> {
        self.lands.row(land).ok_or(GameError::LandNotFound(land))
    }

    fn inventory_row(&self, user: UserId) -> GameResult<Arc<Mutex<UserInventory>>> {
        self.inventories
            .row(user)
            .ok_or(GameError::UserNotFound(user))
    }

    fn catalog_item(&self, item: ItemId) -> GameResult<&CatalogItem> {
        self.catalog.get(item).ok_or(GameError::ItemNotFound(item))
    }

    fn quote_for(&self, land: &Land) -> PriceQuote {
        let sold_neighbors = self
            .spatial
            .count_owned_within(land.id, self.config.neighbor_radius_m);
        pricing::quote(land.price, sold_neighbors, &self.config)
    }

    fn seed_growth_time(&self, crop: ItemId) -> Option<u64> {
        match self.catalog.get(crop)?.stats {
            StatBlock::Seed {
                growth_time_secs, ..
            } => Some(growth_time_secs),
            _ => None,
        }
    }

    /// Rolls the yield for a harvested parcel and banks it. Returns the
    /// kilograms credited, or `None` if the parcel had no resolvable crop
    /// (nothing to bank, harvest still clears the field).
    fn bank_harvest(
        &self,
        user: &mut User,
        land: &Land,
        user_id: UserId,
        land_id: LandId,
    ) -> Option<u64> {
        let crop_id = land.current_crop?;
        let seed = self.catalog.get(crop_id)?;
        let yield_kg_ha = match seed.stats {
            StatBlock::Seed { yield_kg_ha, .. } => yield_kg_ha,
            _ => return None,
        };
        let produce = self.catalog.produce_for_category(&seed.category)?;

        let roll_bp = {
            let mut rng = self.rng.lock();
            rng.gen_range(self.config.yield_min_bp..=self.config.yield_max_bp)
        };
        let kg = ops::yield_kg(land.area_sqm, yield_kg_ha, roll_bp);
        user.silo.add(SiloBucket::Produce, produce.id, kg);

        self.events.push(GameEvent::HarvestBanked {
            user: user_id,
            land: land_id,
            item: produce.id,
            kg,
        });
        self.journal_line(&format!(
            "HARVEST user={user_id} land={land_id} item={} kg={kg}",
            produce.id
        ));
        Some(kg)
    }

    /// Journal writes never fail a committed unit of work; a broken audit
    /// trail is logged and play continues.
    fn journal_line(&self, line: &str) {
        if let Some(journal) = &self.journal {
            if let Err(err) = journal.append(line) {
                tracing::warn!("journal append failed: {}", err);
            }
        }
    }
}
