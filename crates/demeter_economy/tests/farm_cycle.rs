//! End-to-end scenarios for the farming core: the reference duration
//! numbers, the full clean-to-sale crop cycle, and the documented failure
//! cases, all on a hand-driven clock.
//!
//! Run with: cargo test --package demeter_economy --test farm_cycle

use std::sync::Arc;

use demeter_catalog::{items, Catalog};
use demeter_core::{ManualClock, Money};
use demeter_economy::{
    Condition, FarmAction, GameConfig, GameError, NoNeighbors, SiloBucket, SpatialIndex,
    TheGranary, Trend,
};

/// A spatial stub reporting a fixed neighbor count.
struct FixedNeighbors(usize);

impl SpatialIndex for FixedNeighbors {
    fn count_owned_within(&self, _parcel: u64, _radius_m: u32) -> usize {
        self.0
    }
}

fn rich_config() -> GameConfig {
    GameConfig {
        starting_money: Money::from_whole(10_000_000),
        ..GameConfig::default()
    }
}

fn granary_with(clock: Arc<ManualClock>, config: GameConfig) -> TheGranary {
    TheGranary::init(
        Arc::new(Catalog::standard()),
        Arc::new(NoNeighbors),
        clock,
        config,
        &[42u8; 32],
    )
}

#[test]
fn reference_clean_scenario_forty_seconds() {
    // 2 ha of raw land, heavy cleaner at efficiency 1.5 -> 40s
    let clock = Arc::new(ManualClock::new(10_000));
    let granary = granary_with(Arc::clone(&clock), rich_config());
    let user = granary.create_user();
    let land = granary.register_parcel(
        20_000,
        Condition::Raw,
        Money::from_whole(10_000),
        String::new(),
    );
    granary.buy_land(user, land).unwrap();
    granary.buy_item(user, items::FORESTRY_EXCAVATOR, 1).unwrap();
    let excavator = granary.inventory_of(user).unwrap()[0].id;

    let started = granary
        .start_action(user, land, FarmAction::Clean, excavator)
        .unwrap();
    assert_eq!(started.duration_secs, 40);

    // finishing early is a no-op, not an error
    clock.advance(39);
    let outcome = granary.finish_operation(user, land).unwrap();
    assert!(!outcome.completed);
    assert_eq!(outcome.remaining_secs, Some(1));

    clock.advance(1);
    let outcome = granary.finish_operation(user, land).unwrap();
    assert!(outcome.completed);
    assert_eq!(outcome.new_condition, Some(Condition::Cleared));

    // second finish observes cleared operation fields
    let outcome = granary.finish_operation(user, land).unwrap();
    assert!(!outcome.completed);
    assert_eq!(outcome.remaining_secs, Some(0));
}

#[test]
fn buy_land_insufficient_funds_changes_nothing() {
    let clock = Arc::new(ManualClock::new(0));
    let config = GameConfig {
        starting_money: Money::from_whole(100_000),
        ..GameConfig::default()
    };
    let granary = granary_with(clock, config);
    let user = granary.create_user();
    let land = granary.register_parcel(
        20_000,
        Condition::Raw,
        Money::from_whole(120_000),
        String::new(),
    );

    let err = granary.buy_land(user, land).unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientFunds { required, available }
            if required == Money::from_whole(120_000) && available == Money::from_whole(100_000)
    ));
    // user not charged, parcel still available
    assert_eq!(granary.money_of(user).unwrap(), Money::from_whole(100_000));
    let view = granary.land_view(land).unwrap();
    assert!(view.parcel.owner.is_none());
}

#[test]
fn sow_without_enough_seed_starts_nothing() {
    // 1 ha parcel, 60 kg/ha seed usage, only 50 kg in the silo
    let clock = Arc::new(ManualClock::new(0));
    let granary = granary_with(clock, rich_config());
    let user = granary.create_user();
    let land = granary.register_parcel(
        10_000,
        Condition::Plowed,
        Money::from_whole(6_750),
        String::new(),
    );
    granary.buy_land(user, land).unwrap();
    granary.buy_item(user, items::FIELD_TRACTOR, 1).unwrap();
    granary.buy_item(user, items::PRECISION_SEEDER, 1).unwrap();
    let rows = granary.inventory_of(user).unwrap();
    let (tractor, seeder) = (rows[0].id, rows[1].id);
    granary.equip_implement(user, tractor, seeder).unwrap();

    granary
        .add_to_silo(user, SiloBucket::Seeds, items::SOYBEAN_SEED, 50)
        .unwrap();

    let err = granary
        .start_action(user, land, FarmAction::Sow(items::SOYBEAN_SEED), tractor)
        .unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientSeeds {
            required_kg: 60,
            available_kg: 50
        }
    ));

    // no operation window was armed, no seed was taken
    let view = granary.land_view(land).unwrap();
    assert!(view.parcel.operation.is_none());
    assert_eq!(view.remaining_secs, 0);
    let silo = granary.silo_of(user).unwrap();
    assert_eq!(silo.seeds, vec![(items::SOYBEAN_SEED, 50)]);
}

#[test]
fn full_crop_cycle_clean_to_sale() {
    let clock = Arc::new(ManualClock::new(50_000));
    let granary = granary_with(Arc::clone(&clock), rich_config());
    let user = granary.create_user();
    let land = granary.register_parcel(
        20_000,
        Condition::Raw,
        Money::from_whole(10_000),
        String::new(),
    );
    granary.buy_land(user, land).unwrap();

    // fleet: excavator, tractor, plow, seeder, combine, and seed stock
    granary.buy_item(user, items::FORESTRY_EXCAVATOR, 1).unwrap();
    granary.buy_item(user, items::FIELD_TRACTOR, 1).unwrap();
    granary.buy_item(user, items::DISC_PLOW, 1).unwrap();
    granary.buy_item(user, items::PRECISION_SEEDER, 1).unwrap();
    granary.buy_item(user, items::COMBINE_S400, 1).unwrap();
    granary.buy_item(user, items::SOYBEAN_SEED, 120).unwrap();

    let rows = granary.inventory_of(user).unwrap();
    let excavator = rows[0].id;
    let tractor = rows[1].id;
    let plow = rows[2].id;
    let seeder = rows[3].id;
    let combine = rows[4].id;

    // clean: 2 ha / 1.5 = 40s
    let started = granary
        .start_action(user, land, FarmAction::Clean, excavator)
        .unwrap();
    assert_eq!(started.duration_secs, 40);
    clock.advance(40);
    granary.finish_operation(user, land).unwrap();

    // plow behind the 150hp tractor: 1.0 x 1.5 = 1.5 ha/h -> 40s
    granary.equip_implement(user, tractor, plow).unwrap();
    let started = granary
        .start_action(user, land, FarmAction::Plow, tractor)
        .unwrap();
    assert_eq!(started.duration_secs, 40);
    clock.advance(40);
    let outcome = granary.finish_operation(user, land).unwrap();
    assert_eq!(outcome.new_condition, Some(Condition::Plowed));

    // swap to the seeder: 1.5 x 1.5 = 2.25 ha/h -> floor(60/2.25) = 26s
    granary.unequip_implement(user, plow).unwrap();
    granary.equip_implement(user, tractor, seeder).unwrap();
    let started = granary
        .start_action(user, land, FarmAction::Sow(items::SOYBEAN_SEED), tractor)
        .unwrap();
    assert_eq!(started.duration_secs, 26);

    // 2 ha x 60 kg/ha of seed left the silo
    let silo = granary.silo_of(user).unwrap();
    assert!(silo.seeds.is_empty());

    clock.advance(26);
    let outcome = granary.finish_operation(user, land).unwrap();
    assert_eq!(outcome.new_condition, Some(Condition::Growing));

    // growth countdown: soybeans take 120s; the sweep is idempotent
    assert_eq!(granary.check_maturation(), 0);
    clock.advance(120);
    assert_eq!(granary.check_maturation(), 1);
    assert_eq!(granary.check_maturation(), 0);
    let view = granary.land_view(land).unwrap();
    assert_eq!(view.parcel.condition, Condition::Mature);

    // harvest: 2 ha / 2.0 = 30s, yield in [0.8, 1.2] x 7,000 kg
    let started = granary
        .start_action(user, land, FarmAction::Harvest, combine)
        .unwrap();
    assert_eq!(started.duration_secs, 30);
    clock.advance(30);
    let outcome = granary.finish_operation(user, land).unwrap();
    assert_eq!(outcome.new_condition, Some(Condition::Cleared));
    let harvested = outcome.harvested_kg.unwrap();
    assert!(
        (5_600..=8_400).contains(&harvested),
        "yield {harvested} outside the roll range"
    );

    // the field is reset for the next cycle
    let view = granary.land_view(land).unwrap();
    assert!(view.parcel.current_crop.is_none());
    assert!(view.parcel.operation.is_none());

    // sell everything at the seeded market price of 3.50/kg
    let before = granary.money_of(user).unwrap();
    let receipt = granary
        .sell_produce(user, items::SOYBEANS, harvested)
        .unwrap();
    assert_eq!(
        receipt.total,
        Money::from_parts(3, 50).checked_mul_int(harvested).unwrap()
    );
    assert_eq!(
        granary.money_of(user).unwrap(),
        before.checked_add(receipt.total).unwrap()
    );
    let silo = granary.silo_of(user).unwrap();
    assert!(silo.produce.is_empty());
}

#[test]
fn illegal_actions_leave_condition_unchanged() {
    let clock = Arc::new(ManualClock::new(0));
    let granary = granary_with(clock, rich_config());
    let user = granary.create_user();
    let land = granary.register_parcel(
        10_000,
        Condition::Raw,
        Money::from_whole(5_000),
        String::new(),
    );
    granary.buy_land(user, land).unwrap();
    granary.buy_item(user, items::COMBINE_S400, 1).unwrap();
    let combine = granary.inventory_of(user).unwrap()[0].id;

    // harvest on raw land is a state-machine violation
    let err = granary
        .start_action(user, land, FarmAction::Harvest, combine)
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidCondition { .. }));
    assert_eq!(
        granary.land_view(land).unwrap().parcel.condition,
        Condition::Raw
    );

    // the right condition with the wrong machine is an equipment error
    let err = granary
        .start_action(user, land, FarmAction::Clean, combine)
        .unwrap_err();
    assert!(matches!(err, GameError::WrongEquipment));
}

#[test]
fn ownership_is_enforced() {
    let clock = Arc::new(ManualClock::new(0));
    let granary = granary_with(clock, rich_config());
    let owner = granary.create_user();
    let intruder = granary.create_user();
    let land = granary.register_parcel(
        10_000,
        Condition::Raw,
        Money::from_whole(5_000),
        String::new(),
    );
    granary.buy_land(owner, land).unwrap();
    granary.buy_item(intruder, items::FORESTRY_EXCAVATOR, 1).unwrap();
    let excavator = granary.inventory_of(intruder).unwrap()[0].id;

    assert!(matches!(
        granary.start_action(intruder, land, FarmAction::Clean, excavator),
        Err(GameError::NotOwner)
    ));
    assert!(matches!(
        granary.buy_land(intruder, land),
        Err(GameError::AlreadyOwned)
    ));
}

#[test]
fn equipment_constraints() {
    let clock = Arc::new(ManualClock::new(0));
    let granary = granary_with(clock, rich_config());
    let user = granary.create_user();

    granary.buy_item(user, items::LIGHT_TRACTOR, 1).unwrap();
    granary.buy_item(user, items::HEAVY_HARROW, 1).unwrap();
    granary.buy_item(user, items::DISC_PLOW, 1).unwrap();
    let rows = granary.inventory_of(user).unwrap();
    let (light_tractor, harrow, plow) = (rows[0].id, rows[1].id, rows[2].id);

    // 75hp tractor cannot carry a 200hp harrow
    let err = granary.equip_implement(user, light_tractor, harrow).unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientPower {
            required_hp: 200,
            available_hp: 75
        }
    ));

    // the disc plow fits; a second attachment attempt is refused
    granary.equip_implement(user, light_tractor, plow).unwrap();
    assert!(matches!(
        granary.equip_implement(user, light_tractor, plow),
        Err(GameError::AlreadyAttached)
    ));

    // two machines cannot be chained together
    assert!(matches!(
        granary.equip_implement(user, plow, harrow),
        Err(GameError::WrongEquipment)
    ));
}

#[test]
fn wear_accumulates_and_repair_charges_by_wear() {
    let clock = Arc::new(ManualClock::new(0));
    let granary = granary_with(Arc::clone(&clock), rich_config());
    let user = granary.create_user();
    let land = granary.register_parcel(
        10_000,
        Condition::Raw,
        Money::from_whole(5_000),
        String::new(),
    );
    granary.buy_land(user, land).unwrap();
    granary.buy_item(user, items::FORESTRY_EXCAVATOR, 1).unwrap();
    let excavator = granary.inventory_of(user).unwrap()[0].id;

    // fresh machinery has nothing to repair
    assert!(matches!(
        granary.repair_equipment(user, excavator),
        Err(GameError::NoRepairNeeded)
    ));

    granary
        .start_action(user, land, FarmAction::Clean, excavator)
        .unwrap();
    clock.advance(20);
    granary.finish_operation(user, land).unwrap();

    let row = &granary.inventory_of(user).unwrap()[0];
    assert_eq!(row.wear_bp, 300);

    // 600,000 x 10% x 0.03 = 1,800.00
    let before = granary.money_of(user).unwrap();
    let cost = granary.repair_equipment(user, excavator).unwrap();
    assert_eq!(cost, Money::from_whole(1_800));
    assert_eq!(
        granary.money_of(user).unwrap(),
        before.checked_sub(cost).unwrap()
    );
    assert_eq!(granary.inventory_of(user).unwrap()[0].wear_bp, 0);
}

#[test]
fn demand_pricing_reprices_every_attempt() {
    let clock = Arc::new(ManualClock::new(0));
    let granary = TheGranary::init(
        Arc::new(Catalog::standard()),
        Arc::new(FixedNeighbors(7)),
        clock,
        rich_config(),
        &[42u8; 32],
    );
    let user = granary.create_user();
    let land = granary.register_parcel(
        20_000,
        Condition::Raw,
        Money::from_whole(100_000),
        String::new(),
    );

    let quote = granary.dynamic_price(land).unwrap();
    assert_eq!(quote.sold_neighbors, 7);
    assert_eq!(quote.multiplier_bp, 10_700);
    assert_eq!(quote.final_price, Money::from_whole(107_000));

    // the buyer pays the repriced amount, not the base
    let paid = granary.buy_land(user, land).unwrap();
    assert_eq!(paid, Money::from_whole(107_000));
    assert_eq!(
        granary.land_view(land).unwrap().parcel.price,
        Money::from_whole(107_000)
    );
}

#[test]
fn market_settles_sales_at_current_price() {
    let clock = Arc::new(ManualClock::new(0));
    let granary = granary_with(clock, rich_config());
    let user = granary.create_user();
    granary
        .add_to_silo(user, SiloBucket::Produce, items::CORN, 1_000)
        .unwrap();

    // overdrawing the silo fails with both numbers reported
    let err = granary.sell_produce(user, items::CORN, 1_500).unwrap_err();
    assert!(matches!(
        err,
        GameError::InsufficientStock {
            required: 1_500,
            available: 1_000
        }
    ));

    // drift the market, then settle at whatever the current price is
    granary.update_prices();
    let (price, trend) = granary.price_of(items::CORN).unwrap();
    assert!(matches!(trend, Trend::Up | Trend::Down | Trend::Stable));
    let receipt = granary.sell_produce(user, items::CORN, 1_000).unwrap();
    assert_eq!(receipt.total, price.checked_mul_int(1_000).unwrap());

    // band invariant: price stayed within [50%, 150%] of base
    let base = Money::from_parts(1, 20);
    assert!(price >= base.mul_bp(5_000) && price <= base.mul_bp(15_000));
}
