//! # DEMETER Economy System
//!
//! The transactional core of the DEMETER farming world: land ownership,
//! equipment state, crop-cycle progression, and the in-game economy,
//! correct under concurrent access.
//!
//! ## Design Principles
//!
//! 1. **One door** - every mutation goes through [`TheGranary`], as one
//!    atomic unit of work under row locks
//! 2. **Fixed lock order** - user, then land, then inventory; deadlock is
//!    prevented by convention, enforced by review
//! 3. **Zero floating point** - money is fixed-point, multipliers are
//!    basis points
//! 4. **Seeded randomness** - the market drift and the harvest yield roll
//!    are the only two random draws, both from one server-secret RNG
//!
//! ## Example
//!
//! ```rust,ignore
//! use demeter_economy::{TheGranary, FarmAction, GameConfig, NoNeighbors};
//!
//! let granary = TheGranary::init(
//!     Arc::new(Catalog::standard()),
//!     Arc::new(NoNeighbors),
//!     Arc::new(SystemClock),
//!     GameConfig::default(),
//!     &server_secret,
//! );
//!
//! let paid = granary.buy_land(user, parcel)?;
//! granary.start_action(user, parcel, FarmAction::Clean, excavator)?;
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod equipment;
pub mod error;
pub mod events;
pub mod granary;
pub mod journal;
pub mod land;
pub mod market;
pub mod ops;
pub mod pricing;
pub mod silo;
pub mod store;
pub mod user;

pub use config::GameConfig;
pub use equipment::{Capability, InventoryItem, ResolvedEquipment, UserInventory, WEAR_FULL_BP};
pub use error::{GameError, GameResult};
pub use events::{EventLog, GameEvent};
pub use granary::{
    FinishOutcome, LandView, PurchaseReceipt, SaleReceipt, SiloView, StartedOperation, TheGranary,
};
pub use journal::Journal;
pub use land::{Condition, Land, LandStatus, OperationKind, OperationWindow};
pub use market::{Market, MarketRow, Trend};
pub use ops::FarmAction;
pub use pricing::{NoNeighbors, PriceQuote, SpatialIndex};
pub use silo::{Silo, SiloBucket};
pub use user::User;
