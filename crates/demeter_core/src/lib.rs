//! # DEMETER Core Primitives
//!
//! Shared building blocks for the DEMETER farming core.
//!
//! ## Design Principles
//!
//! 1. **Zero floating point** - All monetary calculations use fixed-point
//!    (u64 with two implicit decimals); percentages are basis points
//! 2. **Server-authoritative time** - Everything that reads a clock reads it
//!    through the [`Clock`] seam, so tests can drive time by hand
//! 3. **No game logic** - Rules live in `demeter_economy`, data in
//!    `demeter_catalog`; this crate only provides the vocabulary

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod constants;
pub mod ids;
pub mod money;
pub mod time;

pub use constants::{BP_ONE, SQM_PER_HA};
pub use ids::{InstanceId, InventoryId, ItemId, LandId, UserId};
pub use money::Money;
pub use time::{Clock, ManualClock, SystemClock, Timestamp};
