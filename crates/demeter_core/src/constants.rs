//! Shared numeric constants.

/// Square metres per hectare. Parcel areas are stored in m²; every
/// agronomic rate (yield, seed usage, work speed) is per hectare.
pub const SQM_PER_HA: u64 = 10_000;

/// Basis-point scale: 10,000 bp = 100% = a multiplier of exactly 1.
///
/// All fractional multipliers in the core (demand pricing, market
/// fluctuation, tractor speed, wear) are integers on this scale.
pub const BP_ONE: u32 = 10_000;
