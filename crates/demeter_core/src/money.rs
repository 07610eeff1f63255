//! # Fixed-Point Currency
//!
//! **CRITICAL: NO FLOATING POINT IN FINANCIAL CALCULATIONS**
//!
//! All balances and prices in the core are [`Money`]: a u64 holding
//! hundredths of a currency unit ("cents"). Two decimals match the
//! precision the game economy is balanced in.
//!
//! ## Why Fixed-Point?
//!
//! - Deterministic: same calculation = same result on all hardware
//! - No rounding errors: 0.10 + 0.20 == 0.30 (unlike IEEE 754 floats)
//! - Auditable: every committed transaction must be reproducible
//!
//! Fractional multipliers (demand pricing, market drift) are applied via
//! basis points - see [`Money::mul_bp`].

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

use serde::{Deserialize, Serialize};

/// Cents per whole currency unit.
const CENTS: u64 = 100;

/// Basis points in a multiplier of exactly 1.
const BP_SCALE: u128 = 10_000;

/// Fixed-point currency amount with two implicit decimals.
///
/// Internally stores value * 100 as a u64. Being unsigned, a balance can
/// never go negative by construction; debits are checked subtractions.
///
/// # Range
///
/// - Minimum: 0.00
/// - Maximum: 184,467,440,737,095,516.15
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero value.
    pub const ZERO: Self = Self(0);

    /// One whole currency unit (1.00).
    pub const ONE: Self = Self(CENTS);

    /// Maximum representable value.
    pub const MAX: Self = Self(u64::MAX);

    /// Creates an amount from whole currency units.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let price = Money::from_whole(150_000); // 150000.00
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_whole(whole: u64) -> Self {
        Self(whole * CENTS)
    }

    /// Creates an amount from whole units and cents.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let soy = Money::from_parts(3, 50); // 3.50 per kg
    /// ```
    #[inline]
    #[must_use]
    pub const fn from_parts(whole: u64, cents: u8) -> Self {
        Self(whole * CENTS + (cents as u64 % CENTS))
    }

    /// Creates an amount from a raw cent count.
    #[inline]
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the raw cent count.
    #[inline]
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Returns the whole-unit part.
    #[inline]
    #[must_use]
    pub const fn whole(self) -> u64 {
        self.0 / CENTS
    }

    /// Returns the fractional part in cents (0-99).
    #[inline]
    #[must_use]
    pub const fn fraction(self) -> u8 {
        (self.0 % CENTS) as u8
    }

    /// Returns true if this amount is zero.
    #[inline]
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    ///
    /// Underflow here means "insufficient funds" - balances cannot go
    /// negative.
    #[inline]
    #[must_use]
    pub const fn checked_sub(self, rhs: Self) -> Option<Self> {
        match self.0.checked_sub(rhs.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked multiplication by an integer quantity.
    ///
    /// Used for `unit price x quantity` totals.
    #[inline]
    #[must_use]
    pub const fn checked_mul_int(self, rhs: u64) -> Option<Self> {
        match self.0.checked_mul(rhs) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Multiplies by a basis-point factor (10,000 bp = x1), rounding down.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let base = Money::from_whole(100_000);
    /// let priced = base.mul_bp(10_300); // +3% demand -> 103000.00
    /// ```
    #[inline]
    #[must_use]
    pub const fn mul_bp(self, factor_bp: u32) -> Self {
        // Widen to u128 so the intermediate product cannot overflow
        let result = (self.0 as u128 * factor_bp as u128) / BP_SCALE;
        Self(result as u64)
    }

    /// Saturating addition.
    #[inline]
    #[must_use]
    pub const fn saturating_add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }

    /// Saturating subtraction.
    #[inline]
    #[must_use]
    pub const fn saturating_sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.wrapping_add(rhs.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.wrapping_sub(rhs.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        self.0 = self.0.wrapping_sub(rhs.0);
    }
}

impl fmt::Debug for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Money({}.{:02})", self.whole(), self.fraction())
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.whole(), self.fraction())
    }
}
