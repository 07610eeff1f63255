//! # The Silo Ledger
//!
//! Per-user keyed quantities of seeds and produce, in kilograms. A plain
//! data structure: callers are responsible for holding the owning user's
//! row lock around every read-modify-write (the Granary does).
//!
//! One invariant matters to the rest of the core: **an entry that reaches
//! exactly zero is deleted**. Existence checks elsewhere ("does this user
//! hold any soybeans?") rely on empty meaning absent.

use std::collections::BTreeMap;
use std::fmt;

use demeter_core::ItemId;

use crate::error::{GameError, GameResult};

/// Which side of the silo an operation touches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SiloBucket {
    /// Plantable seed stock.
    Seeds,
    /// Harvested produce awaiting sale.
    Produce,
}

impl fmt::Display for SiloBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeds => write!(f, "seeds"),
            Self::Produce => write!(f, "produce"),
        }
    }
}

/// One user's seed and produce holdings.
///
/// Quantities are kilograms and never negative; a removal that would
/// overdraw fails atomically with [`GameError::InsufficientStock`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Silo {
    // BTreeMap for stable iteration in views and tests.
    seeds: BTreeMap<ItemId, u64>,
    produce: BTreeMap<ItemId, u64>,
}

impl Silo {
    /// Creates an empty silo.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, bucket: SiloBucket) -> &BTreeMap<ItemId, u64> {
        match bucket {
            SiloBucket::Seeds => &self.seeds,
            SiloBucket::Produce => &self.produce,
        }
    }

    fn bucket_mut(&mut self, bucket: SiloBucket) -> &mut BTreeMap<ItemId, u64> {
        match bucket {
            SiloBucket::Seeds => &mut self.seeds,
            SiloBucket::Produce => &mut self.produce,
        }
    }

    /// Current quantity of an item, zero if absent.
    #[must_use]
    pub fn quantity(&self, bucket: SiloBucket, item: ItemId) -> u64 {
        self.bucket(bucket).get(&item).copied().unwrap_or(0)
    }

    /// Adds kilograms to an entry, returning the new quantity.
    pub fn add(&mut self, bucket: SiloBucket, item: ItemId, kg: u64) -> u64 {
        if kg == 0 {
            return self.quantity(bucket, item);
        }
        let entry = self.bucket_mut(bucket).entry(item).or_insert(0);
        *entry = entry.saturating_add(kg);
        *entry
    }

    /// Removes kilograms from an entry, returning the new quantity.
    ///
    /// An entry that reaches exactly zero is deleted.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientStock`] if the entry holds less than `kg`;
    /// the silo is left unchanged.
    pub fn remove(&mut self, bucket: SiloBucket, item: ItemId, kg: u64) -> GameResult<u64> {
        let available = self.quantity(bucket, item);
        if available < kg {
            return Err(GameError::InsufficientStock {
                required: kg,
                available,
            });
        }
        let remaining = available - kg;
        let entries = self.bucket_mut(bucket);
        if remaining == 0 {
            entries.remove(&item);
        } else {
            entries.insert(item, remaining);
        }
        Ok(remaining)
    }

    /// Iterates a bucket's entries in item-id order.
    pub fn entries(&self, bucket: SiloBucket) -> impl Iterator<Item = (ItemId, u64)> + '_ {
        self.bucket(bucket).iter().map(|(&item, &kg)| (item, kg))
    }

    /// True if both buckets are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty() && self.produce.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut silo = Silo::new();
        assert_eq!(silo.add(SiloBucket::Seeds, 30, 100), 100);
        assert_eq!(silo.add(SiloBucket::Seeds, 30, 20), 120);
        assert_eq!(silo.remove(SiloBucket::Seeds, 30, 50).unwrap(), 70);
        assert_eq!(silo.quantity(SiloBucket::Seeds, 30), 70);
    }

    #[test]
    fn test_overdraw_leaves_state_unchanged() {
        let mut silo = Silo::new();
        silo.add(SiloBucket::Seeds, 30, 50);
        let err = silo.remove(SiloBucket::Seeds, 30, 60).unwrap_err();
        assert!(matches!(
            err,
            GameError::InsufficientStock {
                required: 60,
                available: 50
            }
        ));
        assert_eq!(silo.quantity(SiloBucket::Seeds, 30), 50);
    }

    #[test]
    fn test_entry_deleted_at_zero() {
        let mut silo = Silo::new();
        silo.add(SiloBucket::Produce, 40, 10);
        assert_eq!(silo.remove(SiloBucket::Produce, 40, 10).unwrap(), 0);
        assert_eq!(silo.entries(SiloBucket::Produce).count(), 0);
        assert!(silo.is_empty());
    }

    #[test]
    fn test_buckets_are_independent() {
        let mut silo = Silo::new();
        silo.add(SiloBucket::Seeds, 30, 10);
        assert_eq!(silo.quantity(SiloBucket::Produce, 30), 0);
        assert!(silo.remove(SiloBucket::Produce, 30, 1).is_err());
    }

    #[test]
    fn test_remove_from_absent_entry() {
        let mut silo = Silo::new();
        assert!(matches!(
            silo.remove(SiloBucket::Seeds, 99, 1),
            Err(GameError::InsufficientStock {
                required: 1,
                available: 0
            })
        ));
    }
}
