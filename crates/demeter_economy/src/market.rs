//! # The Produce Market
//!
//! One shared price table for every sellable crop. Prices drift on a
//! periodic stochastic update and are read (never written) by sell-side
//! settlement. Each price row carries its trend flag and updates
//! atomically under its own lock, so a reader can never observe a fresh
//! price next to a stale trend.

use std::fmt;

use demeter_catalog::Catalog;
use demeter_core::{ItemId, Money, BP_ONE};
use rand::Rng;

use crate::config::GameConfig;
use crate::store::Table;

/// Direction of the last price move.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Trend {
    /// New price is more than the trend band above the old one.
    Up,
    /// New price is more than the trend band below the old one.
    Down,
    /// Within the band.
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Stable => write!(f, "stable"),
        }
    }
}

/// One item's market state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MarketRow {
    /// The item being priced.
    pub item: ItemId,
    /// Anchor price; the random walk never leaves [50%, 150%] of this.
    pub base_price: Money,
    /// Price a sale settles at right now.
    pub current_price: Money,
    /// Direction of the last update.
    pub trend: Trend,
}

/// The shared price table.
#[derive(Debug, Default)]
pub struct Market {
    rows: Table<ItemId, MarketRow>,
}

impl Market {
    /// Creates an empty market.
    #[must_use]
    pub fn new() -> Self {
        Self { rows: Table::new() }
    }

    /// Builds the market from a catalog: one row per item that carries a
    /// sell price (seeds and produce both do), starting at that price
    /// with a stable trend.
    #[must_use]
    pub fn seed_from_catalog(catalog: &Catalog) -> Self {
        let market = Self::new();
        for item in catalog.iter() {
            if let Some(sell_price) = item.sell_price() {
                market.rows.insert(
                    item.id,
                    MarketRow {
                        item: item.id,
                        base_price: sell_price,
                        current_price: sell_price,
                        trend: Trend::Stable,
                    },
                );
            }
        }
        market
    }

    /// Current price and trend for an item, if it trades here.
    #[must_use]
    pub fn price_of(&self, item: ItemId) -> Option<(Money, Trend)> {
        self.rows.row(item).map(|row| {
            let row = row.lock();
            (row.current_price, row.trend)
        })
    }

    /// Snapshot of every row, in no particular order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<MarketRow> {
        self.rows
            .keys()
            .into_iter()
            .filter_map(|item| self.rows.row(item))
            .map(|row| row.lock().clone())
            .collect()
    }

    /// Applies one stochastic update to every row. Returns the number of
    /// rows updated.
    ///
    /// Per row, under its lock: draw a fluctuation in
    /// +-`fluctuation_limit_bp` of the *base* price, clamp the result to
    /// the configured floor/ceiling band around base, and set the trend
    /// by comparing against the old current price.
    pub fn update_prices<R: Rng>(&self, rng: &mut R, config: &GameConfig) -> usize {
        let mut updated = 0;
        for item in self.rows.keys() {
            let Some(row) = self.rows.row(item) else {
                continue;
            };
            let mut row = row.lock();

            let limit = i64::from(config.fluctuation_limit_bp);
            let fluctuation = rng.gen_range(-limit..=limit);
            let factor_bp = (i64::from(BP_ONE) + fluctuation) as u32;

            let raw = row.base_price.mul_bp(factor_bp);
            let floor = row.base_price.mul_bp(config.market_floor_bp);
            let ceiling = row.base_price.mul_bp(config.market_ceiling_bp);
            let new_price = raw.clamp(floor, ceiling);

            row.trend = trend_of(row.current_price, new_price, config.trend_band_bp);
            row.current_price = new_price;
            updated += 1;
        }
        updated
    }
}

/// Classifies a price move against the trend dead zone.
fn trend_of(old: Money, new: Money, band_bp: u32) -> Trend {
    if new > old.mul_bp(BP_ONE + band_bp) {
        Trend::Up
    } else if new < old.mul_bp(BP_ONE - band_bp) {
        Trend::Down
    } else {
        Trend::Stable
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn soybean_market() -> Market {
        Market::seed_from_catalog(&Catalog::standard())
    }

    #[test]
    fn test_seeded_rows_start_at_base() {
        let market = soybean_market();
        // soybean seed, corn seed, soybeans, corn
        assert_eq!(market.snapshot().len(), 4);
        let (price, trend) = market.price_of(demeter_catalog::items::SOYBEANS).unwrap();
        assert_eq!(price, Money::from_parts(3, 50));
        assert_eq!(trend, Trend::Stable);
    }

    #[test]
    fn test_unpriced_items_do_not_trade() {
        let market = soybean_market();
        assert!(market.price_of(demeter_catalog::items::COMBINE_S400).is_none());
    }

    #[test]
    fn test_update_stays_in_band() {
        let market = soybean_market();
        let config = GameConfig::default();
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);

        for _ in 0..500 {
            let updated = market.update_prices(&mut rng, &config);
            assert_eq!(updated, 4);
            for row in market.snapshot() {
                let floor = row.base_price.mul_bp(config.market_floor_bp);
                let ceiling = row.base_price.mul_bp(config.market_ceiling_bp);
                assert!(row.current_price >= floor, "price under floor");
                assert!(row.current_price <= ceiling, "price over ceiling");
            }
        }
    }

    #[test]
    fn test_trend_classification() {
        let old = Money::from_whole(100);
        assert_eq!(trend_of(old, Money::from_whole(106), 500), Trend::Up);
        assert_eq!(trend_of(old, Money::from_whole(94), 500), Trend::Down);
        assert_eq!(trend_of(old, Money::from_whole(103), 500), Trend::Stable);
        // exactly on the band edge counts as stable
        assert_eq!(trend_of(old, Money::from_whole(105), 500), Trend::Stable);
    }
}
