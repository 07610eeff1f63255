//! User records.

use demeter_core::{Money, UserId};

use crate::config::GameConfig;
use crate::error::{GameError, GameResult};
use crate::silo::Silo;

/// One player's economic state.
///
/// The balance is unsigned fixed-point, so it cannot go negative; every
/// debit is a checked subtraction that fails the unit of work instead.
#[derive(Clone, Debug)]
pub struct User {
    /// Stable user id (issued by the identity provider, unique here).
    pub id: UserId,
    /// Spendable balance.
    pub money: Money,
    /// Premium currency. Carried on the record; no core operation spends it.
    pub diamonds: u32,
    /// Seed and produce holdings.
    pub silo: Silo,
}

impl User {
    /// Creates a fresh user with the configured starting balances.
    #[must_use]
    pub fn new(id: UserId, config: &GameConfig) -> Self {
        Self {
            id,
            money: config.starting_money,
            diamonds: config.starting_diamonds,
            silo: Silo::new(),
        }
    }

    /// Removes `amount` from the balance.
    ///
    /// # Errors
    ///
    /// [`GameError::InsufficientFunds`] (reporting required vs available)
    /// if the balance is short; the balance is unchanged.
    pub fn debit(&mut self, amount: Money) -> GameResult<()> {
        match self.money.checked_sub(amount) {
            Some(rest) => {
                self.money = rest;
                Ok(())
            }
            None => Err(GameError::InsufficientFunds {
                required: amount,
                available: self.money,
            }),
        }
    }

    /// Adds `amount` to the balance.
    ///
    /// # Errors
    ///
    /// [`GameError::ArithmeticOverflow`] if the balance would exceed the
    /// representable maximum.
    pub fn credit(&mut self, amount: Money) -> GameResult<()> {
        self.money = self
            .money
            .checked_add(amount)
            .ok_or(GameError::ArithmeticOverflow)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_gets_starting_balances() {
        let user = User::new(1, &GameConfig::default());
        assert_eq!(user.money, Money::from_whole(200_000));
        assert_eq!(user.diamonds, 200);
        assert!(user.silo.is_empty());
    }

    #[test]
    fn test_debit_reports_shortfall() {
        let mut user = User::new(1, &GameConfig::default());
        let err = user.debit(Money::from_whole(250_000)).unwrap_err();
        assert!(matches!(err, GameError::InsufficientFunds { .. }));
        // failed debit leaves the balance untouched
        assert_eq!(user.money, Money::from_whole(200_000));
    }

    #[test]
    fn test_credit_then_debit() {
        let mut user = User::new(1, &GameConfig::default());
        user.credit(Money::from_whole(50_000)).unwrap();
        user.debit(Money::from_whole(250_000)).unwrap();
        assert_eq!(user.money, Money::ZERO);
    }
}
