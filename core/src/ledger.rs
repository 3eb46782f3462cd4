//! Resource and reward balances.

use serde::{Deserialize, Serialize};

use crate::{GameError, ResourceColor, RewardKind};

/// Non-negative balance per resource color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceLedger {
    blue: u32,
    red: u32,
    gray: u32,
}

impl ResourceLedger {
    /// Creates a ledger with explicit balances.
    #[must_use]
    pub const fn new(blue: u32, red: u32, gray: u32) -> Self {
        Self { blue, red, gray }
    }

    /// Creates a ledger holding `amount` of every color.
    #[must_use]
    pub const fn uniform(amount: u32) -> Self {
        Self::new(amount, amount, amount)
    }

    /// Balance held for `color`.
    #[must_use]
    pub const fn balance(&self, color: ResourceColor) -> u32 {
        match color {
            ResourceColor::Blue => self.blue,
            ResourceColor::Red => self.red,
            ResourceColor::Gray => self.gray,
        }
    }

    /// Adds `amount` to `color`, saturating at `u32::MAX`, and returns the new balance.
    pub fn credit(&mut self, color: ResourceColor, amount: u32) -> u32 {
        let slot = self.slot_mut(color);
        *slot = slot.saturating_add(amount);
        *slot
    }

    /// Removes `amount` from `color` and returns the new balance.
    ///
    /// Fails without touching the ledger when the balance is too low.
    pub fn debit(&mut self, color: ResourceColor, amount: u32) -> Result<u32, GameError> {
        let available = self.balance(color);
        let remaining = available
            .checked_sub(amount)
            .ok_or(GameError::InsufficientResource {
                color,
                required: amount,
                available,
            })?;
        *self.slot_mut(color) = remaining;
        Ok(remaining)
    }

    fn slot_mut(&mut self, color: ResourceColor) -> &mut u32 {
        match color {
            ResourceColor::Blue => &mut self.blue,
            ResourceColor::Red => &mut self.red,
            ResourceColor::Gray => &mut self.gray,
        }
    }
}

/// Amount of each reward kind granted together, typically per mission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardBundle {
    /// Black squares granted.
    pub black_square: u32,
    /// Orange triangles granted.
    pub orange_triangle: u32,
}

impl RewardBundle {
    /// Bundle granting nothing.
    pub const NONE: Self = Self {
        black_square: 0,
        orange_triangle: 0,
    };

    /// Amount granted for `kind`.
    #[must_use]
    pub const fn amount(&self, kind: RewardKind) -> u32 {
        match kind {
            RewardKind::BlackSquare => self.black_square,
            RewardKind::OrangeTriangle => self.orange_triangle,
        }
    }

    /// Reports whether the bundle grants nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.black_square == 0 && self.orange_triangle == 0
    }
}

impl Default for RewardBundle {
    /// One black square, the flat per-mission reward.
    fn default() -> Self {
        Self {
            black_square: 1,
            orange_triangle: 0,
        }
    }
}

/// Balance per reward kind. Balances only grow during play.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardLedger {
    black_square: u32,
    orange_triangle: u32,
}

impl RewardLedger {
    /// Creates a ledger with explicit balances.
    #[must_use]
    pub const fn new(black_square: u32, orange_triangle: u32) -> Self {
        Self {
            black_square,
            orange_triangle,
        }
    }

    /// Balance held for `kind`.
    #[must_use]
    pub const fn balance(&self, kind: RewardKind) -> u32 {
        match kind {
            RewardKind::BlackSquare => self.black_square,
            RewardKind::OrangeTriangle => self.orange_triangle,
        }
    }

    /// Adds `amount` to `kind`, saturating, and returns the new balance.
    pub fn credit(&mut self, kind: RewardKind, amount: u32) -> u32 {
        let slot = match kind {
            RewardKind::BlackSquare => &mut self.black_square,
            RewardKind::OrangeTriangle => &mut self.orange_triangle,
        };
        *slot = slot.saturating_add(amount);
        *slot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debit_fails_without_touching_balance() {
        let mut ledger = ResourceLedger::new(15, 0, 0);
        assert_eq!(
            ledger.debit(ResourceColor::Blue, 20),
            Err(GameError::InsufficientResource {
                color: ResourceColor::Blue,
                required: 20,
                available: 15,
            })
        );
        assert_eq!(ledger.balance(ResourceColor::Blue), 15);
        assert_eq!(ledger.debit(ResourceColor::Blue, 15), Ok(0));
    }

    #[test]
    fn credit_only_touches_requested_color() {
        let mut ledger = ResourceLedger::uniform(10);
        assert_eq!(ledger.credit(ResourceColor::Gray, 6), 16);
        assert_eq!(ledger, ResourceLedger::new(10, 10, 16));
    }

    #[test]
    fn reward_bundle_defaults_to_one_black_square() {
        let bundle = RewardBundle::default();
        assert_eq!(bundle.amount(RewardKind::BlackSquare), 1);
        assert_eq!(bundle.amount(RewardKind::OrangeTriangle), 0);
        assert!(RewardBundle::NONE.is_empty());
    }
}
