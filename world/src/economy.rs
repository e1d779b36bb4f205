//! Player mana balance gating hero creation.

use siege_lanes_core::SpawnError;

/// Mana balance owned by a single match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ManaPool {
    balance: u32,
}

impl ManaPool {
    pub(crate) const fn new(balance: u32) -> Self {
        Self { balance }
    }

    pub(crate) const fn balance(&self) -> u32 {
        self.balance
    }

    /// Deducts `cost` and returns the new balance, or leaves the pool untouched.
    pub(crate) fn try_spend(&mut self, cost: u32) -> Result<u32, SpawnError> {
        let Some(remaining) = self.balance.checked_sub(cost) else {
            return Err(SpawnError::InsufficientResource {
                required: cost,
                available: self.balance,
            });
        };
        self.balance = remaining;
        Ok(remaining)
    }

    pub(crate) fn credit(&mut self, amount: u32) -> u32 {
        self.balance = self.balance.saturating_add(amount);
        self.balance
    }
}
