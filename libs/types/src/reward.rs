//! Bounty reward sub-record
//!
//! One reward per vulnerability. The amount is escrowed (reserved in the
//! vendor escrow account) while the state is SET and becomes zero again
//! once the reward is canceled or sent.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Lifecycle state of a bounty reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RewardState {
    /// No bounty promised yet
    Null,
    /// Bounty promised and reserved in escrow
    Set,
    /// Reservation released without payment
    Canceled,
    /// Bounty paid to the expert
    Sent,
}

/// Bounty attached to a vulnerability.
///
/// Invariant: `amount > 0` iff `state == Set`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub state: RewardState,
    pub amount: Decimal,
}

impl Reward {
    pub fn new() -> Self {
        Self {
            state: RewardState::Null,
            amount: Decimal::ZERO,
        }
    }

    /// Promise a bounty of `amount`.
    pub fn set(&mut self, amount: Decimal) {
        self.state = RewardState::Set;
        self.amount = amount;
    }

    /// Cancel the promised bounty; returns the released amount.
    pub fn cancel(&mut self) -> Decimal {
        let released = self.amount;
        self.state = RewardState::Canceled;
        self.amount = Decimal::ZERO;
        released
    }

    /// Mark the bounty as paid; returns the paid amount.
    pub fn mark_sent(&mut self) -> Decimal {
        let paid = self.amount;
        self.state = RewardState::Sent;
        self.amount = Decimal::ZERO;
        paid
    }

    /// Check the reward invariant: a positive amount only while SET.
    pub fn check_invariant(&self) -> bool {
        match self.state {
            RewardState::Set => self.amount > Decimal::ZERO,
            _ => self.amount == Decimal::ZERO,
        }
    }

    pub fn is_set(&self) -> bool {
        self.state == RewardState::Set
    }
}

impl Default for Reward {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_reward_is_null() {
        let reward = Reward::new();
        assert_eq!(reward.state, RewardState::Null);
        assert_eq!(reward.amount, Decimal::ZERO);
        assert!(reward.check_invariant());
    }

    #[test]
    fn test_set_reward() {
        let mut reward = Reward::new();
        reward.set(Decimal::ONE);
        assert_eq!(reward.state, RewardState::Set);
        assert_eq!(reward.amount, Decimal::ONE);
        assert!(reward.is_set());
        assert!(reward.check_invariant());
    }

    #[test]
    fn test_cancel_resets_amount() {
        let mut reward = Reward::new();
        reward.set(Decimal::from(5));
        let released = reward.cancel();
        assert_eq!(released, Decimal::from(5));
        assert_eq!(reward.state, RewardState::Canceled);
        assert_eq!(reward.amount, Decimal::ZERO);
        assert!(reward.check_invariant());
    }

    #[test]
    fn test_mark_sent_resets_amount() {
        let mut reward = Reward::new();
        reward.set(Decimal::from(3));
        let paid = reward.mark_sent();
        assert_eq!(paid, Decimal::from(3));
        assert_eq!(reward.state, RewardState::Sent);
        assert_eq!(reward.amount, Decimal::ZERO);
        assert!(reward.check_invariant());
    }

    #[test]
    fn test_serialization_uppercase_states() {
        let mut reward = Reward::new();
        reward.set(Decimal::ONE);
        let json = serde_json::to_string(&reward).unwrap();
        assert!(json.contains("\"SET\""));
        let deserialized: Reward = serde_json::from_str(&json).unwrap();
        assert_eq!(reward, deserialized);
    }
}
