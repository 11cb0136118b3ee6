//! Escrow account — vendor funds backing bounty rewards
//!
//! Tracks the actual held funds (`total_balance`) and the portion not
//! reserved for outstanding bounties (`free_balance`). The pair is the
//! single authoritative counter for reservations: it is mutated only by
//! the five operations below, never recomputed from reward records.
//!
//! Invariant: `0 <= free_balance <= total_balance`.

use rust_decimal::Decimal;

use crate::errors::EscrowError;

/// Per-vendor escrow balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EscrowAccount {
    total_balance: Decimal,
    free_balance: Decimal,
}

impl EscrowAccount {
    pub fn new() -> Self {
        Self {
            total_balance: Decimal::ZERO,
            free_balance: Decimal::ZERO,
        }
    }

    /// Credit inbound vendor funding.
    pub fn fund(&mut self, amount: Decimal) -> Result<(), EscrowError> {
        if amount <= Decimal::ZERO {
            return Err(EscrowError::InvalidAmount);
        }
        let new_total = self
            .total_balance
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        let new_free = self
            .free_balance
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        self.total_balance = new_total;
        self.free_balance = new_free;
        Ok(())
    }

    /// Reserve funds for a promised bounty.
    pub fn reserve(&mut self, amount: Decimal) -> Result<(), EscrowError> {
        if amount <= Decimal::ZERO {
            return Err(EscrowError::InvalidAmount);
        }
        if amount > self.free_balance {
            return Err(EscrowError::InsufficientFunds {
                requested: amount.to_string(),
                available: self.free_balance.to_string(),
            });
        }
        self.free_balance -= amount;
        Ok(())
    }

    /// Release a reservation back to the free balance (bounty canceled).
    pub fn release(&mut self, amount: Decimal) -> Result<(), EscrowError> {
        let new_free = self
            .free_balance
            .checked_add(amount)
            .ok_or(EscrowError::Overflow)?;
        if new_free > self.total_balance {
            return Err(EscrowError::Overflow);
        }
        self.free_balance = new_free;
        Ok(())
    }

    /// Pay out a previously reserved bounty; the free balance already
    /// reflects the reservation, so only the total decreases.
    pub fn pay_out(&mut self, amount: Decimal) -> Result<(), EscrowError> {
        let reserved = self.total_balance - self.free_balance;
        if amount > reserved {
            return Err(EscrowError::InsufficientFunds {
                requested: amount.to_string(),
                available: reserved.to_string(),
            });
        }
        self.total_balance -= amount;
        Ok(())
    }

    /// Withdraw free funds back to the vendor.
    pub fn withdraw(&mut self, amount: Decimal) -> Result<(), EscrowError> {
        if amount <= Decimal::ZERO {
            return Err(EscrowError::InvalidAmount);
        }
        if amount > self.free_balance {
            return Err(EscrowError::InsufficientFunds {
                requested: amount.to_string(),
                available: self.free_balance.to_string(),
            });
        }
        self.total_balance -= amount;
        self.free_balance -= amount;
        Ok(())
    }

    pub fn total(&self) -> Decimal {
        self.total_balance
    }

    pub fn free(&self) -> Decimal {
        self.free_balance
    }

    /// Check the balance invariant.
    pub fn check_invariant(&self) -> bool {
        self.free_balance >= Decimal::ZERO && self.free_balance <= self.total_balance
    }
}

impl Default for EscrowAccount {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn funded(amount: i64) -> EscrowAccount {
        let mut escrow = EscrowAccount::new();
        escrow.fund(Decimal::from(amount)).unwrap();
        escrow
    }

    #[test]
    fn test_fund_credits_both_balances() {
        let escrow = funded(5);
        assert_eq!(escrow.total(), Decimal::from(5));
        assert_eq!(escrow.free(), Decimal::from(5));
        assert!(escrow.check_invariant());
    }

    #[test]
    fn test_fund_rejects_non_positive() {
        let mut escrow = EscrowAccount::new();
        assert_eq!(escrow.fund(Decimal::ZERO), Err(EscrowError::InvalidAmount));
        assert_eq!(
            escrow.fund(Decimal::from(-1)),
            Err(EscrowError::InvalidAmount)
        );
    }

    #[test]
    fn test_reserve_decrements_free_only() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::ONE).unwrap();
        assert_eq!(escrow.total(), Decimal::from(5));
        assert_eq!(escrow.free(), Decimal::from(4));
        assert!(escrow.check_invariant());
    }

    #[test]
    fn test_reserve_beyond_free_rejected() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::from(4)).unwrap();
        let result = escrow.reserve(Decimal::from(2));
        assert!(matches!(result, Err(EscrowError::InsufficientFunds { .. })));
        // Failed call left the balances untouched
        assert_eq!(escrow.free(), Decimal::ONE);
    }

    #[test]
    fn test_release_returns_reservation() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::from(2)).unwrap();
        escrow.release(Decimal::from(2)).unwrap();
        assert_eq!(escrow.free(), Decimal::from(5));
        assert_eq!(escrow.total(), Decimal::from(5));
    }

    #[test]
    fn test_release_beyond_total_rejected() {
        let mut escrow = funded(5);
        let result = escrow.release(Decimal::ONE);
        assert_eq!(result, Err(EscrowError::Overflow));
    }

    #[test]
    fn test_pay_out_decrements_total_only() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::ONE).unwrap();
        escrow.pay_out(Decimal::ONE).unwrap();
        assert_eq!(escrow.total(), Decimal::from(4));
        assert_eq!(escrow.free(), Decimal::from(4));
        assert!(escrow.check_invariant());
    }

    #[test]
    fn test_pay_out_beyond_reservation_rejected() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::ONE).unwrap();
        let result = escrow.pay_out(Decimal::from(2));
        assert!(matches!(result, Err(EscrowError::InsufficientFunds { .. })));
    }

    #[test]
    fn test_withdraw_decrements_both() {
        let mut escrow = funded(5);
        escrow.withdraw(Decimal::from(2)).unwrap();
        assert_eq!(escrow.total(), Decimal::from(3));
        assert_eq!(escrow.free(), Decimal::from(3));
    }

    #[test]
    fn test_withdraw_bounded_by_free() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::ONE).unwrap();
        // 4 free, 5 total: withdrawing 5 must fail
        let result = escrow.withdraw(Decimal::from(5));
        assert!(matches!(result, Err(EscrowError::InsufficientFunds { .. })));
        assert_eq!(escrow.total(), Decimal::from(5));
        assert_eq!(escrow.free(), Decimal::from(4));
    }

    #[test]
    fn test_reserve_release_round_trip() {
        let mut escrow = funded(5);
        escrow.reserve(Decimal::ONE).unwrap();
        escrow.release(Decimal::ONE).unwrap();
        assert_eq!(escrow.total(), Decimal::from(5));
        assert_eq!(escrow.free(), Decimal::from(5));
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        fn amount() -> impl Strategy<Value = Decimal> {
            (1u64..=1_000_000u64).prop_map(Decimal::from)
        }

        proptest! {
            /// The invariant 0 <= free <= total holds under any sequence
            /// of fund/reserve/release/pay_out/withdraw calls, successful
            /// or not.
            #[test]
            fn fuzz_invariant_holds(ops in prop::collection::vec((0u8..5, amount()), 1..40)) {
                let mut escrow = EscrowAccount::new();
                let mut reserved = Decimal::ZERO;

                for (op, amount) in ops {
                    match op {
                        0 => { let _ = escrow.fund(amount); }
                        1 => {
                            if escrow.reserve(amount).is_ok() {
                                reserved += amount;
                            }
                        }
                        2 => {
                            // Only release what is actually reserved
                            if amount <= reserved && escrow.release(amount).is_ok() {
                                reserved -= amount;
                            }
                        }
                        3 => {
                            if amount <= reserved && escrow.pay_out(amount).is_ok() {
                                reserved -= amount;
                            }
                        }
                        _ => { let _ = escrow.withdraw(amount); }
                    }
                    prop_assert!(escrow.check_invariant());
                    prop_assert_eq!(escrow.total() - escrow.free(), reserved);
                }
            }

            /// Funding then withdrawing the same amount is a no-op.
            #[test]
            fn fuzz_fund_withdraw_round_trip(amount in amount()) {
                let mut escrow = EscrowAccount::new();
                escrow.fund(amount).unwrap();
                escrow.withdraw(amount).unwrap();
                prop_assert_eq!(escrow.total(), Decimal::ZERO);
                prop_assert_eq!(escrow.free(), Decimal::ZERO);
            }
        }
    }
}
