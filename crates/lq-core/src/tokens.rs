//! Token pricing and balance arithmetic.
//!
//! These functions never touch storage. Persisted balances are debited with
//! an atomic conditional decrement (`ProfileRepository::try_debit`) so the
//! affordability check and the write cannot race.

use crate::error::TokenError;
use crate::types::{ContentFormat, Tier};

impl Tier {
    pub fn base_cost(self) -> u32 {
        match self {
            Self::Beginner => 200,
            Self::Intermediate => 300,
            Self::Advanced => 400,
        }
    }
}

impl ContentFormat {
    /// Cost multiplier as a `(numerator, denominator)` pair.
    pub fn multiplier(self) -> (u32, u32) {
        match self {
            Self::Short => (1, 1),
            Self::Long => (3, 2),
        }
    }
}

/// `round_half_up(base_cost(tier) * multiplier(format))`.
pub fn quote_cost(tier: Tier, format: ContentFormat) -> u32 {
    let (numerator, denominator) = format.multiplier();
    (tier.base_cost() * numerator + denominator / 2) / denominator
}

pub fn can_afford(balance: u32, cost: u32) -> bool {
    balance >= cost
}

pub fn charge(balance: u32, cost: u32) -> Result<u32, TokenError> {
    balance
        .checked_sub(cost)
        .ok_or(TokenError::InsufficientTokens { balance, cost })
}

pub fn credit(balance: u32, amount: u32) -> Result<u32, TokenError> {
    balance.checked_add(amount).ok_or(TokenError::Overflow)
}
