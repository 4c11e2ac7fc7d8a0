//! Pure calculators.
//!
//! Everything here is stateless and side-effect free: functions take
//! snapshots by reference and return values. Invalid or missing inputs
//! produce zero amounts or `None` rather than errors, so callers have to
//! check results before presenting them.

mod amount;
mod limits;
mod pool_share;
mod vesting;

use alloy::primitives::U256;

pub use amount::*;
pub use limits::*;
pub use pool_share::*;
pub use vesting::*;

/// Kind of pool operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Token in, pool-share token out.
    Mint,
    /// Pool-share token in, token out.
    Redeem,
    /// Token in, another token out.
    Swap,
}

impl Direction {
    pub fn is_mint(&self) -> bool {
        matches!(self, Direction::Mint)
    }

    pub fn is_redeem(&self) -> bool {
        matches!(self, Direction::Redeem)
    }

    pub fn is_swap(&self) -> bool {
        matches!(self, Direction::Swap)
    }
}

/// Calculated amount and the fee applied to it.
#[derive(Clone, Copy, derive_more::Debug, Default, PartialEq, Eq)]
pub struct Quote {
    #[debug("{amount}")]
    pub amount: U256,
    /// `None` when nothing was priced.
    pub fee_basis_points: Option<u32>,
}

impl Quote {
    pub const ZERO: Quote = Quote {
        amount: U256::ZERO,
        fee_basis_points: None,
    };

    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}
