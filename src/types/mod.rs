mod pool;
mod vesting;

pub use pool::{PoolShareInfo, PoolTokenInfo};
pub use vesting::{VaultKind, VestingAccount};

use alloy::primitives::{Address, U256};

/// Identifier of a pool asset: the address of its token contract.
pub type AssetId = Address;

/// Token reference data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Asset {
    pub id: AssetId,
    pub symbol: String,
    pub decimals: u8,
    pub is_stable: bool,
    pub is_native: bool,
    pub is_wrapped: bool,
}

impl Asset {
    pub fn new(id: AssetId, symbol: impl Into<String>, decimals: u8) -> Self {
        Self {
            id,
            symbol: symbol.into(),
            decimals,
            is_stable: false,
            is_native: false,
            is_wrapped: false,
        }
    }

    pub fn stable(mut self) -> Self {
        self.is_stable = true;
        self
    }

    pub fn native(mut self) -> Self {
        self.is_native = true;
        self
    }

    pub fn wrapped(mut self) -> Self {
        self.is_wrapped = true;
        self
    }
}

/// Oracle price bounds in USD per whole token, scaled by [`crate::num::PRICE_PRECISION`].
///
/// Amounts paid into the pool are valued at `min`, amounts paid out at `max`.
#[derive(Clone, Copy, derive_more::Debug, Default, PartialEq, Eq)]
pub struct PricePair {
    #[debug("{min}")]
    pub min: U256,
    #[debug("{max}")]
    pub max: U256,
}

impl PricePair {
    pub fn new(min: U256, max: U256) -> Self {
        Self { min, max }
    }

    /// Same price on both sides.
    pub fn flat(price: U256) -> Self {
        Self {
            min: price,
            max: price,
        }
    }
}
