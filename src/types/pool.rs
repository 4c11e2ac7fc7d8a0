use alloy::primitives::U256;

use super::{Asset, PricePair};
use crate::num;

/// Pool state of a single whitelisted asset.
///
/// `usdg_amount` and `max_usdg_amount` are in the pool USD accounting unit
/// ([`num::USDG_DECIMALS`]), the other amounts in token units.
#[derive(Clone, derive_more::Debug, PartialEq, Eq)]
pub struct PoolTokenInfo {
    pub asset: Asset,
    #[debug("{pool_amount}")]
    pub pool_amount: U256,
    #[debug("{usdg_amount}")]
    pub usdg_amount: U256,
    #[debug("{weight}")]
    pub weight: U256,
    /// Capacity in accounting units, zero when uncapped.
    #[debug("{max_usdg_amount}")]
    pub max_usdg_amount: U256,
    /// Part of `pool_amount` not reserved for open positions.
    #[debug("{available_amount}")]
    pub available_amount: U256,
    #[debug("{min_price}")]
    pub min_price: U256,
    #[debug("{max_price}")]
    pub max_price: U256,
}

impl PoolTokenInfo {
    pub fn price(&self) -> PricePair {
        PricePair::new(self.min_price, self.max_price)
    }

    pub fn is_capped(&self) -> bool {
        !self.max_usdg_amount.is_zero()
    }
}

/// Pool-share token supply and the value of the assets backing it.
#[derive(Clone, derive_more::Debug, PartialEq, Eq)]
pub struct PoolShareInfo {
    pub asset: Asset,
    #[debug("{supply}")]
    pub supply: U256,
    /// Assets under management valued at min prices.
    #[debug("{aum_min}")]
    pub aum_min: U256,
    /// Assets under management valued at max prices.
    #[debug("{aum_max}")]
    pub aum_max: U256,
}

impl PoolShareInfo {
    /// Price of one pool-share token.
    ///
    /// Quoted at exactly one USD until the pool holds value and has supply.
    pub fn price(&self) -> PricePair {
        PricePair::new(self.price_from_aum(self.aum_min), self.price_from_aum(self.aum_max))
    }

    fn price_from_aum(&self, aum: U256) -> U256 {
        if aum.is_zero() || self.supply.is_zero() {
            return num::PRICE_PRECISION;
        }
        num::mul_div(aum, num::pow10(self.asset.decimals), self.supply)
    }
}
