//! Test fixtures.
//!
//! [`TokenBuilder`] and [`PoolBuilder`] assemble [`PoolState`] snapshots from
//! human-readable decimals, converting them to the fixed-point representation
//! used by the calculators. [`VestingAccountBuilder`] does the same for
//! [`VestingAccount`] using raw integer amounts.
//!
//! ```
//! use alloy::primitives::Address;
//! use fastnum::udec256;
//! use ulp_sdk::testing::{PoolBuilder, TokenBuilder};
//!
//! let pool = PoolBuilder::new()
//!     .token(
//!         TokenBuilder::new(Address::repeat_byte(1), "USDC", 6)
//!             .stable()
//!             .pool_amount(udec256!(1000000))
//!             .usdg_amount(udec256!(1000000))
//!             .weight(50_000)
//!             .build(),
//!     )
//!     .pool_share(udec256!(1000000), udec256!(1000000))
//!     .build();
//! assert_eq!(pool.tokens().count(), 1);
//! ```

use alloy::primitives::{Address, U256};
use fastnum::UD256;

use crate::{
    num::{self, Converter},
    state::PoolState,
    types::{Asset, PoolShareInfo, PoolTokenInfo, VestingAccount},
};

/// Address of the pool-share token in fixtures.
pub const POOL_SHARE_ID: Address = Address::repeat_byte(0xee);

/// Builder for [`PoolTokenInfo`] with amounts given as decimals.
#[derive(Clone, Debug)]
pub struct TokenBuilder {
    asset: Asset,
    pool_amount: U256,
    usdg_amount: U256,
    weight: U256,
    max_usdg_amount: U256,
    available_amount: Option<U256>,
    min_price: U256,
    max_price: U256,
}

impl TokenBuilder {
    /// New token priced at one USD with an empty pool.
    pub fn new(id: Address, symbol: &str, decimals: u8) -> Self {
        Self {
            asset: Asset::new(id, symbol, decimals),
            pool_amount: U256::ZERO,
            usdg_amount: U256::ZERO,
            weight: U256::ZERO,
            max_usdg_amount: U256::ZERO,
            available_amount: None,
            min_price: num::PRICE_PRECISION,
            max_price: num::PRICE_PRECISION,
        }
    }

    pub fn stable(mut self) -> Self {
        self.asset = self.asset.stable();
        self
    }

    /// Set the pooled amount in whole tokens.
    pub fn pool_amount(mut self, amount: UD256) -> Self {
        self.pool_amount = Converter::new(self.asset.decimals).to_unsigned(amount);
        self
    }

    /// Set the accounting amount in USD.
    pub fn usdg_amount(mut self, amount: UD256) -> Self {
        self.usdg_amount = Converter::new(num::USDG_DECIMALS).to_unsigned(amount);
        self
    }

    pub fn weight(mut self, weight: u64) -> Self {
        self.weight = U256::from(weight);
        self
    }

    /// Set the capacity in USD.
    pub fn max_usdg_amount(mut self, amount: UD256) -> Self {
        self.max_usdg_amount = Converter::new(num::USDG_DECIMALS).to_unsigned(amount);
        self
    }

    /// Set the unreserved amount in whole tokens. Defaults to the pooled amount.
    pub fn available_amount(mut self, amount: UD256) -> Self {
        self.available_amount = Some(Converter::new(self.asset.decimals).to_unsigned(amount));
        self
    }

    /// Set both min and max price in USD.
    pub fn price(self, price: UD256) -> Self {
        self.prices(price, price)
    }

    /// Set min and max price in USD.
    pub fn prices(mut self, min: UD256, max: UD256) -> Self {
        let converter = Converter::new(num::USD_DECIMALS);
        self.min_price = converter.to_unsigned(min);
        self.max_price = converter.to_unsigned(max);
        self
    }

    pub fn build(self) -> PoolTokenInfo {
        PoolTokenInfo {
            asset: self.asset,
            pool_amount: self.pool_amount,
            usdg_amount: self.usdg_amount,
            weight: self.weight,
            max_usdg_amount: self.max_usdg_amount,
            available_amount: self.available_amount.unwrap_or(self.pool_amount),
            min_price: self.min_price,
            max_price: self.max_price,
        }
    }
}

/// Builder for [`PoolState`].
#[derive(Clone, Debug)]
pub struct PoolBuilder {
    tokens: Vec<PoolTokenInfo>,
    pool_share: PoolShareInfo,
}

impl Default for PoolBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolBuilder {
    /// Empty pool with no pool-share supply.
    pub fn new() -> Self {
        Self {
            tokens: vec![],
            pool_share: PoolShareInfo {
                asset: Asset::new(POOL_SHARE_ID, "ULP", num::POOL_SHARE_DECIMALS),
                supply: U256::ZERO,
                aum_min: U256::ZERO,
                aum_max: U256::ZERO,
            },
        }
    }

    pub fn token(mut self, info: PoolTokenInfo) -> Self {
        self.tokens.push(info);
        self
    }

    /// Set pool-share supply in whole tokens and AUM in USD.
    pub fn pool_share(self, supply: UD256, aum: UD256) -> Self {
        self.pool_share_range(supply, aum, aum)
    }

    /// Set pool-share supply in whole tokens and the min/max AUM in USD.
    pub fn pool_share_range(mut self, supply: UD256, aum_min: UD256, aum_max: UD256) -> Self {
        let usd = Converter::new(num::USD_DECIMALS);
        self.pool_share.supply = Converter::new(num::POOL_SHARE_DECIMALS).to_unsigned(supply);
        self.pool_share.aum_min = usd.to_unsigned(aum_min);
        self.pool_share.aum_max = usd.to_unsigned(aum_max);
        self
    }

    pub fn build(self) -> PoolState {
        PoolState::new(self.tokens, self.pool_share)
    }
}

/// Builder for [`VestingAccount`] with raw integer amounts.
///
/// `combined_average_staked_amount` defaults to the reward-weighted blend of
/// the own and transferred average staked amounts.
#[derive(Clone, Debug, Default)]
pub struct VestingAccountBuilder {
    account: VestingAccount,
    combined_average_staked_amount: Option<U256>,
}

impl VestingAccountBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cumulative_reward(mut self, amount: u128) -> Self {
        self.account.cumulative_reward = U256::from(amount);
        self
    }

    pub fn transferred_cumulative_reward(mut self, amount: u128) -> Self {
        self.account.transferred_cumulative_reward = U256::from(amount);
        self
    }

    pub fn average_staked_amount(mut self, amount: u128) -> Self {
        self.account.average_staked_amount = U256::from(amount);
        self
    }

    pub fn transferred_average_staked_amount(mut self, amount: u128) -> Self {
        self.account.transferred_average_staked_amount = U256::from(amount);
        self
    }

    pub fn combined_average_staked_amount(mut self, amount: u128) -> Self {
        self.combined_average_staked_amount = Some(U256::from(amount));
        self
    }

    pub fn pair_amount(mut self, amount: u128) -> Self {
        self.account.pair_amount = U256::from(amount);
        self
    }

    pub fn vested_amount(mut self, amount: u128) -> Self {
        self.account.vested_amount = U256::from(amount);
        self
    }

    pub fn max_vestable_amount(mut self, amount: u128) -> Self {
        self.account.max_vestable_amount = U256::from(amount);
        self
    }

    pub fn build(self) -> VestingAccount {
        let mut account = self.account;
        account.combined_average_staked_amount = self
            .combined_average_staked_amount
            .unwrap_or_else(|| account.blended_average_staked_amount());
        account
    }
}
