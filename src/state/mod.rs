//! Pool state snapshots.
//!
//! [`PoolState`] is a read-only view of the pool at a single point in time:
//! per-asset [`PoolTokenInfo`] plus the pool-share token supply and value.
//! Calculators take it by reference and never mutate it, so a fresh
//! snapshot is expected for every evaluation.
//!
//! Snapshots can be assembled directly or loaded from JSON with [`Snapshot`].

mod snapshot;

use std::collections::{BTreeMap, HashMap};

use alloy::primitives::U256;

use crate::{
    fee::WeightShift,
    num::{self, BASIS_POINTS_DIVISOR},
    types::{AssetId, PoolShareInfo, PoolTokenInfo, PricePair},
};

pub use snapshot::*;

/// Source of min/max prices for pool assets.
pub trait PriceOracle {
    fn price(&self, asset: &AssetId) -> Option<PricePair>;
}

impl PriceOracle for HashMap<AssetId, PricePair> {
    fn price(&self, asset: &AssetId) -> Option<PricePair> {
        self.get(asset).copied()
    }
}

impl<T: PriceOracle + ?Sized> PriceOracle for &T {
    fn price(&self, asset: &AssetId) -> Option<PricePair> {
        (**self).price(asset)
    }
}

/// Multi-asset pool at a single point in time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PoolState {
    tokens: BTreeMap<AssetId, PoolTokenInfo>,
    pool_share: PoolShareInfo,
}

impl PoolState {
    /// Assemble a pool from per-token state. A later entry for the same asset
    /// replaces an earlier one.
    pub fn new(tokens: impl IntoIterator<Item = PoolTokenInfo>, pool_share: PoolShareInfo) -> Self {
        Self {
            tokens: tokens
                .into_iter()
                .map(|info| (info.asset.id, info))
                .collect(),
            pool_share,
        }
    }

    pub fn token(&self, asset: &AssetId) -> Option<&PoolTokenInfo> {
        self.tokens.get(asset)
    }

    /// Whitelisted tokens ordered by asset ID.
    pub fn tokens(&self) -> impl Iterator<Item = &PoolTokenInfo> {
        self.tokens.values()
    }

    pub fn pool_share(&self) -> &PoolShareInfo {
        &self.pool_share
    }

    pub fn pool_share_price(&self) -> PricePair {
        self.pool_share.price()
    }

    /// Sum of configured token weights.
    pub fn total_token_weights(&self) -> U256 {
        self.tokens
            .values()
            .fold(U256::ZERO, |acc, info| acc.saturating_add(info.weight))
    }

    /// Value of the pool in accounting units.
    pub fn total_usdg_amount(&self) -> U256 {
        self.tokens
            .values()
            .fold(U256::ZERO, |acc, info| acc.saturating_add(info.usdg_amount))
    }

    /// Weight of `asset` before and after adding (`increment`) or removing
    /// `usdg_delta` worth of it.
    ///
    /// Removal is capped at the asset's current accounting amount. The target
    /// is undefined when the asset is not in the pool or no weights are set.
    pub fn weight_shift(&self, asset: &AssetId, usdg_delta: U256, increment: bool) -> WeightShift {
        let Some(info) = self.token(asset) else {
            return WeightShift {
                current_bps: 0,
                target_bps: None,
                next_bps: 0,
            };
        };

        let total_usdg = self.total_usdg_amount();
        let total_weights = self.total_token_weights();
        let divisor = num::bps(BASIS_POINTS_DIVISOR);

        let (next_usdg, next_total_usdg) = if increment {
            (
                info.usdg_amount.saturating_add(usdg_delta),
                total_usdg.saturating_add(usdg_delta),
            )
        } else {
            let removed = usdg_delta.min(info.usdg_amount);
            (info.usdg_amount - removed, total_usdg - removed)
        };

        WeightShift {
            current_bps: num::to_bps(num::mul_div(info.usdg_amount, divisor, total_usdg)),
            target_bps: (!total_weights.is_zero())
                .then(|| num::to_bps(num::mul_div(info.weight, divisor, total_weights))),
            next_bps: num::to_bps(num::mul_div(next_usdg, divisor, next_total_usdg)),
        }
    }
}

impl PriceOracle for PoolState {
    fn price(&self, asset: &AssetId) -> Option<PricePair> {
        if *asset == self.pool_share.asset.id {
            return Some(self.pool_share_price());
        }
        self.token(asset).map(PoolTokenInfo::price)
    }
}
