use alloy::primitives::U256;

use super::{Direction, Quote, usd_value, usdg_value};
use crate::{
    state::{PoolState, PriceOracle},
    types::{Asset, AssetId, PoolTokenInfo},
};

/// Pool constraint a quoted operation would break.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LimitViolation {
    #[error("{0} is not in the pool")]
    UnknownAsset(AssetId),
    #[error("max capacity of {symbol} reached")]
    MaxCapacityReached { symbol: String },
    #[error("insufficient {symbol} liquidity: {requested} requested, {available} available")]
    InsufficientLiquidity {
        symbol: String,
        requested: U256,
        available: U256,
    },
}

/// Checks that adding `usdg_delta` keeps `info` within its capacity.
/// A zero capacity means uncapped.
pub fn check_inflow(info: &PoolTokenInfo, usdg_delta: U256) -> Result<(), LimitViolation> {
    if info.is_capped() && info.usdg_amount.saturating_add(usdg_delta) > info.max_usdg_amount {
        return Err(LimitViolation::MaxCapacityReached {
            symbol: info.asset.symbol.clone(),
        });
    }
    Ok(())
}

/// Checks that `amount_out` of `info` can be paid out of unreserved liquidity.
pub fn check_outflow(info: &PoolTokenInfo, amount_out: U256) -> Result<(), LimitViolation> {
    if amount_out > info.available_amount {
        return Err(LimitViolation::InsufficientLiquidity {
            symbol: info.asset.symbol.clone(),
            requested: amount_out,
            available: info.available_amount,
        });
    }
    Ok(())
}

/// Checks a quote produced for `amount_in` of `source` against pool limits.
///
/// Mints are checked against the source capacity, redeems against the
/// destination liquidity and swaps against both. The pool-share token side
/// of a mint or redeem is not checked.
pub fn check_quote(
    pool: &PoolState,
    direction: Direction,
    source: &Asset,
    dest: &Asset,
    amount_in: U256,
    quote: &Quote,
) -> Result<(), LimitViolation> {
    let token = |asset: &Asset| pool.token(&asset.id).ok_or(LimitViolation::UnknownAsset(asset.id));

    if !direction.is_redeem() {
        let info = token(source)?;
        let price = pool.price(&source.id).map(|p| p.min).unwrap_or_default();
        check_inflow(info, usdg_value(usd_value(amount_in, source.decimals, price)))?;
    }
    if !direction.is_mint() {
        check_outflow(token(dest)?, quote.amount)?;
    }
    Ok(())
}
