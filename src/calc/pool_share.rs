//! Quotes for buying, selling and swapping through the pool, priced from the
//! pool snapshot itself.

use alloy::primitives::U256;

use super::{Direction, Quote, convert_and_fee, required_amount_in};
use crate::{
    fee::{FeeSchedule, FeeSchedules},
    state::PoolState,
    types::{Asset, AssetId},
};

/// Pool-share tokens received for paying `amount_in` of `token`.
pub fn buy_pool_share_to_amount(
    amount_in: U256,
    token: &AssetId,
    pool: &PoolState,
    schedules: &FeeSchedules,
) -> Quote {
    let share = &pool.pool_share().asset.id;
    let Some((source, dest, schedule)) =
        resolve(pool, schedules, Direction::Mint, token, share)
    else {
        return Quote::ZERO;
    };
    convert_and_fee(amount_in, source, dest, pool, pool, schedule, Direction::Mint)
}

/// Amount of `token` to pay for receiving `share_amount` pool-share tokens.
pub fn buy_pool_share_from_amount(
    share_amount: U256,
    token: &AssetId,
    pool: &PoolState,
    schedules: &FeeSchedules,
) -> Quote {
    let share = &pool.pool_share().asset.id;
    let Some((source, dest, schedule)) =
        resolve(pool, schedules, Direction::Mint, token, share)
    else {
        return Quote::ZERO;
    };
    required_amount_in(share_amount, source, dest, pool, pool, schedule, Direction::Mint)
}

/// Amount of `token` received for redeeming `share_amount` pool-share tokens.
pub fn sell_pool_share_to_amount(
    share_amount: U256,
    token: &AssetId,
    pool: &PoolState,
    schedules: &FeeSchedules,
) -> Quote {
    let share = &pool.pool_share().asset.id;
    let Some((source, dest, schedule)) =
        resolve(pool, schedules, Direction::Redeem, share, token)
    else {
        return Quote::ZERO;
    };
    convert_and_fee(share_amount, source, dest, pool, pool, schedule, Direction::Redeem)
}

/// Pool-share tokens to redeem for receiving `amount_out` of `token`.
pub fn sell_pool_share_from_amount(
    amount_out: U256,
    token: &AssetId,
    pool: &PoolState,
    schedules: &FeeSchedules,
) -> Quote {
    let share = &pool.pool_share().asset.id;
    let Some((source, dest, schedule)) =
        resolve(pool, schedules, Direction::Redeem, share, token)
    else {
        return Quote::ZERO;
    };
    required_amount_in(amount_out, source, dest, pool, pool, schedule, Direction::Redeem)
}

/// Amount of `to` received for swapping `amount_in` of `from`.
pub fn swap_to_amount(
    amount_in: U256,
    from: &AssetId,
    to: &AssetId,
    pool: &PoolState,
    schedules: &FeeSchedules,
) -> Quote {
    let Some((source, dest, schedule)) = resolve(pool, schedules, Direction::Swap, from, to) else {
        return Quote::ZERO;
    };
    convert_and_fee(amount_in, source, dest, pool, pool, schedule, Direction::Swap)
}

/// Amount of `from` to swap for receiving `amount_out` of `to`.
pub fn swap_from_amount(
    amount_out: U256,
    from: &AssetId,
    to: &AssetId,
    pool: &PoolState,
    schedules: &FeeSchedules,
) -> Quote {
    let Some((source, dest, schedule)) = resolve(pool, schedules, Direction::Swap, from, to) else {
        return Quote::ZERO;
    };
    required_amount_in(amount_out, source, dest, pool, pool, schedule, Direction::Swap)
}

/// Looks up both assets in `pool` and the schedule for the operation.
///
/// Same-asset operations, assets outside the pool and swaps involving the
/// pool-share token resolve to `None`.
fn resolve<'a>(
    pool: &'a PoolState,
    schedules: &'a FeeSchedules,
    direction: Direction,
    source: &AssetId,
    dest: &AssetId,
) -> Option<(&'a Asset, &'a Asset, &'a FeeSchedule)> {
    if source == dest {
        return None;
    }
    let share = &pool.pool_share().asset;
    let asset = |id: &AssetId| {
        if *id == share.id {
            (!direction.is_swap()).then_some(share)
        } else {
            pool.token(id).map(|info| &info.asset)
        }
    };
    let (source, dest) = (asset(source)?, asset(dest)?);
    Some((source, dest, schedules.for_operation(direction, source, dest)))
}
