//! Fee-aware conversion between pool assets and the pool-share token.

use alloy::primitives::U256;

use super::{Direction, Quote};
use crate::{
    fee::FeeSchedule,
    num,
    state::{PoolState, PriceOracle},
    types::Asset,
};

/// Value in USD (at [`num::PRICE_PRECISION`]) of `amount` of a token with
/// `decimals` decimals priced at `price`.
pub fn usd_value(amount: U256, decimals: u8, price: U256) -> U256 {
    num::mul_div(amount, price, num::pow10(decimals))
}

/// Amount of a token with `decimals` decimals worth `usd` at `price`.
pub fn token_amount(usd: U256, decimals: u8, price: U256) -> U256 {
    num::mul_div(usd, num::pow10(decimals), price)
}

/// USD value expressed in pool accounting units.
pub fn usdg_value(usd: U256) -> U256 {
    num::adjust_for_decimals(usd, num::USD_DECIMALS, num::USDG_DECIMALS)
}

/// Converts `amount_in` of `source` into `dest` and deducts the pool fee.
///
/// The input is valued at the source min price and the output is priced at
/// the destination max price. The fee is picked by `schedule` from how the
/// operation shifts the affected asset weights:
///
/// * [`Direction::Mint`] adds `source` to the pool,
/// * [`Direction::Redeem`] removes `dest` from the pool,
/// * [`Direction::Swap`] does both and pays the higher of the two fees.
///
/// Returns [`Quote::ZERO`] for a zero amount or when either asset is not
/// priced. Pool capacity is not checked here, see [`super::check_quote`].
pub fn convert_and_fee<O: PriceOracle + ?Sized>(
    amount_in: U256,
    source: &Asset,
    dest: &Asset,
    pool: &PoolState,
    oracle: &O,
    schedule: &FeeSchedule,
    direction: Direction,
) -> Quote {
    if amount_in.is_zero() {
        return Quote::ZERO;
    }
    let Some((source_price, dest_price)) = conservative_prices(oracle, source, dest) else {
        return Quote::ZERO;
    };

    let usd_in = usd_value(amount_in, source.decimals, source_price);
    let naive_out = token_amount(usd_in, dest.decimals, dest_price);
    let fee_bps = fee_basis_points(pool, schedule, direction, source, dest, usdg_value(usd_in));

    Quote {
        amount: num::apply_fee(naive_out, fee_bps),
        fee_basis_points: Some(fee_bps),
    }
}

/// Amount of `source` to pay for receiving `amount_out` of `dest`.
///
/// Inverse of [`convert_and_fee`] with the same pricing and fee selection.
/// The fee is selected from the usdg value of the input before fees, the
/// same delta the forward conversion uses. Integer truncation may leave the
/// forward conversion of the result a few units short of `amount_out`.
pub fn required_amount_in<O: PriceOracle + ?Sized>(
    amount_out: U256,
    source: &Asset,
    dest: &Asset,
    pool: &PoolState,
    oracle: &O,
    schedule: &FeeSchedule,
    direction: Direction,
) -> Quote {
    if amount_out.is_zero() {
        return Quote::ZERO;
    }
    let Some((source_price, dest_price)) = conservative_prices(oracle, source, dest) else {
        return Quote::ZERO;
    };

    let usd_out = usd_value(amount_out, dest.decimals, dest_price);
    let naive_in = token_amount(usd_out, source.decimals, source_price);
    let usdg_delta = usdg_value(usd_value(naive_in, source.decimals, source_price));
    let fee_bps = fee_basis_points(pool, schedule, direction, source, dest, usdg_delta);

    match num::gross_up_fee(naive_in, fee_bps) {
        Some(amount) => Quote {
            amount,
            fee_basis_points: Some(fee_bps),
        },
        None => Quote::ZERO,
    }
}

/// Fee of an operation moving `usdg_delta` worth of value through the pool.
pub fn fee_basis_points(
    pool: &PoolState,
    schedule: &FeeSchedule,
    direction: Direction,
    source: &Asset,
    dest: &Asset,
    usdg_delta: U256,
) -> u32 {
    let inflow = || schedule.select(&pool.weight_shift(&source.id, usdg_delta, true), true);
    let outflow = || schedule.select(&pool.weight_shift(&dest.id, usdg_delta, false), false);

    match direction {
        Direction::Mint => inflow(),
        Direction::Redeem => outflow(),
        Direction::Swap => inflow().max(outflow()),
    }
}

/// Min price of the asset paid in and max price of the asset paid out.
fn conservative_prices<O: PriceOracle + ?Sized>(
    oracle: &O,
    source: &Asset,
    dest: &Asset,
) -> Option<(U256, U256)> {
    let source_price = oracle.price(&source.id)?.min;
    let dest_price = oracle.price(&dest.id)?.max;
    if source_price.is_zero() || dest_price.is_zero() {
        return None;
    }
    Some((source_price, dest_price))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use alloy::primitives::Address;
    use fastnum::udec256;

    use super::*;
    use crate::{
        num::expand_decimals,
        testing::{PoolBuilder, TokenBuilder},
        types::PricePair,
    };

    const USDC: Address = Address::repeat_byte(1);
    const ETH: Address = Address::repeat_byte(2);

    /// USDC at 40% and ETH at 60% of a 1M USD pool, both targeting 50%.
    fn unbalanced_pool() -> PoolState {
        PoolBuilder::new()
            .token(
                TokenBuilder::new(USDC, "USDC", 6)
                    .stable()
                    .pool_amount(udec256!(400000))
                    .usdg_amount(udec256!(400000))
                    .weight(50_000)
                    .build(),
            )
            .token(
                TokenBuilder::new(ETH, "ETH", 18)
                    .pool_amount(udec256!(300))
                    .usdg_amount(udec256!(600000))
                    .weight(50_000)
                    .price(udec256!(2000))
                    .build(),
            )
            .pool_share(udec256!(1000000), udec256!(1000000))
            .build()
    }

    fn asset(pool: &PoolState, id: Address) -> Asset {
        pool.token(&id).unwrap().asset.clone()
    }

    fn units(n: u64, decimals: u8) -> U256 {
        expand_decimals(U256::from(n), decimals)
    }

    #[test]
    fn test_zero_amount() {
        let pool = unbalanced_pool();
        let quote = convert_and_fee(
            U256::ZERO,
            &asset(&pool, USDC),
            &pool.pool_share().asset,
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Mint,
        );
        assert_eq!(quote, Quote::ZERO);
    }

    #[test]
    fn test_mint_with_underweight_token() {
        let pool = unbalanced_pool();
        let quote = convert_and_fee(
            units(1000, 6),
            &asset(&pool, USDC),
            &pool.pool_share().asset,
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Mint,
        );
        assert_eq!(quote.fee_basis_points, Some(25));
        // 1000 ULP less 0.25%
        assert_eq!(quote.amount, units(9975, 17));
    }

    #[test]
    fn test_mint_with_overweight_token() {
        let pool = unbalanced_pool();
        let quote = convert_and_fee(
            units(1, 18),
            &asset(&pool, ETH),
            &pool.pool_share().asset,
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Mint,
        );
        // 1000 bps above target
        assert_eq!(quote.fee_basis_points, Some(75));
        assert_eq!(quote.amount, units(1985, 18));
    }

    #[test]
    fn test_redeem_underweight_token() {
        let pool = unbalanced_pool();
        let quote = convert_and_fee(
            units(1000, 18),
            &pool.pool_share().asset,
            &asset(&pool, USDC),
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Redeem,
        );
        assert_eq!(quote.fee_basis_points, Some(75));
        assert_eq!(quote.amount, U256::from(992_500_000u64));
    }

    #[test]
    fn test_swap_pays_higher_fee() {
        let pool = unbalanced_pool();
        let quote = convert_and_fee(
            units(1, 18),
            &asset(&pool, ETH),
            &asset(&pool, USDC),
            &pool,
            &pool,
            &FeeSchedule::swap(),
            Direction::Swap,
        );
        assert_eq!(quote.fee_basis_points, Some(80));
        assert_eq!(quote.amount, units(1984, 6));

        // Rebalancing on both sides
        let quote = convert_and_fee(
            units(2000, 6),
            &asset(&pool, USDC),
            &asset(&pool, ETH),
            &pool,
            &pool,
            &FeeSchedule::swap(),
            Direction::Swap,
        );
        assert_eq!(quote.fee_basis_points, Some(30));
        assert_eq!(quote.amount, units(997, 15));
    }

    #[test]
    fn test_conservative_pricing() {
        let pool = unbalanced_pool();
        let share = pool.pool_share().asset.clone();
        let usd = |n: u64| expand_decimals(U256::from(n), num::USD_DECIMALS);
        let oracle = HashMap::from([
            (ETH, PricePair::new(usd(1990), usd(2010))),
            (USDC, PricePair::flat(usd(1))),
            (share.id, PricePair::flat(usd(1))),
        ]);
        let eth = asset(&pool, ETH);

        // Paying in ETH is valued at its min price
        let quote = convert_and_fee(
            units(1, 18),
            &eth,
            &share,
            &pool,
            &oracle,
            &FeeSchedule::zero(),
            Direction::Mint,
        );
        assert_eq!(quote.amount, units(1990, 18));

        // Receiving ETH is priced at its max price
        let quote = convert_and_fee(
            units(2010, 6),
            &asset(&pool, USDC),
            &eth,
            &pool,
            &oracle,
            &FeeSchedule::zero(),
            Direction::Swap,
        );
        assert_eq!(quote.amount, units(1, 18));
        assert_eq!(quote.fee_basis_points, Some(0));
    }

    #[test]
    fn test_unpriced_asset() {
        let pool = unbalanced_pool();
        let unknown = Asset::new(Address::repeat_byte(9), "XYZ", 18);
        let quote = convert_and_fee(
            units(1, 18),
            &unknown,
            &pool.pool_share().asset,
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Mint,
        );
        assert_eq!(quote, Quote::ZERO);

        let oracle = HashMap::from([(unknown.id, PricePair::default())]);
        let quote = convert_and_fee(
            units(1, 18),
            &unknown,
            &unknown,
            &pool,
            &oracle,
            &FeeSchedule::mint_burn(),
            Direction::Swap,
        );
        assert_eq!(quote, Quote::ZERO);
    }

    #[test]
    fn test_priced_asset_outside_pool_pays_tax() {
        let pool = unbalanced_pool();
        let other = Asset::new(Address::repeat_byte(9), "XYZ", 18);
        let oracle = HashMap::from([
            (other.id, PricePair::flat(num::PRICE_PRECISION)),
            (pool.pool_share().asset.id, pool.pool_share_price()),
        ]);
        let quote = convert_and_fee(
            units(10, 18),
            &other,
            &pool.pool_share().asset,
            &pool,
            &oracle,
            &FeeSchedule::mint_burn(),
            Direction::Mint,
        );
        assert_eq!(quote.fee_basis_points, Some(75));
    }

    #[test]
    fn test_required_amount_in() {
        let pool = unbalanced_pool();
        let usdc = asset(&pool, USDC);
        let share = pool.pool_share().asset.clone();

        let quote = required_amount_in(
            units(9975, 17),
            &usdc,
            &share,
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Mint,
        );
        assert_eq!(quote.fee_basis_points, Some(25));
        assert_eq!(quote.amount, units(1000, 6));

        let quote = required_amount_in(
            U256::from(992_500_000u64),
            &share,
            &usdc,
            &pool,
            &pool,
            &FeeSchedule::mint_burn(),
            Direction::Redeem,
        );
        assert_eq!(quote.fee_basis_points, Some(75));
        assert_eq!(quote.amount, units(1000, 18));
    }

    #[test]
    fn test_required_amount_in_swap_fee_follows_input() {
        let pool = unbalanced_pool();
        let (eth, usdc) = (asset(&pool, ETH), asset(&pool, USDC));
        let schedule = FeeSchedule::swap();

        let quote = required_amount_in(
            units(1984, 6),
            &eth,
            &usdc,
            &pool,
            &pool,
            &schedule,
            Direction::Swap,
        );
        assert_eq!(quote.amount, units(1, 18));

        let eth_price = pool.token(&ETH).unwrap().price().min;
        let usdg_delta = usdg_value(usd_value(units(992, 15), eth.decimals, eth_price));
        assert_eq!(
            quote.fee_basis_points,
            Some(fee_basis_points(&pool, &schedule, Direction::Swap, &eth, &usdc, usdg_delta))
        );

        let forward =
            convert_and_fee(quote.amount, &eth, &usdc, &pool, &pool, &schedule, Direction::Swap);
        assert_eq!(forward.fee_basis_points, quote.fee_basis_points);
        assert_eq!(forward.amount, units(1984, 6));
    }

    #[test]
    fn test_required_amount_in_with_full_fee() {
        let pool = unbalanced_pool();
        let quote = required_amount_in(
            units(1, 18),
            &asset(&pool, USDC),
            &pool.pool_share().asset,
            &pool,
            &pool,
            &FeeSchedule::flat(10_000),
            Direction::Mint,
        );
        assert_eq!(quote, Quote::ZERO);
    }
}
