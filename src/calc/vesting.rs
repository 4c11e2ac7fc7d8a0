use alloy::primitives::U256;

use crate::{
    num::{self, BASIS_POINTS_DIVISOR},
    types::VestingAccount,
};

/// Stake requirement of a vesting account before and after a deposit.
///
/// Ratios are staked amount per vestable amount in basis points.
#[derive(Clone, Copy, derive_more::Debug, PartialEq, Eq)]
pub struct VestingProjection {
    #[debug("{max_vestable_amount}")]
    pub max_vestable_amount: U256,
    #[debug("{current_ratio}")]
    pub current_ratio: U256,
    #[debug("{next_max_vestable_amount}")]
    pub next_max_vestable_amount: U256,
    #[debug("{next_ratio}")]
    pub next_ratio: U256,
    /// Staked amount backing the current vestable amount. Display only.
    #[debug("{initial_staking_amount}")]
    pub initial_staking_amount: U256,
    /// Staked amount backing the vestable amount after the deposit. Display only.
    #[debug("{next_staking_amount}")]
    pub next_staking_amount: U256,
}

/// Projects the staked-to-vestable ratio after depositing `deposit_amount`.
///
/// Returns `None` for a zero deposit or a missing account.
///
/// The combined average staked amount is recomputed from the own and
/// transferred components, weighted by their cumulative rewards:
///
/// ```text
/// total = cumulative_reward + transferred_cumulative_reward
/// if combined < total * min_ratio:
///     transferred_average = total * min_ratio
/// next_combined = average * cumulative_reward / total
///               + transferred_average * transferred_cumulative_reward / total
/// ```
///
/// Every product is taken before its division and each term truncates on
/// its own, matching the vault contract's arithmetic.
pub fn project_vesting_state(
    min_ratio: U256,
    deposit_amount: U256,
    account: Option<&VestingAccount>,
) -> Option<VestingProjection> {
    let account = account?;
    if deposit_amount.is_zero() {
        return None;
    }

    let divisor = num::bps(BASIS_POINTS_DIVISOR);
    let max_vestable_amount = account.max_vestable_amount;
    let next_max_vestable_amount = max_vestable_amount.saturating_add(deposit_amount);

    let current_ratio = num::mul_div(
        account.combined_average_staked_amount,
        divisor,
        max_vestable_amount,
    );
    let next_ratio = num::mul_div(
        next_combined_average_staked_amount(min_ratio, account),
        divisor,
        next_max_vestable_amount,
    );

    Some(VestingProjection {
        max_vestable_amount,
        current_ratio,
        next_max_vestable_amount,
        next_ratio,
        initial_staking_amount: num::mul_div(current_ratio, max_vestable_amount, divisor),
        next_staking_amount: num::mul_div(next_ratio, next_max_vestable_amount, divisor),
    })
}

fn next_combined_average_staked_amount(min_ratio: U256, account: &VestingAccount) -> U256 {
    let total = account.total_cumulative_reward();
    let floor = total.saturating_mul(min_ratio);

    let transferred_average = if account.combined_average_staked_amount < floor {
        floor
    } else {
        account.transferred_average_staked_amount
    };

    num::mul_div(account.average_staked_amount, account.cumulative_reward, total).saturating_add(
        num::mul_div(transferred_average, account.transferred_cumulative_reward, total),
    )
}

/// Staked tokens the vault reserves for a deposit.
#[derive(Clone, Copy, derive_more::Debug, PartialEq, Eq)]
pub struct ReserveRequirement {
    /// Reserve after the deposit.
    #[debug("{next_reserve_amount}")]
    pub next_reserve_amount: U256,
    /// Stake to reserve on top of the current pair amount.
    #[debug("{additional_reserve_amount}")]
    pub additional_reserve_amount: U256,
    /// The deposit is larger than the remaining vestable amount.
    pub exceeds_remaining: bool,
}

/// Reserve needed to deposit `deposit_amount` into a vesting vault.
///
/// The reserve scales with the deposited share of the vestable amount:
/// `(vested + deposit) * combined_average / max_vestable`. Accounts with
/// nothing vestable keep their current reserve.
pub fn reserve_requirement(
    deposit_amount: U256,
    account: Option<&VestingAccount>,
) -> Option<ReserveRequirement> {
    let account = account?;
    if deposit_amount.is_zero() {
        return None;
    }

    let next_reserve_amount = if account.max_vestable_amount.is_zero() {
        account.pair_amount
    } else {
        num::mul_div(
            account.vested_amount.saturating_add(deposit_amount),
            account.combined_average_staked_amount,
            account.max_vestable_amount,
        )
    };

    Some(ReserveRequirement {
        next_reserve_amount,
        additional_reserve_amount: next_reserve_amount.saturating_sub(account.pair_amount),
        exceeds_remaining: deposit_amount > account.remaining_vestable_amount(),
    })
}
