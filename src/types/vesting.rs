use alloy::primitives::U256;

use crate::num;

/// Vesting vault flavour.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VaultKind {
    /// Vault vesting rewards earned by staking the primary token.
    Primary,
    /// Vault vesting rewards earned by holding the pool-share token.
    PoolShare,
}

impl VaultKind {
    /// Minimum staked-to-reward ratio the vault enforces on transferred rewards.
    pub fn min_ratio(&self) -> U256 {
        match self {
            VaultKind::Primary => U256::from(4),
            VaultKind::PoolShare => U256::from(320),
        }
    }
}

/// Snapshot of an account in a vesting vault.
///
/// Maintained by the vault contract; consumers only read it.
#[derive(Clone, derive_more::Debug, Default, PartialEq, Eq)]
pub struct VestingAccount {
    /// Rewards accumulated by the account's own stake.
    #[debug("{cumulative_reward}")]
    pub cumulative_reward: U256,
    /// Rewards carried over from transferred accounts.
    #[debug("{transferred_cumulative_reward}")]
    pub transferred_cumulative_reward: U256,
    #[debug("{average_staked_amount}")]
    pub average_staked_amount: U256,
    #[debug("{transferred_average_staked_amount}")]
    pub transferred_average_staked_amount: U256,
    /// Reward-weighted blend of the two average staked amounts.
    #[debug("{combined_average_staked_amount}")]
    pub combined_average_staked_amount: U256,
    /// Staked tokens reserved by the vault against deposits.
    #[debug("{pair_amount}")]
    pub pair_amount: U256,
    /// Escrowed tokens already deposited for vesting.
    #[debug("{vested_amount}")]
    pub vested_amount: U256,
    #[debug("{max_vestable_amount}")]
    pub max_vestable_amount: U256,
}

impl VestingAccount {
    /// Own and transferred cumulative rewards.
    pub fn total_cumulative_reward(&self) -> U256 {
        self.cumulative_reward
            .saturating_add(self.transferred_cumulative_reward)
    }

    /// Average staked amounts blended by each component's share of the total
    /// cumulative reward, zero when no reward accumulated yet.
    pub fn blended_average_staked_amount(&self) -> U256 {
        let total = self.total_cumulative_reward();
        num::mul_div(self.average_staked_amount, self.cumulative_reward, total).saturating_add(
            num::mul_div(
                self.transferred_average_staked_amount,
                self.transferred_cumulative_reward,
                total,
            ),
        )
    }

    /// Amount that can still be deposited before hitting the vestable cap.
    pub fn remaining_vestable_amount(&self) -> U256 {
        self.max_vestable_amount.saturating_sub(self.vested_amount)
    }
}
