use std::{collections::BTreeMap, fs, path::Path};

use alloy::primitives::{Address, U256};
use serde::Deserialize;
use serde_with::{DisplayFromStr, serde_as};

use super::PoolState;
use crate::{
    error::SnapshotError,
    fee::{FeeSchedule, FeeSchedules, FeeTier},
    types::{Asset, PoolShareInfo, PoolTokenInfo, VestingAccount},
};

/// Pool, fee and vesting state loaded from a JSON document.
///
/// Integer amounts are strings holding decimal or `0x`-prefixed hex numbers
/// in the token's own fixed-point units. Fee schedules not present in the
/// document fall back to [`FeeSchedules::default`].
#[derive(Clone, Debug)]
pub struct Snapshot {
    pub pool: PoolState,
    pub fees: FeeSchedules,
    /// Vesting accounts by name.
    pub vesting: BTreeMap<String, VestingAccount>,
}

impl Snapshot {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        serde_json::from_str::<SnapshotRepr>(json)?.try_into()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SnapshotError> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[derive(Deserialize)]
struct SnapshotRepr {
    pool_tokens: Vec<PoolTokenRepr>,
    pool_share: PoolShareRepr,
    #[serde(default)]
    fees: FeesRepr,
    #[serde(default)]
    vesting: BTreeMap<String, VestingAccountRepr>,
}

#[serde_as]
#[derive(Deserialize)]
struct AssetRepr {
    #[serde_as(as = "DisplayFromStr")]
    address: Address,
    symbol: String,
    decimals: u8,
    #[serde(default)]
    is_stable: bool,
    #[serde(default)]
    is_native: bool,
    #[serde(default)]
    is_wrapped: bool,
}

#[serde_as]
#[derive(Deserialize)]
struct PoolTokenRepr {
    #[serde(flatten)]
    asset: AssetRepr,
    #[serde_as(as = "DisplayFromStr")]
    pool_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    usdg_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    weight: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    max_usdg_amount: U256,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    available_amount: Option<U256>,
    #[serde_as(as = "DisplayFromStr")]
    min_price: U256,
    #[serde_as(as = "DisplayFromStr")]
    max_price: U256,
}

#[serde_as]
#[derive(Deserialize)]
struct PoolShareRepr {
    #[serde(flatten)]
    asset: AssetRepr,
    #[serde_as(as = "DisplayFromStr")]
    supply: U256,
    #[serde_as(as = "DisplayFromStr")]
    aum_min: U256,
    #[serde_as(as = "DisplayFromStr")]
    aum_max: U256,
}

#[derive(Default, Deserialize)]
struct FeesRepr {
    mint_burn: Option<FeeScheduleRepr>,
    swap: Option<FeeScheduleRepr>,
    stable_swap: Option<FeeScheduleRepr>,
}

#[derive(Deserialize)]
struct FeeScheduleRepr {
    min_fee_bps: u32,
    tax_fee_bps: u32,
    #[serde(default)]
    target_weight_tolerance_bps: u32,
    #[serde(default)]
    increase: Vec<FeeTierRepr>,
    #[serde(default)]
    decrease: Vec<FeeTierRepr>,
}

#[derive(Deserialize)]
struct FeeTierRepr {
    deviation_bps: u32,
    fee_bps: u32,
}

#[serde_as]
#[derive(Deserialize)]
struct VestingAccountRepr {
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    cumulative_reward: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    transferred_cumulative_reward: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    average_staked_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    transferred_average_staked_amount: U256,
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    combined_average_staked_amount: Option<U256>,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    pair_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    vested_amount: U256,
    #[serde_as(as = "DisplayFromStr")]
    #[serde(default)]
    max_vestable_amount: U256,
}

impl From<AssetRepr> for Asset {
    fn from(repr: AssetRepr) -> Self {
        Self {
            id: repr.address,
            symbol: repr.symbol,
            decimals: repr.decimals,
            is_stable: repr.is_stable,
            is_native: repr.is_native,
            is_wrapped: repr.is_wrapped,
        }
    }
}

impl From<PoolTokenRepr> for PoolTokenInfo {
    fn from(repr: PoolTokenRepr) -> Self {
        Self {
            asset: repr.asset.into(),
            pool_amount: repr.pool_amount,
            usdg_amount: repr.usdg_amount,
            weight: repr.weight,
            max_usdg_amount: repr.max_usdg_amount,
            available_amount: repr.available_amount.unwrap_or(repr.pool_amount),
            min_price: repr.min_price,
            max_price: repr.max_price,
        }
    }
}

impl From<VestingAccountRepr> for VestingAccount {
    fn from(repr: VestingAccountRepr) -> Self {
        let mut account = VestingAccount {
            cumulative_reward: repr.cumulative_reward,
            transferred_cumulative_reward: repr.transferred_cumulative_reward,
            average_staked_amount: repr.average_staked_amount,
            transferred_average_staked_amount: repr.transferred_average_staked_amount,
            combined_average_staked_amount: U256::ZERO,
            pair_amount: repr.pair_amount,
            vested_amount: repr.vested_amount,
            max_vestable_amount: repr.max_vestable_amount,
        };
        account.combined_average_staked_amount = repr
            .combined_average_staked_amount
            .unwrap_or_else(|| account.blended_average_staked_amount());
        account
    }
}

impl FeeScheduleRepr {
    fn into_schedule(self, name: &'static str) -> Result<FeeSchedule, SnapshotError> {
        let tiers = |reprs: Vec<FeeTierRepr>| -> Vec<FeeTier> {
            reprs
                .into_iter()
                .map(|t| FeeTier::new(t.deviation_bps, t.fee_bps))
                .collect()
        };
        FeeSchedule::new(
            self.min_fee_bps,
            self.tax_fee_bps,
            self.target_weight_tolerance_bps,
            tiers(self.increase),
            tiers(self.decrease),
        )
        .map_err(|err| SnapshotError::FeeSchedule(name, err))
    }
}

impl TryFrom<SnapshotRepr> for Snapshot {
    type Error = SnapshotError;

    fn try_from(repr: SnapshotRepr) -> Result<Self, Self::Error> {
        let mut tokens: BTreeMap<Address, PoolTokenInfo> = BTreeMap::new();
        for token in repr.pool_tokens {
            let info = PoolTokenInfo::from(token);
            let id = info.asset.id;
            if tokens.insert(id, info).is_some() {
                return Err(SnapshotError::DuplicateToken(id));
            }
        }

        let share = repr.pool_share;
        let pool_share = PoolShareInfo {
            asset: share.asset.into(),
            supply: share.supply,
            aum_min: share.aum_min,
            aum_max: share.aum_max,
        };

        let defaults = FeeSchedules::default();
        let fees = FeeSchedules {
            mint_burn: match repr.fees.mint_burn {
                Some(repr) => repr.into_schedule("mint/burn")?,
                None => defaults.mint_burn,
            },
            swap: match repr.fees.swap {
                Some(repr) => repr.into_schedule("swap")?,
                None => defaults.swap,
            },
            stable_swap: match repr.fees.stable_swap {
                Some(repr) => repr.into_schedule("stable swap")?,
                None => defaults.stable_swap,
            },
        };

        Ok(Self {
            pool: PoolState::new(tokens.into_values(), pool_share),
            fees,
            vesting: repr
                .vesting
                .into_iter()
                .map(|(name, account)| (name, account.into()))
                .collect(),
        })
    }
}
