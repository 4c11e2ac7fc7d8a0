//! Dynamic fee schedule.
//!
//! Fees reward operations that bring an asset back toward its target weight
//! in the pool and tax operations that push it further away. The schedule
//! maps how far an asset already is from its target to a fee, separately
//! for operations increasing and decreasing the asset's weight.

use crate::{calc::Direction, error::FeeScheduleError, num::BASIS_POINTS_DIVISOR, types::Asset};

/// A step of the fee table: deviations of at least `deviation_bps` pay `fee_bps`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FeeTier {
    pub deviation_bps: u32,
    pub fee_bps: u32,
}

impl FeeTier {
    pub const fn new(deviation_bps: u32, fee_bps: u32) -> Self {
        Self {
            deviation_bps,
            fee_bps,
        }
    }
}

/// Weight of an asset in the pool before and after an operation, in basis points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WeightShift {
    pub current_bps: u32,
    /// `None` when no target is configured for the asset.
    pub target_bps: Option<u32>,
    pub next_bps: u32,
}

impl WeightShift {
    /// Distance from target before the operation.
    pub fn initial_deviation_bps(&self) -> Option<u32> {
        self.target_bps
            .map(|target| self.current_bps.abs_diff(target))
    }

    /// Distance from target after the operation.
    pub fn next_deviation_bps(&self) -> Option<u32> {
        self.target_bps.map(|target| self.next_bps.abs_diff(target))
    }

    /// Adding (`increment`) or removing the asset rebalances the pool.
    pub fn rebalances(&self, increment: bool) -> bool {
        match self.target_bps {
            Some(target) if increment => self.current_bps < target,
            Some(target) => self.current_bps > target,
            None => false,
        }
    }
}

/// Fee table for one kind of pool operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeSchedule {
    min_fee_bps: u32,
    tax_fee_bps: u32,
    target_weight_tolerance_bps: u32,
    increase: Vec<FeeTier>,
    decrease: Vec<FeeTier>,
}

impl FeeSchedule {
    pub fn new(
        min_fee_bps: u32,
        tax_fee_bps: u32,
        target_weight_tolerance_bps: u32,
        increase: Vec<FeeTier>,
        decrease: Vec<FeeTier>,
    ) -> Result<Self, FeeScheduleError> {
        if tax_fee_bps > BASIS_POINTS_DIVISOR {
            return Err(FeeScheduleError::FeeTooHigh(tax_fee_bps));
        }
        if min_fee_bps > tax_fee_bps {
            return Err(FeeScheduleError::InvertedBounds(min_fee_bps, tax_fee_bps));
        }
        validate_tiers(&increase)?;
        validate_tiers(&decrease)?;

        Ok(Self {
            min_fee_bps,
            tax_fee_bps,
            target_weight_tolerance_bps,
            increase,
            decrease,
        })
    }

    /// Minting and redeeming the pool-share token.
    pub fn mint_burn() -> Self {
        let tiers = vec![
            FeeTier::new(100, 35),
            FeeTier::new(250, 45),
            FeeTier::new(500, 60),
            FeeTier::new(1000, 75),
        ];
        Self {
            min_fee_bps: 25,
            tax_fee_bps: 75,
            target_weight_tolerance_bps: 0,
            increase: tiers.clone(),
            decrease: tiers,
        }
    }

    /// Swaps between volatile assets.
    pub fn swap() -> Self {
        let tiers = vec![
            FeeTier::new(100, 40),
            FeeTier::new(250, 50),
            FeeTier::new(500, 65),
            FeeTier::new(1000, 80),
        ];
        Self {
            min_fee_bps: 30,
            tax_fee_bps: 80,
            target_weight_tolerance_bps: 0,
            increase: tiers.clone(),
            decrease: tiers,
        }
    }

    /// Swaps between stable assets.
    pub fn stable_swap() -> Self {
        let tiers = vec![
            FeeTier::new(50, 8),
            FeeTier::new(100, 12),
            FeeTier::new(250, 16),
            FeeTier::new(500, 20),
        ];
        Self {
            min_fee_bps: 4,
            tax_fee_bps: 20,
            target_weight_tolerance_bps: 0,
            increase: tiers.clone(),
            decrease: tiers,
        }
    }

    /// Same fee regardless of pool balance.
    pub fn flat(fee_bps: u32) -> Self {
        let fee_bps = fee_bps.min(BASIS_POINTS_DIVISOR);
        Self {
            min_fee_bps: fee_bps,
            tax_fee_bps: fee_bps,
            target_weight_tolerance_bps: 0,
            increase: vec![],
            decrease: vec![],
        }
    }

    pub fn zero() -> Self {
        Self::flat(0)
    }

    pub fn min_fee_bps(&self) -> u32 {
        self.min_fee_bps
    }

    pub fn tax_fee_bps(&self) -> u32 {
        self.tax_fee_bps
    }

    pub fn target_weight_tolerance_bps(&self) -> u32 {
        self.target_weight_tolerance_bps
    }

    pub fn increase(&self) -> &[FeeTier] {
        &self.increase
    }

    pub fn decrease(&self) -> &[FeeTier] {
        &self.decrease
    }

    /// Fee for an operation shifting an asset's weight as described by `shift`.
    ///
    /// `increment` tells whether the operation adds the asset to the pool.
    /// The tier is picked by the deviation before the operation, so the fee
    /// does not depend on the operation size. The result is always within
    /// `[min_fee_bps, tax_fee_bps]`.
    ///
    /// `shift.next_bps` does not affect the fee. An operation starting on the
    /// rebalancing side of the target pays the minimum fee even when it
    /// overshoots, e.g. a mint taking an asset from 3000 to 9000 bps against
    /// a 5000 bps target. Charging by the post-operation weight would let a
    /// larger input pay a higher fee and receive less, breaking monotonicity
    /// of [`crate::calc::convert_and_fee`] in the input amount.
    pub fn select(&self, shift: &WeightShift, increment: bool) -> u32 {
        let Some(deviation) = shift.initial_deviation_bps() else {
            return self.tax_fee_bps;
        };

        if deviation <= self.target_weight_tolerance_bps || shift.rebalances(increment) {
            return self.min_fee_bps;
        }

        let tiers = if increment {
            &self.increase
        } else {
            &self.decrease
        };
        if tiers.is_empty() {
            return self.tax_fee_bps;
        }

        tiers
            .iter()
            .take_while(|tier| tier.deviation_bps <= deviation)
            .last()
            .map(|tier| tier.fee_bps)
            .unwrap_or(self.min_fee_bps)
            .clamp(self.min_fee_bps, self.tax_fee_bps)
    }
}

fn validate_tiers(tiers: &[FeeTier]) -> Result<(), FeeScheduleError> {
    for pair in tiers.windows(2) {
        if pair[1].deviation_bps <= pair[0].deviation_bps || pair[1].fee_bps < pair[0].fee_bps {
            return Err(FeeScheduleError::NonMonotonicTiers(pair[1].deviation_bps));
        }
    }
    Ok(())
}

/// Fee schedules of every pool operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeeSchedules {
    pub mint_burn: FeeSchedule,
    pub swap: FeeSchedule,
    pub stable_swap: FeeSchedule,
}

impl Default for FeeSchedules {
    fn default() -> Self {
        Self {
            mint_burn: FeeSchedule::mint_burn(),
            swap: FeeSchedule::swap(),
            stable_swap: FeeSchedule::stable_swap(),
        }
    }
}

impl FeeSchedules {
    /// Schedule applying to an operation between `source` and `dest`.
    pub fn for_operation(
        &self,
        direction: Direction,
        source: &Asset,
        dest: &Asset,
    ) -> &FeeSchedule {
        match direction {
            Direction::Mint | Direction::Redeem => &self.mint_burn,
            Direction::Swap if source.is_stable && dest.is_stable => &self.stable_swap,
            Direction::Swap => &self.swap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shift(current_bps: u32, target_bps: u32, next_bps: u32) -> WeightShift {
        WeightShift {
            current_bps,
            target_bps: Some(target_bps),
            next_bps,
        }
    }

    #[test]
    fn test_on_target_pays_min_fee() {
        let schedule = FeeSchedule::mint_burn();
        assert_eq!(schedule.select(&shift(5000, 5000, 5000), true), 25);
        assert_eq!(schedule.select(&shift(5000, 5000, 6000), true), 25);
        assert_eq!(schedule.select(&shift(5000, 5000, 4000), false), 25);
    }

    #[test]
    fn test_rebalancing_pays_min_fee() {
        let schedule = FeeSchedule::mint_burn();
        assert_eq!(schedule.select(&shift(3000, 5000, 4000), true), 25);
        assert_eq!(schedule.select(&shift(7000, 5000, 4500), false), 25);
        // Overshooting the target still rebalances
        assert_eq!(schedule.select(&shift(3000, 5000, 9000), true), 25);
    }

    #[test]
    fn test_unbalancing_uses_tiers() {
        let schedule = FeeSchedule::mint_burn();
        // Below the first tier
        assert_eq!(schedule.select(&shift(5050, 5000, 5060), true), 25);
        assert_eq!(schedule.select(&shift(5100, 5000, 5110), true), 35);
        assert_eq!(schedule.select(&shift(5300, 5000, 5310), true), 45);
        assert_eq!(schedule.select(&shift(4400, 5000, 4390), false), 60);
        assert_eq!(schedule.select(&shift(9000, 5000, 9010), true), 75);
        assert_eq!(schedule.select(&shift(3000, 5000, 2000), false), 75);
    }

    #[test]
    fn test_rebalances() {
        assert!(shift(3000, 5000, 3000).rebalances(true));
        assert!(!shift(3000, 5000, 3000).rebalances(false));
        assert!(shift(7000, 5000, 7000).rebalances(false));
        assert!(!shift(5000, 5000, 5000).rebalances(true));
        assert!(!shift(5000, 5000, 5000).rebalances(false));
    }

    #[test]
    fn test_tolerance_counts_as_on_target() {
        let schedule = FeeSchedule::new(
            10,
            50,
            200,
            vec![FeeTier::new(100, 30)],
            vec![FeeTier::new(100, 30)],
        )
        .unwrap();
        assert_eq!(schedule.select(&shift(5150, 5000, 5200), true), 10);
        assert_eq!(schedule.select(&shift(5250, 5000, 5300), true), 30);
    }

    #[test]
    fn test_undefined_target_pays_tax() {
        let schedule = FeeSchedule::swap();
        let shift = WeightShift {
            current_bps: 0,
            target_bps: None,
            next_bps: 0,
        };
        assert_eq!(schedule.select(&shift, true), 80);
    }

    #[test]
    fn test_tiers_clamped_to_bounds() {
        let schedule = FeeSchedule {
            min_fee_bps: 20,
            tax_fee_bps: 40,
            target_weight_tolerance_bps: 0,
            increase: vec![FeeTier::new(10, 5), FeeTier::new(100, 90)],
            decrease: vec![],
        };
        assert_eq!(schedule.select(&shift(5050, 5000, 5060), true), 20);
        assert_eq!(schedule.select(&shift(5500, 5000, 5510), true), 40);
        // No decrease tiers configured
        assert_eq!(schedule.select(&shift(4500, 5000, 4400), false), 40);
    }

    #[test]
    fn test_flat_and_zero() {
        assert_eq!(FeeSchedule::flat(30).select(&shift(0, 5000, 9000), true), 30);
        assert_eq!(FeeSchedule::zero().select(&shift(0, 5000, 9000), true), 0);
    }

    #[test]
    fn test_new_rejects_invalid_schedules() {
        assert!(matches!(
            FeeSchedule::new(10, 20_000, 0, vec![], vec![]),
            Err(FeeScheduleError::FeeTooHigh(20_000))
        ));
        assert!(matches!(
            FeeSchedule::new(50, 20, 0, vec![], vec![]),
            Err(FeeScheduleError::InvertedBounds(50, 20))
        ));
        assert!(matches!(
            FeeSchedule::new(
                10,
                50,
                0,
                vec![FeeTier::new(100, 30), FeeTier::new(100, 40)],
                vec![]
            ),
            Err(FeeScheduleError::NonMonotonicTiers(100))
        ));
        assert!(matches!(
            FeeSchedule::new(
                10,
                50,
                0,
                vec![],
                vec![FeeTier::new(100, 30), FeeTier::new(200, 20)]
            ),
            Err(FeeScheduleError::NonMonotonicTiers(200))
        ));
    }

    #[test]
    fn test_schedule_for_operation() {
        use alloy::primitives::Address;

        let schedules = FeeSchedules::default();
        let usdc = Asset::new(Address::repeat_byte(1), "USDC", 6).stable();
        let usdt = Asset::new(Address::repeat_byte(2), "USDT", 6).stable();
        let eth = Asset::new(Address::repeat_byte(3), "ETH", 18).native();

        assert_eq!(
            schedules.for_operation(Direction::Swap, &usdc, &usdt),
            &schedules.stable_swap
        );
        assert_eq!(
            schedules.for_operation(Direction::Swap, &usdc, &eth),
            &schedules.swap
        );
        assert_eq!(
            schedules.for_operation(Direction::Mint, &usdc, &usdt),
            &schedules.mint_burn
        );
    }
}
