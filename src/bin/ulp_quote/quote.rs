//! Quote evaluation against a loaded snapshot.

use alloy::primitives::{Address, U256};
use fastnum::UD256;
use tracing::{debug, info, warn};
use ulp_sdk::{
    calc::{self, Direction, Quote},
    num::Converter,
    state::{PriceOracle, Snapshot},
    types::{Asset, VaultKind},
};

use crate::{
    config::{ConfigError, Request},
    error::Result,
};

/// Decimals of the escrowed reward token deposited into vesting vaults.
const ESCROW_DECIMALS: u8 = 18;

/// Evaluates requests against a single snapshot.
#[derive(Debug)]
pub struct Quoter {
    snapshot: Snapshot,
    display_decimals: u8,
}

/// Both legs of a quoted pool operation in token units.
#[derive(Debug)]
struct Trade<'a> {
    direction: Direction,
    source: &'a Asset,
    dest: &'a Asset,
    amount_in: U256,
    amount_out: U256,
    fee_basis_points: Option<u32>,
}

impl Quoter {
    pub fn new(snapshot: Snapshot, display_decimals: u8) -> Self {
        let pool_share = snapshot.pool.pool_share();
        info!(
            tokens = snapshot.pool.tokens().count(),
            vesting_accounts = snapshot.vesting.len(),
            pool_share_supply = %Converter::new(pool_share.asset.decimals)
                .display(pool_share.supply, display_decimals),
            "Loaded snapshot"
        );
        Self {
            snapshot,
            display_decimals,
        }
    }

    /// Evaluate `request` and render the result for display.
    pub fn run(&self, request: &Request) -> Result<String> {
        match request {
            Request::Buy {
                token,
                amount,
                exact_out,
            } => {
                let token = self.pool_token(token)?;
                let share = &self.snapshot.pool.pool_share().asset;
                self.trade(Direction::Mint, token, share, *amount, *exact_out)
            }
            Request::Sell {
                token,
                amount,
                exact_out,
            } => {
                let token = self.pool_token(token)?;
                let share = &self.snapshot.pool.pool_share().asset;
                self.trade(Direction::Redeem, share, token, *amount, *exact_out)
            }
            Request::Swap {
                from,
                to,
                amount,
                exact_out,
            } => {
                let from = self.pool_token(from)?;
                let to = self.pool_token(to)?;
                self.trade(Direction::Swap, from, to, *amount, *exact_out)
            }
            Request::Vest {
                account,
                amount,
                vault,
            } => self.vest(account, *amount, *vault),
        }
    }

    fn trade(
        &self,
        direction: Direction,
        source: &Asset,
        dest: &Asset,
        amount: UD256,
        exact_out: bool,
    ) -> Result<String> {
        let pool = &self.snapshot.pool;
        let fees = &self.snapshot.fees;

        let trade = if exact_out {
            let amount_out = self.units(amount, dest.decimals)?;
            let quote = match direction {
                Direction::Mint => {
                    calc::buy_pool_share_from_amount(amount_out, &source.id, pool, fees)
                }
                Direction::Redeem => {
                    calc::sell_pool_share_from_amount(amount_out, &dest.id, pool, fees)
                }
                Direction::Swap => {
                    calc::swap_from_amount(amount_out, &source.id, &dest.id, pool, fees)
                }
            };
            Trade {
                direction,
                source,
                dest,
                amount_in: quote.amount,
                amount_out: if quote.fee_basis_points.is_some() {
                    amount_out
                } else {
                    U256::ZERO
                },
                fee_basis_points: quote.fee_basis_points,
            }
        } else {
            let amount_in = self.units(amount, source.decimals)?;
            let quote = match direction {
                Direction::Mint => {
                    calc::buy_pool_share_to_amount(amount_in, &source.id, pool, fees)
                }
                Direction::Redeem => {
                    calc::sell_pool_share_to_amount(amount_in, &dest.id, pool, fees)
                }
                Direction::Swap => {
                    calc::swap_to_amount(amount_in, &source.id, &dest.id, pool, fees)
                }
            };
            Trade {
                direction,
                source,
                dest,
                amount_in,
                amount_out: quote.amount,
                fee_basis_points: quote.fee_basis_points,
            }
        };

        self.log_weight_shifts(&trade);
        info!(
            direction = ?trade.direction,
            source = %source.symbol,
            dest = %dest.symbol,
            amount_in = %trade.amount_in,
            amount_out = %trade.amount_out,
            fee_basis_points = ?trade.fee_basis_points,
            "Quoted"
        );

        let quote = Quote {
            amount: trade.amount_out,
            fee_basis_points: trade.fee_basis_points,
        };
        if let Err(violation) =
            calc::check_quote(pool, direction, source, dest, trade.amount_in, &quote)
        {
            warn!(%violation, "Operation would be rejected by the pool");
        }

        Ok(self.render_trade(&trade))
    }

    fn log_weight_shifts(&self, trade: &Trade<'_>) {
        let pool = &self.snapshot.pool;
        let price = pool
            .price(&trade.source.id)
            .map(|price| price.min)
            .unwrap_or_default();
        let usdg_delta = calc::usdg_value(calc::usd_value(
            trade.amount_in,
            trade.source.decimals,
            price,
        ));

        let mut affected = vec![];
        if !trade.direction.is_redeem() {
            affected.push((trade.source, true));
        }
        if !trade.direction.is_mint() {
            affected.push((trade.dest, false));
        }
        for (asset, increment) in affected {
            let shift = pool.weight_shift(&asset.id, usdg_delta, increment);
            debug!(
                asset = %asset.symbol,
                increment,
                current_bps = shift.current_bps,
                target_bps = ?shift.target_bps,
                next_bps = shift.next_bps,
                "Weight shift"
            );
        }
    }

    fn render_trade(&self, trade: &Trade<'_>) -> String {
        let fee = match trade.fee_basis_points {
            Some(bps) => format!("{bps} bps"),
            None => "n/a".to_string(),
        };
        format!(
            "pay {} {}\nreceive {} {}\nfee {}",
            self.display(trade.amount_in, trade.source.decimals),
            trade.source.symbol,
            self.display(trade.amount_out, trade.dest.decimals),
            trade.dest.symbol,
            fee,
        )
    }

    fn vest(&self, name: &str, amount: UD256, vault: VaultKind) -> Result<String> {
        let account = self
            .snapshot
            .vesting
            .get(name)
            .ok_or_else(|| ConfigError::UnknownAccount(name.to_string()))?;
        let deposit = self.units(amount, ESCROW_DECIMALS)?;

        let Some(projection) =
            calc::project_vesting_state(vault.min_ratio(), deposit, Some(account))
        else {
            info!(account = name, "Nothing to deposit");
            return Ok("nothing to project".to_string());
        };
        info!(account = name, ?vault, ?projection, "Projected vesting state");

        let mut lines = vec![
            format!(
                "max vestable {} -> {}",
                self.display(projection.max_vestable_amount, ESCROW_DECIMALS),
                self.display(projection.next_max_vestable_amount, ESCROW_DECIMALS),
            ),
            format!(
                "ratio {} -> {}",
                self.ratio(projection.current_ratio),
                self.ratio(projection.next_ratio),
            ),
            format!(
                "staking {} -> {}",
                self.display(projection.initial_staking_amount, ESCROW_DECIMALS),
                self.display(projection.next_staking_amount, ESCROW_DECIMALS),
            ),
        ];

        if let Some(reserve) = calc::reserve_requirement(deposit, Some(account)) {
            if reserve.exceeds_remaining {
                warn!(
                    account = name,
                    remaining = %account.remaining_vestable_amount(),
                    "Deposit exceeds remaining vestable amount"
                );
            }
            lines.push(format!(
                "reserve {} (+{})",
                self.display(reserve.next_reserve_amount, ESCROW_DECIMALS),
                self.display(reserve.additional_reserve_amount, ESCROW_DECIMALS),
            ));
        }

        Ok(lines.join("\n"))
    }

    /// Pool token by case-insensitive symbol or by address.
    fn pool_token(&self, name: &str) -> Result<&Asset> {
        let pool = &self.snapshot.pool;
        let found = match name.parse::<Address>() {
            Ok(id) => pool.token(&id),
            Err(_) => pool
                .tokens()
                .find(|info| info.asset.symbol.eq_ignore_ascii_case(name)),
        };
        found
            .map(|info| &info.asset)
            .ok_or_else(|| ConfigError::UnknownToken(name.to_string()).into())
    }

    /// Converts a whole-token `amount` into units of a token with `decimals`.
    fn units(&self, amount: UD256, decimals: u8) -> Result<U256> {
        Converter::new(decimals)
            .try_to_unsigned(amount)
            .ok_or_else(|| ConfigError::InvalidAmount(amount.to_string()).into())
    }

    fn display(&self, value: U256, decimals: u8) -> String {
        Converter::new(decimals).display(value, self.display_decimals)
    }

    fn ratio(&self, ratio: U256) -> String {
        Converter::new(4).display(ratio, self.display_decimals.min(4))
    }
}
