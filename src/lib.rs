//! ULP pool SDK.
//!
//! # Overview
//!
//! Pure calculators for the ULP multi-asset liquidity pool of a perpetual
//! exchange and its reward vesting vaults.
//!
//! Use [`state::PoolState`] (or [`state::Snapshot`] to load one from JSON)
//! together with [`fee::FeeSchedules`] to quote pool operations:
//!
//! * [`calc::convert_and_fee`] converts between any two priced assets and
//!   deducts the dynamic fee, [`calc::required_amount_in`] is its inverse.
//!
//! * [`calc::buy_pool_share_to_amount`], [`calc::sell_pool_share_to_amount`],
//!   [`calc::swap_to_amount`] and their `_from_amount` counterparts price
//!   everything from the pool snapshot.
//!
//! * [`calc::check_quote`] tells whether the pool would accept a quoted
//!   operation. Calculators never refuse on their own.
//!
//! Use [`calc::project_vesting_state`] to preview how a vesting deposit
//! changes the stake an account has to keep.
//!
//! All amounts are fixed-point integers in the units of their token, see
//! [`num`] for the precisions involved. See `./tests` for examples.
//!
//! # Limitations/follow-ups
//!
//! * Snapshots are supplied by the caller, fetching them from chain is out
//!   of scope.
//!
//! * Fees do not account for the price spread charged on stable assets.
//!
//! # Testing
//!
//! [`testing`] module provides builders assembling pool and vesting
//! snapshots from human-readable amounts.

pub mod calc;
pub mod error;
pub mod fee;
pub mod num;
pub mod state;
pub mod testing;
pub mod types;
