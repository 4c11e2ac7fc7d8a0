//! Configuration for the quote tool.
//!
//! Configuration comes from two sources:
//! - Environment variables (via .env file or shell): snapshot location, output format
//! - CLI arguments: the operation to quote

use clap::{Parser, Subcommand, ValueEnum};
use fastnum::{UD256, decimal::Context};
use ulp_sdk::types::VaultKind;

/// Default number of fractional digits printed.
const DEFAULT_DISPLAY_DECIMALS: u8 = 6;

/// Environment configuration.
#[derive(Debug, serde::Deserialize)]
pub struct EnvConfig {
    /// Path to the JSON pool/vesting snapshot
    pub snapshot_path: String,

    /// Optional number of fractional digits printed (default: 6)
    pub display_decimals: Option<u8>,
}

impl EnvConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::from_env()
    }

    pub fn display_decimals(&self) -> u8 {
        self.display_decimals.unwrap_or(DEFAULT_DISPLAY_DECIMALS)
    }
}

/// CLI arguments.
#[derive(Debug, Parser)]
#[command(name = "ulp-quote")]
#[command(about = "Fee-aware quotes for the ULP pool and vesting vaults")]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Buy pool-share tokens with a pool token
    Buy {
        /// Token paid in, by symbol or address
        token: String,

        /// Amount of token paid in, or of pool-share tokens received with --exact-out
        amount: String,

        /// Quote the input required for an exact output amount
        #[arg(long)]
        exact_out: bool,
    },

    /// Sell pool-share tokens for a pool token
    Sell {
        /// Token received, by symbol or address
        token: String,

        /// Amount of pool-share tokens sold, or of token received with --exact-out
        amount: String,

        /// Quote the input required for an exact output amount
        #[arg(long)]
        exact_out: bool,
    },

    /// Swap one pool token for another
    Swap {
        /// Token paid in, by symbol or address
        from: String,

        /// Token received, by symbol or address
        to: String,

        /// Amount paid in, or received with --exact-out
        amount: String,

        /// Quote the input required for an exact output amount
        #[arg(long)]
        exact_out: bool,
    },

    /// Project the stake requirement of a vesting deposit
    Vest {
        /// Vesting account name in the snapshot
        account: String,

        /// Amount of escrowed tokens to deposit
        amount: String,

        /// Vault the account belongs to
        #[arg(long, value_enum, default_value_t = Vault::PoolShare)]
        vault: Vault,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Vault {
    Primary,
    PoolShare,
}

impl From<Vault> for VaultKind {
    fn from(vault: Vault) -> Self {
        match vault {
            Vault::Primary => VaultKind::Primary,
            Vault::PoolShare => VaultKind::PoolShare,
        }
    }
}

/// Validated operation with decimal amounts in whole tokens.
#[derive(Clone, Debug, PartialEq)]
pub enum Request {
    Buy {
        token: String,
        amount: UD256,
        exact_out: bool,
    },
    Sell {
        token: String,
        amount: UD256,
        exact_out: bool,
    },
    Swap {
        from: String,
        to: String,
        amount: UD256,
        exact_out: bool,
    },
    Vest {
        account: String,
        amount: UD256,
        vault: VaultKind,
    },
}

impl CliConfig {
    /// Convert CLI arguments to a validated request.
    pub fn to_request(&self) -> Result<Request, ConfigError> {
        let request = match &self.command {
            Command::Buy {
                token,
                amount,
                exact_out,
            } => Request::Buy {
                token: token.clone(),
                amount: parse_amount(amount)?,
                exact_out: *exact_out,
            },
            Command::Sell {
                token,
                amount,
                exact_out,
            } => Request::Sell {
                token: token.clone(),
                amount: parse_amount(amount)?,
                exact_out: *exact_out,
            },
            Command::Swap {
                from,
                to,
                amount,
                exact_out,
            } => {
                if from.eq_ignore_ascii_case(to) {
                    return Err(ConfigError::SameToken(from.clone()));
                }
                Request::Swap {
                    from: from.clone(),
                    to: to.clone(),
                    amount: parse_amount(amount)?,
                    exact_out: *exact_out,
                }
            }
            Command::Vest {
                account,
                amount,
                vault,
            } => Request::Vest {
                account: account.clone(),
                amount: parse_amount(amount)?,
                vault: (*vault).into(),
            },
        };
        Ok(request)
    }
}

fn parse_amount(amount: &str) -> Result<UD256, ConfigError> {
    UD256::from_str(amount, Context::default())
        .map_err(|_| ConfigError::InvalidAmount(amount.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Cannot swap {0} for itself")]
    SameToken(String),

    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Unknown vesting account: {0}")]
    UnknownAccount(String),
}
