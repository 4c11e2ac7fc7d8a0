use std::io;

use crate::types::AssetId;

/// Invalid fee schedule parameters.
#[derive(Debug, thiserror::Error)]
pub enum FeeScheduleError {
    #[error("fee of {0} bps exceeds 100%")]
    FeeTooHigh(u32),

    #[error("min fee {0} bps exceeds tax fee {1} bps")]
    InvertedBounds(u32, u32),

    #[error("fee tiers are not monotonic at deviation {0} bps")]
    NonMonotonicTiers(u32),
}

/// Error loading a pool/vesting state snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot: {0}")]
    Io(#[from] io::Error),

    #[error("malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate pool token: {0}")]
    DuplicateToken(AssetId),

    #[error("invalid {0} fee schedule: {1}")]
    FeeSchedule(&'static str, FeeScheduleError),
}
