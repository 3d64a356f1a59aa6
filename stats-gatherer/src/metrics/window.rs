use crate::error::CollectError;
use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    time::Duration,
};

/// How far back a collection reaches when nothing else is configured.
pub const DEFAULT_LOOKBACK: Duration = Duration::from_secs(5 * 60);

const DISPLAY_FORMAT: &str = "%a, %d %b %Y %H:%M:%S UTC";

/// The `[start, end]` range a performance query covers. `start < end` always holds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, CollectError> {
        if start >= end {
            return Err(CollectError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn ending_at(end: DateTime<Utc>, lookback: Duration) -> Result<Self, CollectError> {
        let lookback_delta =
            chrono::Duration::from_std(lookback).map_err(|_| CollectError::LookbackOutOfRange(lookback))?;
        let start = end
            .checked_sub_signed(lookback_delta)
            .ok_or(CollectError::LookbackOutOfRange(lookback))?;
        Self::new(start, end)
    }

    /// Window ending now.
    pub fn last(lookback: Duration) -> Result<Self, CollectError> {
        Self::ending_at(Utc::now(), lookback)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration_seconds(&self) -> i64 {
        (self.end - self.start).num_seconds()
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}",
            self.start.format(DISPLAY_FORMAT),
            self.end.format(DISPLAY_FORMAT)
        )
    }
}
