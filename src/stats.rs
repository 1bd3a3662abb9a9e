//! Statistics recorded for each committed load.

use serde::Serialize;
use std::time::{Duration, SystemTime};

/// Counters collected while a table was built.
#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of data files read
    pub files: usize,
    /// Number of non-blank lines read
    pub lines: u64,
    /// Lines skipped because they failed to parse or classify
    pub skipped: u64,
    /// Start keys that were lower than the previous key of the same protocol
    pub out_of_order: u64,
    pub v4_entities: usize,
    pub v6_entities: usize,
    pub metas: usize,
    #[serde(with = "system_time_serde")]
    pub loaded_at: Option<SystemTime>,
}

mod system_time_serde {
    use serde::{Serialize, Serializer};
    use std::time::{SystemTime, UNIX_EPOCH};

    pub fn serialize<S>(time: &Option<SystemTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => {
                let duration = t.duration_since(UNIX_EPOCH).unwrap_or_default();
                Some(duration.as_secs()).serialize(serializer)
            }
            None => None::<u64>.serialize(serializer),
        }
    }
}

impl LoadStats {
    /// Check if a refresh is due based on the given interval.
    ///
    /// Returns `true` if:
    /// - Nothing has been loaded yet
    /// - The elapsed time since the last load reaches the interval
    pub fn needs_update(&self, interval: Duration) -> bool {
        match self.loaded_at {
            None => true,
            Some(last) => {
                let elapsed = SystemTime::now().duration_since(last).unwrap_or(Duration::MAX);
                elapsed >= interval
            }
        }
    }

    /// Get the time of the last committed load.
    pub fn loaded_at(&self) -> Option<SystemTime> {
        self.loaded_at
    }
}
