//! Telemetry session interval.

use serde::{Deserialize, Serialize};

/// Absolute interval of a recorded telemetry session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimeline {
    /// Session start in Unix epoch seconds.
    pub start_epoch_seconds: i64,
    /// Session end in Unix epoch seconds.
    pub end_epoch_seconds: i64,
}

impl SessionTimeline {
    /// Create a session interval from its epoch-second bounds.
    pub fn new(start_epoch_seconds: i64, end_epoch_seconds: i64) -> Self {
        Self {
            start_epoch_seconds,
            end_epoch_seconds,
        }
    }

    /// Length of the session in seconds.
    pub fn duration_seconds(&self) -> i64 {
        self.end_epoch_seconds - self.start_epoch_seconds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_is_end_minus_start() {
        let session = SessionTimeline::new(1_700_000_000, 1_700_000_900);
        assert_eq!(session.duration_seconds(), 900);
    }
}
