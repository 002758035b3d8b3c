use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// Time duration stored as fractional seconds.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Duration {
    /// Duration in seconds.
    seconds: f64,
}

impl Duration {
    /// Create a duration from seconds. Negative inputs clamp to zero.
    pub fn from_seconds(s: f64) -> Self {
        Self {
            seconds: s.max(0.0),
        }
    }

    /// Create a duration from milliseconds.
    pub fn from_millis(ms: f64) -> Self {
        Self::from_seconds(ms / 1000.0)
    }

    /// Create a zero duration.
    pub fn zero() -> Self {
        Self { seconds: 0.0 }
    }

    /// Get duration as seconds.
    pub fn as_seconds(&self) -> f64 {
        self.seconds
    }

    /// Compute number of frames for a given FPS.
    pub fn frame_count(&self, fps: f64) -> u64 {
        (self.seconds * fps).ceil() as u64
    }

    pub fn is_zero(&self) -> bool {
        self.seconds == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.seconds.is_finite()
    }
}

impl Default for Duration {
    fn default() -> Self {
        Duration::zero()
    }
}

impl Add for Duration {
    type Output = Duration;
    fn add(self, rhs: Duration) -> Duration {
        Duration::from_seconds(self.seconds + rhs.seconds)
    }
}

impl std::iter::Sum for Duration {
    fn sum<I: Iterator<Item = Duration>>(iter: I) -> Duration {
        iter.fold(Duration::zero(), |acc, d| acc + d)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.seconds < 1.0 {
            write!(f, "{:.0}ms", self.seconds * 1000.0)
        } else {
            write!(f, "{:.2}s", self.seconds)
        }
    }
}
