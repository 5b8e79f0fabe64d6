use serde::{Deserialize, Serialize};
use std::fmt;

/// Score a single user gives a movie, always within `1..=10`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct RatingScore(i32);

impl RatingScore {
    pub const MIN: i32 = 1;
    pub const MAX: i32 = 10;

    /// Create a score, rejecting values outside `1..=10`
    pub fn new(value: i32) -> Result<Self, RatingScoreError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingScoreError::OutOfRange(value))
        }
    }

    #[must_use]
    pub fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for RatingScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i32> for RatingScore {
    type Error = RatingScoreError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RatingScore> for i32 {
    fn from(score: RatingScore) -> Self {
        score.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RatingScoreError {
    #[error("Rating must be between 1 and 10, got {0}")]
    OutOfRange(i32),
}
