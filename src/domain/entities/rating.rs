use serde::{Deserialize, Serialize};

use crate::domain::entities::{MovieId, UserId};
use crate::domain::value_objects::RatingScore;

/// One user's score for one movie; unique per (user, movie)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub score: RatingScore,
}

impl Rating {
    #[must_use]
    pub fn new(user_id: UserId, movie_id: MovieId, score: RatingScore) -> Self {
        Self { user_id, movie_id, score }
    }
}

/// Change a single rating mutation contributes to its movie's aggregate
///
/// Storage applies it as `count = count + delta.count, total = total + delta.total`
/// so concurrent writers never compute the new aggregate from a stale read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingDelta {
    pub count: i64,
    pub total: i64,
}

impl RatingDelta {
    #[must_use]
    pub fn created(score: RatingScore) -> Self {
        Self { count: 1, total: i64::from(score.value()) }
    }

    /// Old score retracted and new score applied in one step; count unchanged
    #[must_use]
    pub fn changed(old: RatingScore, new: RatingScore) -> Self {
        Self { count: 0, total: i64::from(new.value()) - i64::from(old.value()) }
    }

    #[must_use]
    pub fn removed(score: RatingScore) -> Self {
        Self { count: -1, total: -i64::from(score.value()) }
    }
}

/// Whether a movie has any ratings contributing to its aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateState {
    Unrated,
    Rated,
}

/// Derived rating summary owned by a movie
///
/// Only `rating_count` and `rating_total` are stored; the average is always
/// recomputed from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingAggregate {
    pub movie_id: MovieId,
    pub rating_count: i64,
    pub rating_total: i64,
}

impl RatingAggregate {
    #[must_use]
    pub fn unrated(movie_id: MovieId) -> Self {
        Self { movie_id, rating_count: 0, rating_total: 0 }
    }

    /// Build the aggregate that exactly reflects the given scores
    pub fn from_scores<I>(movie_id: MovieId, scores: I) -> Self
    where
        I: IntoIterator<Item = RatingScore>,
    {
        scores.into_iter().fold(Self::unrated(movie_id), |acc, score| Self {
            rating_count: acc.rating_count + 1,
            rating_total: acc.rating_total + i64::from(score.value()),
            ..acc
        })
    }

    pub fn state(&self) -> AggregateState {
        if self.rating_count > 0 { AggregateState::Rated } else { AggregateState::Unrated }
    }

    /// `rating_total / rating_count`, or `0.0` for an unrated movie
    #[allow(clippy::cast_precision_loss)]
    pub fn average_rating(&self) -> f64 {
        if self.rating_count > 0 {
            self.rating_total as f64 / self.rating_count as f64
        } else {
            0.0
        }
    }

    /// Apply a delta, refusing any result that no set of ratings could produce
    pub fn apply(self, delta: RatingDelta) -> Result<Self, AggregateInvariantError> {
        let rating_count = self.rating_count + delta.count;
        let rating_total = self.rating_total + delta.total;

        if rating_count < 0 {
            return Err(AggregateInvariantError::NegativeCount { movie_id: self.movie_id });
        }
        if rating_count == 0 && rating_total != 0 {
            return Err(AggregateInvariantError::OrphanTotal {
                movie_id: self.movie_id,
                total: rating_total,
            });
        }

        Ok(Self { movie_id: self.movie_id, rating_count, rating_total })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateInvariantError {
    #[error("rating count for movie {movie_id} would become negative")]
    NegativeCount { movie_id: MovieId },
    #[error("movie {movie_id} has no ratings but a total of {total}")]
    OrphanTotal { movie_id: MovieId, total: i64 },
}

/// Result of a compound rating write: the persisted rating and the aggregate
/// as committed in the same transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingMutation {
    pub rating: Rating,
    pub aggregate: RatingAggregate,
}
