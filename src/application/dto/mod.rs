use serde::{Deserialize, Serialize};

use crate::domain::entities::{MovieId, Rating, RatingAggregate, RatingMutation, UserId};

/// A single user's rating of a movie
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingDto {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: i32,
}

impl From<Rating> for RatingDto {
    fn from(rating: Rating) -> Self {
        Self { user_id: rating.user_id, movie_id: rating.movie_id, rating: rating.score.value() }
    }
}

/// Aggregate view of a movie's ratings; `average_rating` is derived, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingAggregateDto {
    pub movie_id: MovieId,
    pub rating_count: i64,
    pub rating_total: i64,
    pub average_rating: f64,
}

impl From<RatingAggregate> for RatingAggregateDto {
    fn from(aggregate: RatingAggregate) -> Self {
        Self {
            movie_id: aggregate.movie_id,
            rating_count: aggregate.rating_count,
            rating_total: aggregate.rating_total,
            average_rating: aggregate.average_rating(),
        }
    }
}

/// Response for create and update: the stored rating plus the aggregate it committed with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingMutationResponse {
    pub rating: RatingDto,
    pub aggregate: RatingAggregateDto,
}

impl From<RatingMutation> for RatingMutationResponse {
    fn from(mutation: RatingMutation) -> Self {
        Self { rating: mutation.rating.into(), aggregate: mutation.aggregate.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieRatingsResponse {
    pub aggregate: RatingAggregateDto,
    pub ratings: Vec<RatingDto>,
}

/// Body for `POST /rating` and `PATCH /rating`
///
/// The score is taken as a plain integer so range errors surface as field
/// validation rather than a body parse failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RateMovieRequest {
    pub movie_id: MovieId,
    pub rating: i32,
}

/// Body for `DELETE /rating`
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteRatingRequest {
    pub user_id: UserId,
    pub movie_id: MovieId,
}

/// Query for `GET /rating`
#[derive(Debug, Clone, Deserialize)]
pub struct RatingQuery {
    pub user_id: UserId,
    pub movie_id: MovieId,
}

/// Form body for `POST /auth/login`
#[derive(Clone, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// OAuth2-shaped bearer token response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until expiry
    pub expires_in: i64,
    /// RFC 3339 expiry instant
    pub expiry: String,
}
