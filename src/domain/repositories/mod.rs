use crate::domain::entities::{
    MovieId, Rating, RatingAggregate, RatingMutation, StoredCredentials, UserId,
};
use async_trait::async_trait;
use thiserror::Error;

/// Errors surfaced by the storage layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("User {user_id} already rated movie {movie_id}")]
    AlreadyRated { user_id: UserId, movie_id: MovieId },

    /// The compound rating + aggregate write was rolled back as a whole
    #[error("Aggregate write failed during {operation}: {message}")]
    AggregateWriteFailed { operation: &'static str, message: String },

    #[error("Storage unavailable: {message}")]
    Unavailable { message: String },
}

impl RepositoryError {
    pub fn rating_not_found(user_id: UserId, movie_id: MovieId) -> Self {
        Self::NotFound { resource: format!("Rating of movie {movie_id} by user {user_id}") }
    }

    pub fn movie_not_found(movie_id: MovieId) -> Self {
        Self::NotFound { resource: format!("Movie with ID {movie_id}") }
    }
}

/// Storage contract for individual ratings and the aggregates derived from them
///
/// Every mutating method is a compound write: the rating row change and the
/// matching aggregate delta commit together or not at all. Implementations
/// must apply the delta as an increment evaluated by the store, never as a
/// value computed from an earlier read.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    /// Insert a first rating and add it to the movie's aggregate
    async fn create(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError>;

    /// Change an existing rating's score, applying `new - old` to the aggregate
    async fn update(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError>;

    /// Remove a rating and retract its score from the aggregate
    async fn delete(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<RatingAggregate, RepositoryError>;

    /// Current aggregate of a movie, `None` if the movie does not exist
    async fn aggregate(&self, movie_id: MovieId)
    -> Result<Option<RatingAggregate>, RepositoryError>;

    async fn find(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<Option<Rating>, RepositoryError>;

    async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<Rating>, RepositoryError>;

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Rating>, RepositoryError>;

    /// Recompute a movie's aggregate from its rating rows while holding the movie lock
    async fn reconcile(&self, movie_id: MovieId) -> Result<RatingAggregate, RepositoryError>;

    /// Health check for repository connectivity
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Lookup of login credentials for the login flow
#[async_trait]
pub trait CredentialRepository: Send + Sync {
    async fn find_by_login(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, RepositoryError>;
}
