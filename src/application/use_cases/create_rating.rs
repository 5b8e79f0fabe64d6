use std::sync::Arc;

use crate::{
    application::dto::RatingMutationResponse,
    domain::{
        entities::{IdentityClaim, MovieId, Rating},
        repositories::RatingRepository,
        value_objects::RatingScore,
    },
    presentation::middleware::error::AppError,
};

/// Use case for a caller rating a movie for the first time
///
/// The rating is always recorded for the caller's own identity. The rating
/// row and the movie's aggregate commit together.
pub struct CreateRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> CreateRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    /// * `NotFound` - the movie does not exist
    /// * `Conflict` - the caller already rated this movie
    /// * `Database` - the compound write was rolled back
    pub async fn execute(
        &self,
        claim: &IdentityClaim,
        movie_id: MovieId,
        score: RatingScore,
    ) -> Result<RatingMutationResponse, AppError> {
        tracing::info!("User {} rating movie {} with {}", claim.subject_id, movie_id, score);

        let rating = Rating::new(claim.subject_id, movie_id, score);
        let mutation = self.repository.create(&rating).await?;

        tracing::info!(
            "Movie {} now has {} ratings totalling {}",
            movie_id,
            mutation.aggregate.rating_count,
            mutation.aggregate.rating_total
        );

        Ok(mutation.into())
    }
}
