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

/// Use case for a caller changing their existing rating
///
/// The old score is retracted and the new one applied in a single step, so
/// the aggregate count never changes.
pub struct UpdateRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> UpdateRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    /// * `NotFound` - the caller has not rated this movie
    /// * `Database` - the compound write was rolled back
    pub async fn execute(
        &self,
        claim: &IdentityClaim,
        movie_id: MovieId,
        score: RatingScore,
    ) -> Result<RatingMutationResponse, AppError> {
        tracing::info!("User {} changing rating of movie {} to {}", claim.subject_id, movie_id, score);

        let rating = Rating::new(claim.subject_id, movie_id, score);
        let mutation = self.repository.update(&rating).await?;

        Ok(mutation.into())
    }
}
