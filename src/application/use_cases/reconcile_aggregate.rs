use std::sync::Arc;

use crate::{
    application::dto::RatingAggregateDto,
    domain::{
        authorization::AuthorizationPolicy,
        entities::{IdentityClaim, MovieId},
        repositories::RatingRepository,
    },
    presentation::middleware::error::AppError,
};

/// Use case for rebuilding a movie's aggregate from its rating rows
///
/// Admin only. Repairs drift left behind by writes made outside this service.
pub struct ReconcileAggregateUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> ReconcileAggregateUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(
        &self,
        claim: &IdentityClaim,
        movie_id: MovieId,
    ) -> Result<RatingAggregateDto, AppError> {
        AuthorizationPolicy::require_admin(claim)?;

        tracing::info!("Admin {} reconciling aggregate of movie {}", claim.subject_id, movie_id);

        let aggregate = self.repository.reconcile(movie_id).await?;
        Ok(aggregate.into())
    }
}
