use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    application::dto::RatingAggregateDto,
    domain::{
        authorization::AuthorizationPolicy,
        entities::{IdentityClaim, MovieId, UserId},
        repositories::RatingRepository,
    },
    presentation::middleware::error::AppError,
};

/// Use case for removing a rating
///
/// Owners may delete their own rating; admins may delete anyone's. The
/// ownership check runs before storage is touched, so a refused request has
/// no side effects.
pub struct DeleteRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> DeleteRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// # Errors
    /// * `Authorization` - caller is neither the owner nor an admin
    /// * `NotFound` - no such rating
    /// * `Database` - the compound write was rolled back
    pub async fn execute(
        &self,
        claim: &IdentityClaim,
        owner_id: UserId,
        movie_id: MovieId,
    ) -> Result<RatingAggregateDto, AppError> {
        if let Err(e) = AuthorizationPolicy::require_self_or_admin(claim, owner_id) {
            warn!(
                "User {} refused deletion of rating of movie {} owned by {}",
                claim.subject_id, movie_id, owner_id
            );
            return Err(e.into());
        }

        info!("User {} deleting rating of movie {} by {}", claim.subject_id, movie_id, owner_id);

        let aggregate = self.repository.delete(owner_id, movie_id).await?;

        info!("Movie {} now has {} ratings", movie_id, aggregate.rating_count);
        Ok(aggregate.into())
    }
}
