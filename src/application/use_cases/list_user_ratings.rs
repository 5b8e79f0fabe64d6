use std::sync::Arc;

use crate::{
    application::dto::RatingDto,
    domain::{entities::UserId, repositories::RatingRepository},
    presentation::middleware::error::AppError,
};

/// Use case for listing every rating a user has given
pub struct ListUserRatingsUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> ListUserRatingsUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, user_id: UserId) -> Result<Vec<RatingDto>, AppError> {
        tracing::info!("Listing ratings of user {}", user_id);

        let ratings = self.repository.list_for_user(user_id).await?;
        Ok(ratings.into_iter().map(Into::into).collect())
    }
}
