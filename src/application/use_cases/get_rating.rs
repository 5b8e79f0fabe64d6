use std::sync::Arc;

use crate::{
    application::dto::RatingDto,
    domain::{
        entities::{MovieId, UserId},
        repositories::{RatingRepository, RepositoryError},
    },
    presentation::middleware::error::AppError,
};

/// Use case for looking up one user's rating of one movie
pub struct GetRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> GetRatingUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn execute(&self, user_id: UserId, movie_id: MovieId) -> Result<RatingDto, AppError> {
        let rating = self.repository.find(user_id, movie_id).await?;

        match rating {
            Some(rating) => Ok(rating.into()),
            None => {
                tracing::warn!("No rating of movie {} by user {}", movie_id, user_id);
                Err(RepositoryError::rating_not_found(user_id, movie_id).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{entities::Rating, value_objects::RatingScore},
        test_utils::mocks::InMemoryRatingRepository,
    };

    #[tokio::test]
    async fn test_finds_existing_rating() {
        let (user_id, movie_id) = (UserId::new(), MovieId::new());
        let repository = InMemoryRatingRepository::new()
            .with_movie(movie_id)
            .with_rating(Rating::new(user_id, movie_id, RatingScore::new(7).unwrap()));
        let use_case = GetRatingUseCase::new(Arc::new(repository));

        let rating = use_case.execute(user_id, movie_id).await.unwrap();

        assert_eq!(rating, RatingDto { user_id, movie_id, rating: 7 });
    }

    #[tokio::test]
    async fn test_missing_rating_is_not_found() {
        let use_case = GetRatingUseCase::new(Arc::new(InMemoryRatingRepository::new()));

        let result = use_case.execute(UserId::new(), MovieId::new()).await;

        assert!(matches!(result, Err(AppError::NotFound { .. })));
    }
}
