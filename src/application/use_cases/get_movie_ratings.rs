use std::sync::Arc;

use crate::{
    application::dto::{MovieRatingsResponse, RatingAggregateDto},
    domain::{
        entities::MovieId,
        repositories::{RatingRepository, RepositoryError},
    },
    presentation::middleware::error::AppError,
};

/// Use case for reading a movie's aggregate together with its individual ratings
pub struct GetMovieRatingsUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    repository: Arc<R>,
}

impl<R> GetMovieRatingsUseCase<R>
where
    R: RatingRepository + ?Sized,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Aggregate only; `NotFound` for an unknown movie
    pub async fn aggregate(&self, movie_id: MovieId) -> Result<RatingAggregateDto, AppError> {
        let aggregate = self
            .repository
            .aggregate(movie_id)
            .await?
            .ok_or_else(|| RepositoryError::movie_not_found(movie_id))?;

        Ok(aggregate.into())
    }

    pub async fn execute(&self, movie_id: MovieId) -> Result<MovieRatingsResponse, AppError> {
        tracing::info!("Getting ratings of movie {}", movie_id);

        let aggregate = self.aggregate(movie_id).await?;
        let ratings = self.repository.list_for_movie(movie_id).await?;

        Ok(MovieRatingsResponse {
            aggregate,
            ratings: ratings.into_iter().map(Into::into).collect(),
        })
    }
}
