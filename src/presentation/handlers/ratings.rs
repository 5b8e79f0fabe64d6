use axum::{
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    response::Json,
};

use super::AppState;
use crate::application::{
    dto::{
        DeleteRatingRequest, MovieRatingsResponse, RateMovieRequest, RatingAggregateDto, RatingDto,
        RatingMutationResponse, RatingQuery,
    },
    use_cases::{
        CreateRatingUseCase, DeleteRatingUseCase, GetMovieRatingsUseCase, GetRatingUseCase,
        ListUserRatingsUseCase, ReconcileAggregateUseCase, UpdateRatingUseCase,
    },
};
use crate::domain::{
    entities::{MovieId, UserId},
    value_objects::RatingScore,
};
use crate::presentation::middleware::{auth::AuthContext, error::AppError};

/// Rate a movie as the authenticated caller
///
/// # Errors
/// `Validation` for an out-of-range score, `Conflict` if already rated
pub async fn create_rating(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<RateMovieRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<RatingMutationResponse>), AppError> {
    let Json(request) = payload?;
    let score = RatingScore::new(request.rating)?;

    let response = CreateRatingUseCase::new(state.ratings.clone())
        .execute(auth.claim(), request.movie_id, score)
        .await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Change the authenticated caller's rating of a movie
///
/// # Errors
/// `Validation` for an out-of-range score, `NotFound` if there is nothing to change
pub async fn update_rating(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<RateMovieRequest>, JsonRejection>,
) -> Result<Json<RatingMutationResponse>, AppError> {
    let Json(request) = payload?;
    let score = RatingScore::new(request.rating)?;

    let response = UpdateRatingUseCase::new(state.ratings.clone())
        .execute(auth.claim(), request.movie_id, score)
        .await?;

    Ok(Json(response))
}

/// Delete a rating; owners and admins only
///
/// # Errors
/// `Authorization` when the caller may not touch the rating
pub async fn delete_rating(
    State(state): State<AppState>,
    auth: AuthContext,
    payload: Result<Json<DeleteRatingRequest>, JsonRejection>,
) -> Result<Json<RatingAggregateDto>, AppError> {
    let Json(request) = payload?;

    let aggregate = DeleteRatingUseCase::new(state.ratings.clone())
        .execute(auth.claim(), request.user_id, request.movie_id)
        .await?;

    Ok(Json(aggregate))
}

pub async fn get_movie_ratings(
    State(state): State<AppState>,
    movie_id: Result<Path<MovieId>, PathRejection>,
) -> Result<Json<MovieRatingsResponse>, AppError> {
    let Path(movie_id) = movie_id?;
    let response = GetMovieRatingsUseCase::new(state.ratings.clone()).execute(movie_id).await?;
    Ok(Json(response))
}

pub async fn list_user_ratings(
    State(state): State<AppState>,
    user_id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<Vec<RatingDto>>, AppError> {
    let Path(user_id) = user_id?;
    let ratings = ListUserRatingsUseCase::new(state.ratings.clone()).execute(user_id).await?;
    Ok(Json(ratings))
}

pub async fn get_rating(
    State(state): State<AppState>,
    query: Result<Query<RatingQuery>, QueryRejection>,
) -> Result<Json<RatingDto>, AppError> {
    let Query(query) = query?;
    let rating =
        GetRatingUseCase::new(state.ratings.clone()).execute(query.user_id, query.movie_id).await?;
    Ok(Json(rating))
}

/// Recompute a movie's aggregate from its rating rows
pub async fn reconcile_aggregate(
    State(state): State<AppState>,
    auth: AuthContext,
    movie_id: Result<Path<MovieId>, PathRejection>,
) -> Result<Json<RatingAggregateDto>, AppError> {
    let Path(movie_id) = movie_id?;
    let aggregate =
        ReconcileAggregateUseCase::new(state.ratings.clone()).execute(auth.claim(), movie_id).await?;
    Ok(Json(aggregate))
}
