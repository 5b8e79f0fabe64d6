mod create_rating;
mod delete_rating;
mod get_movie_ratings;
mod get_rating;
mod list_user_ratings;
mod login;
mod reconcile_aggregate;
mod update_rating;

pub use create_rating::CreateRatingUseCase;
pub use delete_rating::DeleteRatingUseCase;
pub use get_movie_ratings::GetMovieRatingsUseCase;
pub use get_rating::GetRatingUseCase;
pub use list_user_ratings::ListUserRatingsUseCase;
pub use login::LoginUseCase;
pub use reconcile_aggregate::ReconcileAggregateUseCase;
pub use update_rating::UpdateRatingUseCase;
