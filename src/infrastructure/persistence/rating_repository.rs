use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::entities::{
    MovieId, Rating, RatingAggregate, RatingDelta, RatingMutation, UserId,
};
use crate::domain::repositories::{RatingRepository, RepositoryError};
use crate::domain::value_objects::RatingScore;

const USER_FOREIGN_KEY: &str = "rated_movie_user_id_fkey";

/// `PostgreSQL` implementation of `RatingRepository`
///
/// Each compound write runs in a single transaction. The aggregate columns on
/// `movie` are only ever changed by `amount_rates = amount_rates + $n`, so
/// concurrent writers to one movie serialize on that row without lost updates.
/// Returning early drops the transaction, which rolls it back.
#[derive(Clone)]
pub struct PostgresRatingRepository {
    pool: PgPool,
}

impl PostgresRatingRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn write_failed(operation: &'static str) -> impl Fn(sqlx::Error) -> RepositoryError {
    move |e| RepositoryError::AggregateWriteFailed { operation, message: e.to_string() }
}

fn read_failed(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Unavailable { message: e.to_string() }
}

/// Map a stored score back into the domain, flagging rows that bypassed the range check
fn score_from_row(value: i32) -> Result<RatingScore, RepositoryError> {
    RatingScore::new(value)
        .map_err(|e| RepositoryError::Unavailable { message: format!("Corrupt rating row: {e}") })
}

/// Stored score read back inside a compound write; a corrupt value aborts the write
fn locked_score_from_row(operation: &'static str, value: i32) -> Result<RatingScore, RepositoryError> {
    RatingScore::new(value).map_err(|e| RepositoryError::AggregateWriteFailed {
        operation,
        message: format!("Corrupt rating row: {e}"),
    })
}

fn rating_from_row((user_id, movie_id, rating): (Uuid, Uuid, i32)) -> Result<Rating, RepositoryError> {
    Ok(Rating::new(UserId::from_uuid(user_id), MovieId::from_uuid(movie_id), score_from_row(rating)?))
}

fn classify_insert_error(rating: &Rating, err: sqlx::Error) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return RepositoryError::AlreadyRated {
                user_id: rating.user_id,
                movie_id: rating.movie_id,
            };
        }
        if db_err.is_foreign_key_violation() {
            return if db_err.constraint() == Some(USER_FOREIGN_KEY) {
                RepositoryError::NotFound { resource: format!("User with ID {}", rating.user_id) }
            } else {
                RepositoryError::movie_not_found(rating.movie_id)
            };
        }
    }
    write_failed("create")(err)
}

/// Add `delta` to the movie's stored aggregate and return the committed-to-be values
async fn apply_delta(
    conn: &mut PgConnection,
    movie_id: MovieId,
    delta: RatingDelta,
    operation: &'static str,
) -> Result<RatingAggregate, RepositoryError> {
    let row = sqlx::query_as::<_, (i64, i64)>(
        r"
        UPDATE movie
        SET amount_rates = amount_rates + $2,
            total_rating_value = total_rating_value + $3
        WHERE id = $1
        RETURNING amount_rates, total_rating_value
        ",
    )
    .bind(movie_id.as_uuid())
    .bind(delta.count)
    .bind(delta.total)
    .fetch_optional(conn)
    .await
    .map_err(write_failed(operation))?;

    let (rating_count, rating_total) = row.ok_or_else(|| RepositoryError::movie_not_found(movie_id))?;
    Ok(RatingAggregate { movie_id, rating_count, rating_total })
}

#[async_trait]
impl RatingRepository for PostgresRatingRepository {
    async fn create(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(write_failed("create"))?;

        sqlx::query("INSERT INTO rated_movie (user_id, movie_id, rating) VALUES ($1, $2, $3)")
            .bind(rating.user_id.as_uuid())
            .bind(rating.movie_id.as_uuid())
            .bind(rating.score.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| classify_insert_error(rating, e))?;

        let aggregate =
            apply_delta(&mut tx, rating.movie_id, RatingDelta::created(rating.score), "create")
                .await?;

        tx.commit().await.map_err(write_failed("create"))?;

        debug!(movie_id = %rating.movie_id, count = aggregate.rating_count, "Rating created");
        Ok(RatingMutation { rating: *rating, aggregate })
    }

    async fn update(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(write_failed("update"))?;

        let old = sqlx::query_scalar::<_, i32>(
            "SELECT rating FROM rated_movie WHERE user_id = $1 AND movie_id = $2 FOR UPDATE",
        )
        .bind(rating.user_id.as_uuid())
        .bind(rating.movie_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(write_failed("update"))?
        .ok_or_else(|| RepositoryError::rating_not_found(rating.user_id, rating.movie_id))?;
        let old = locked_score_from_row("update", old)?;

        sqlx::query("UPDATE rated_movie SET rating = $3 WHERE user_id = $1 AND movie_id = $2")
            .bind(rating.user_id.as_uuid())
            .bind(rating.movie_id.as_uuid())
            .bind(rating.score.value())
            .execute(&mut *tx)
            .await
            .map_err(write_failed("update"))?;

        let aggregate = apply_delta(
            &mut tx,
            rating.movie_id,
            RatingDelta::changed(old, rating.score),
            "update",
        )
        .await?;

        tx.commit().await.map_err(write_failed("update"))?;

        Ok(RatingMutation { rating: *rating, aggregate })
    }

    async fn delete(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<RatingAggregate, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(write_failed("delete"))?;

        let removed = sqlx::query_scalar::<_, i32>(
            "DELETE FROM rated_movie WHERE user_id = $1 AND movie_id = $2 RETURNING rating",
        )
        .bind(user_id.as_uuid())
        .bind(movie_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(write_failed("delete"))?
        .ok_or_else(|| RepositoryError::rating_not_found(user_id, movie_id))?;
        let removed = locked_score_from_row("delete", removed)?;

        let aggregate =
            apply_delta(&mut tx, movie_id, RatingDelta::removed(removed), "delete").await?;

        tx.commit().await.map_err(write_failed("delete"))?;

        Ok(aggregate)
    }

    async fn aggregate(
        &self,
        movie_id: MovieId,
    ) -> Result<Option<RatingAggregate>, RepositoryError> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            "SELECT amount_rates, total_rating_value FROM movie WHERE id = $1",
        )
        .bind(movie_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_failed)?;

        Ok(row.map(|(rating_count, rating_total)| RatingAggregate {
            movie_id,
            rating_count,
            rating_total,
        }))
    }

    async fn find(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<Option<Rating>, RepositoryError> {
        let row = sqlx::query_as::<_, (Uuid, Uuid, i32)>(
            "SELECT user_id, movie_id, rating FROM rated_movie WHERE user_id = $1 AND movie_id = $2",
        )
        .bind(user_id.as_uuid())
        .bind(movie_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(read_failed)?;

        row.map(rating_from_row).transpose()
    }

    async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<Rating>, RepositoryError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, i32)>(
            "SELECT user_id, movie_id, rating FROM rated_movie WHERE movie_id = $1 ORDER BY user_id",
        )
        .bind(movie_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(read_failed)?;

        rows.into_iter().map(rating_from_row).collect()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Rating>, RepositoryError> {
        let rows = sqlx::query_as::<_, (Uuid, Uuid, i32)>(
            "SELECT user_id, movie_id, rating FROM rated_movie WHERE user_id = $1 ORDER BY movie_id",
        )
        .bind(user_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(read_failed)?;

        rows.into_iter().map(rating_from_row).collect()
    }

    async fn reconcile(&self, movie_id: MovieId) -> Result<RatingAggregate, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(write_failed("reconcile"))?;

        // Writers block on this lock before touching the aggregate, so the
        // recount cannot interleave with an in-flight delta
        let stored = sqlx::query_as::<_, (i64, i64)>(
            "SELECT amount_rates, total_rating_value FROM movie WHERE id = $1 FOR UPDATE",
        )
        .bind(movie_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(write_failed("reconcile"))?
        .ok_or_else(|| RepositoryError::movie_not_found(movie_id))?;

        let (rating_count, rating_total) = sqlx::query_as::<_, (i64, i64)>(
            r"
            SELECT COUNT(*)::BIGINT, COALESCE(SUM(rating), 0)::BIGINT
            FROM rated_movie
            WHERE movie_id = $1
            ",
        )
        .bind(movie_id.as_uuid())
        .fetch_one(&mut *tx)
        .await
        .map_err(write_failed("reconcile"))?;

        if stored != (rating_count, rating_total) {
            warn!(
                movie_id = %movie_id,
                stored_count = stored.0,
                stored_total = stored.1,
                rating_count,
                rating_total,
                "Aggregate drift detected, rewriting from rating rows"
            );
        }

        sqlx::query("UPDATE movie SET amount_rates = $2, total_rating_value = $3 WHERE id = $1")
            .bind(movie_id.as_uuid())
            .bind(rating_count)
            .bind(rating_total)
            .execute(&mut *tx)
            .await
            .map_err(write_failed("reconcile"))?;

        tx.commit().await.map_err(write_failed("reconcile"))?;

        Ok(RatingAggregate { movie_id, rating_count, rating_total })
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await.map_err(read_failed)?;
        Ok(())
    }
}
