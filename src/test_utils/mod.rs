#[cfg(test)]
pub mod mocks {
    use async_trait::async_trait;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use crate::domain::{
        entities::{
            Identity, MovieId, Rating, RatingAggregate, RatingDelta, RatingMutation,
            StoredCredentials, UserId,
        },
        repositories::{CredentialRepository, RatingRepository, RepositoryError},
    };
    use crate::infrastructure::auth::hash_password;

    #[derive(Default)]
    struct RatingStore {
        aggregates: HashMap<MovieId, RatingAggregate>,
        // Ordered so listings are deterministic
        ratings: BTreeMap<(UserId, MovieId), Rating>,
    }

    impl RatingStore {
        fn stage_delta(
            &self,
            movie_id: MovieId,
            delta: RatingDelta,
            operation: &'static str,
        ) -> Result<RatingAggregate, RepositoryError> {
            let current = self
                .aggregates
                .get(&movie_id)
                .copied()
                .ok_or_else(|| RepositoryError::movie_not_found(movie_id))?;

            current.apply(delta).map_err(|e| RepositoryError::AggregateWriteFailed {
                operation,
                message: e.to_string(),
            })
        }
    }

    /// In-memory `RatingRepository` with single-lock transactions
    ///
    /// Every compound write stages the rating change and the aggregate delta,
    /// then commits both under the same guard. With `fail_aggregate_writes`
    /// set, staging succeeds but the commit is refused, leaving nothing behind.
    #[derive(Clone, Default)]
    pub struct InMemoryRatingRepository {
        store: Arc<Mutex<RatingStore>>,
        fail_aggregate_writes: Arc<AtomicBool>,
        unavailable: Arc<AtomicBool>,
    }

    impl InMemoryRatingRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// # Panics
        /// Panics if the internal mutex is poisoned
        #[must_use]
        pub fn with_movie(self, movie_id: MovieId) -> Self {
            self.store.lock().unwrap().aggregates.insert(movie_id, RatingAggregate::unrated(movie_id));
            self
        }

        /// Seed a rating and count it in its movie's aggregate
        ///
        /// # Panics
        /// Panics if the movie was not seeded first
        #[must_use]
        pub fn with_rating(self, rating: Rating) -> Self {
            {
                let mut store = self.store.lock().unwrap();
                let aggregate = store
                    .stage_delta(rating.movie_id, RatingDelta::created(rating.score), "seed")
                    .unwrap();
                store.aggregates.insert(rating.movie_id, aggregate);
                store.ratings.insert((rating.user_id, rating.movie_id), rating);
            }
            self
        }

        /// Overwrite a stored aggregate, simulating drift from the rating rows
        pub fn corrupt_aggregate(&self, aggregate: RatingAggregate) {
            self.store.lock().unwrap().aggregates.insert(aggregate.movie_id, aggregate);
        }

        pub fn fail_aggregate_writes(&self, fail: bool) {
            self.fail_aggregate_writes.store(fail, Ordering::SeqCst);
        }

        pub fn set_unavailable(&self, unavailable: bool) {
            self.unavailable.store(unavailable, Ordering::SeqCst);
        }

        pub fn stored_aggregate(&self, movie_id: MovieId) -> Option<RatingAggregate> {
            self.store.lock().unwrap().aggregates.get(&movie_id).copied()
        }

        pub fn stored_rating(&self, user_id: UserId, movie_id: MovieId) -> Option<Rating> {
            self.store.lock().unwrap().ratings.get(&(user_id, movie_id)).copied()
        }

        fn check_commit(&self, operation: &'static str) -> Result<(), RepositoryError> {
            if self.fail_aggregate_writes.load(Ordering::SeqCst) {
                return Err(RepositoryError::AggregateWriteFailed {
                    operation,
                    message: "injected aggregate write failure".to_string(),
                });
            }
            Ok(())
        }
    }

    #[async_trait]
    impl RatingRepository for InMemoryRatingRepository {
        async fn create(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError> {
            let mut store = self.store.lock().unwrap();

            if store.ratings.contains_key(&(rating.user_id, rating.movie_id)) {
                return Err(RepositoryError::AlreadyRated {
                    user_id: rating.user_id,
                    movie_id: rating.movie_id,
                });
            }
            let aggregate =
                store.stage_delta(rating.movie_id, RatingDelta::created(rating.score), "create")?;
            self.check_commit("create")?;

            store.ratings.insert((rating.user_id, rating.movie_id), *rating);
            store.aggregates.insert(rating.movie_id, aggregate);
            Ok(RatingMutation { rating: *rating, aggregate })
        }

        async fn update(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError> {
            let mut store = self.store.lock().unwrap();

            let old = store
                .ratings
                .get(&(rating.user_id, rating.movie_id))
                .ok_or_else(|| RepositoryError::rating_not_found(rating.user_id, rating.movie_id))?
                .score;
            let aggregate = store.stage_delta(
                rating.movie_id,
                RatingDelta::changed(old, rating.score),
                "update",
            )?;
            self.check_commit("update")?;

            store.ratings.insert((rating.user_id, rating.movie_id), *rating);
            store.aggregates.insert(rating.movie_id, aggregate);
            Ok(RatingMutation { rating: *rating, aggregate })
        }

        async fn delete(
            &self,
            user_id: UserId,
            movie_id: MovieId,
        ) -> Result<RatingAggregate, RepositoryError> {
            let mut store = self.store.lock().unwrap();

            let removed = store
                .ratings
                .get(&(user_id, movie_id))
                .ok_or_else(|| RepositoryError::rating_not_found(user_id, movie_id))?
                .score;
            let aggregate = store.stage_delta(movie_id, RatingDelta::removed(removed), "delete")?;
            self.check_commit("delete")?;

            store.ratings.remove(&(user_id, movie_id));
            store.aggregates.insert(movie_id, aggregate);
            Ok(aggregate)
        }

        async fn aggregate(
            &self,
            movie_id: MovieId,
        ) -> Result<Option<RatingAggregate>, RepositoryError> {
            Ok(self.stored_aggregate(movie_id))
        }

        async fn find(
            &self,
            user_id: UserId,
            movie_id: MovieId,
        ) -> Result<Option<Rating>, RepositoryError> {
            Ok(self.stored_rating(user_id, movie_id))
        }

        async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<Rating>, RepositoryError> {
            let store = self.store.lock().unwrap();
            Ok(store.ratings.values().filter(|r| r.movie_id == movie_id).copied().collect())
        }

        async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Rating>, RepositoryError> {
            let store = self.store.lock().unwrap();
            Ok(store.ratings.values().filter(|r| r.user_id == user_id).copied().collect())
        }

        async fn reconcile(&self, movie_id: MovieId) -> Result<RatingAggregate, RepositoryError> {
            let mut store = self.store.lock().unwrap();

            if !store.aggregates.contains_key(&movie_id) {
                return Err(RepositoryError::movie_not_found(movie_id));
            }
            let recomputed = RatingAggregate::from_scores(
                movie_id,
                store.ratings.values().filter(|r| r.movie_id == movie_id).map(|r| r.score),
            );
            store.aggregates.insert(movie_id, recomputed);
            Ok(recomputed)
        }

        async fn health_check(&self) -> Result<(), RepositoryError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(RepositoryError::Unavailable { message: "store offline".to_string() });
            }
            Ok(())
        }
    }

    /// In-memory `CredentialRepository` keyed by login
    #[derive(Clone, Default)]
    pub struct InMemoryCredentialRepository {
        users: Arc<Mutex<HashMap<String, StoredCredentials>>>,
    }

    impl InMemoryCredentialRepository {
        pub fn new() -> Self {
            Self::default()
        }

        /// # Panics
        /// Panics if hashing fails or the internal mutex is poisoned
        #[must_use]
        pub fn with_user(self, login: &str, password: &str, identity: Identity) -> Self {
            let credentials = StoredCredentials {
                subject_id: identity.subject_id,
                password_hash: hash_password(password).unwrap(),
                is_admin: identity.is_admin,
            };
            self.users.lock().unwrap().insert(login.to_string(), credentials);
            self
        }
    }

    #[async_trait]
    impl CredentialRepository for InMemoryCredentialRepository {
        async fn find_by_login(
            &self,
            login: &str,
        ) -> Result<Option<StoredCredentials>, RepositoryError> {
            Ok(self.users.lock().unwrap().get(login).cloned())
        }
    }
}
