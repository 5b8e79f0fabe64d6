use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use movie_catalog_service::domain::{
    entities::{
        Identity, MovieId, Rating, RatingAggregate, RatingDelta, RatingMutation, StoredCredentials,
        UserId,
    },
    repositories::{CredentialRepository, RatingRepository, RepositoryError},
};
use movie_catalog_service::infrastructure::auth::hash_password;

#[derive(Default)]
struct Catalog {
    aggregates: HashMap<MovieId, RatingAggregate>,
    ratings: HashMap<(UserId, MovieId), Rating>,
    users: HashMap<String, StoredCredentials>,
}

/// Single-lock in-memory catalog implementing both storage contracts
#[derive(Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<Mutex<Catalog>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_movie(&self) -> MovieId {
        let movie_id = MovieId::new();
        self.inner.lock().unwrap().aggregates.insert(movie_id, RatingAggregate::unrated(movie_id));
        movie_id
    }

    pub fn add_user(&self, login: &str, password: &str, is_admin: bool) -> Identity {
        let identity = Identity { subject_id: UserId::new(), is_admin };
        self.inner.lock().unwrap().users.insert(
            login.to_string(),
            StoredCredentials {
                subject_id: identity.subject_id,
                password_hash: hash_password(password).unwrap(),
                is_admin,
            },
        );
        identity
    }

    pub fn aggregate_of(&self, movie_id: MovieId) -> RatingAggregate {
        self.inner.lock().unwrap().aggregates[&movie_id]
    }

    fn commit(
        catalog: &mut Catalog,
        movie_id: MovieId,
        delta: RatingDelta,
        operation: &'static str,
    ) -> Result<RatingAggregate, RepositoryError> {
        let current = *catalog
            .aggregates
            .get(&movie_id)
            .ok_or_else(|| RepositoryError::movie_not_found(movie_id))?;
        let next = current.apply(delta).map_err(|e| RepositoryError::AggregateWriteFailed {
            operation,
            message: e.to_string(),
        })?;
        catalog.aggregates.insert(movie_id, next);
        Ok(next)
    }
}

#[async_trait]
impl RatingRepository for InMemoryCatalog {
    async fn create(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError> {
        let mut catalog = self.inner.lock().unwrap();
        let key = (rating.user_id, rating.movie_id);
        if catalog.ratings.contains_key(&key) {
            return Err(RepositoryError::AlreadyRated {
                user_id: rating.user_id,
                movie_id: rating.movie_id,
            });
        }
        let aggregate =
            Self::commit(&mut catalog, rating.movie_id, RatingDelta::created(rating.score), "create")?;
        catalog.ratings.insert(key, *rating);
        Ok(RatingMutation { rating: *rating, aggregate })
    }

    async fn update(&self, rating: &Rating) -> Result<RatingMutation, RepositoryError> {
        let mut catalog = self.inner.lock().unwrap();
        let key = (rating.user_id, rating.movie_id);
        let old = catalog
            .ratings
            .get(&key)
            .ok_or_else(|| RepositoryError::rating_not_found(rating.user_id, rating.movie_id))?
            .score;
        let aggregate = Self::commit(
            &mut catalog,
            rating.movie_id,
            RatingDelta::changed(old, rating.score),
            "update",
        )?;
        catalog.ratings.insert(key, *rating);
        Ok(RatingMutation { rating: *rating, aggregate })
    }

    async fn delete(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<RatingAggregate, RepositoryError> {
        let mut catalog = self.inner.lock().unwrap();
        let removed = catalog
            .ratings
            .get(&(user_id, movie_id))
            .ok_or_else(|| RepositoryError::rating_not_found(user_id, movie_id))?
            .score;
        let aggregate = Self::commit(&mut catalog, movie_id, RatingDelta::removed(removed), "delete")?;
        catalog.ratings.remove(&(user_id, movie_id));
        Ok(aggregate)
    }

    async fn aggregate(
        &self,
        movie_id: MovieId,
    ) -> Result<Option<RatingAggregate>, RepositoryError> {
        Ok(self.inner.lock().unwrap().aggregates.get(&movie_id).copied())
    }

    async fn find(
        &self,
        user_id: UserId,
        movie_id: MovieId,
    ) -> Result<Option<Rating>, RepositoryError> {
        Ok(self.inner.lock().unwrap().ratings.get(&(user_id, movie_id)).copied())
    }

    async fn list_for_movie(&self, movie_id: MovieId) -> Result<Vec<Rating>, RepositoryError> {
        let catalog = self.inner.lock().unwrap();
        Ok(catalog.ratings.values().filter(|r| r.movie_id == movie_id).copied().collect())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Rating>, RepositoryError> {
        let catalog = self.inner.lock().unwrap();
        Ok(catalog.ratings.values().filter(|r| r.user_id == user_id).copied().collect())
    }

    async fn reconcile(&self, movie_id: MovieId) -> Result<RatingAggregate, RepositoryError> {
        let mut catalog = self.inner.lock().unwrap();
        if !catalog.aggregates.contains_key(&movie_id) {
            return Err(RepositoryError::movie_not_found(movie_id));
        }
        let recomputed = RatingAggregate::from_scores(
            movie_id,
            catalog.ratings.values().filter(|r| r.movie_id == movie_id).map(|r| r.score),
        );
        catalog.aggregates.insert(movie_id, recomputed);
        Ok(recomputed)
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[async_trait]
impl CredentialRepository for InMemoryCatalog {
    async fn find_by_login(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        Ok(self.inner.lock().unwrap().users.get(login).cloned())
    }
}
