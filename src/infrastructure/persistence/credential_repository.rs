use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entities::{StoredCredentials, UserId};
use crate::domain::repositories::{CredentialRepository, RepositoryError};

/// Reads login records from `user_data`
#[derive(Clone)]
pub struct PostgresCredentialRepository {
    pool: PgPool,
}

impl PostgresCredentialRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialRepository for PostgresCredentialRepository {
    async fn find_by_login(
        &self,
        login: &str,
    ) -> Result<Option<StoredCredentials>, RepositoryError> {
        let row = sqlx::query_as::<_, (Uuid, String, bool)>(
            "SELECT id, password_hash, is_admin FROM user_data WHERE login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::Unavailable { message: e.to_string() })?;

        Ok(row.map(|(id, password_hash, is_admin)| StoredCredentials {
            subject_id: UserId::from_uuid(id),
            password_hash,
            is_admin,
        }))
    }
}
