use sqlx::types::Json;
use sqlx::PgPool;
use thiserror::Error;
use uuid::Uuid;

use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::application::{Application, ApplicationDraft};
use crate::database::models::user::User;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("record not found: {0}")]
    NotFound(Uuid),

    #[error("record is owned by another user")]
    NotOwner,

    #[error("email already registered: {0}")]
    DuplicateEmail(String),

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub async fn new() -> Result<Self, RepositoryError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    pub async fn create(&self, email: &str, password_hash: &str) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::DuplicateEmail(email.to_string())
            }
            _ => RepositoryError::Sqlx(e),
        })
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}

/// Ownership-scoped persistence for application records. Every read and
/// mutation is checked against the caller's identity before touching the
/// row.
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    pub async fn new() -> Result<Self, RepositoryError> {
        Ok(Self {
            pool: DatabaseManager::pool().await?,
        })
    }

    /// Upsert-by-identifier save used by every wizard step and by final
    /// submission alike. Returns the persisted record plus whether it
    /// was newly created.
    ///
    /// Without an id the snapshot becomes a new record owned by the
    /// caller. With an id the record must exist and belong to the
    /// caller, and every mutable field is overwritten - including the
    /// whole projects array. Concurrent saves race; last writer wins.
    pub async fn save(
        &self,
        owner_id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<(Application, bool), RepositoryError> {
        let draft = draft.clone().coerced();

        match draft.id {
            None => {
                let application = self.insert(owner_id, &draft).await?;
                Ok((application, true))
            }
            Some(id) => {
                let existing = self
                    .fetch(id)
                    .await?
                    .ok_or(RepositoryError::NotFound(id))?;
                if existing.owner_id != owner_id {
                    return Err(RepositoryError::NotOwner);
                }
                let application = self.replace(id, &draft).await?;
                Ok((application, false))
            }
        }
    }

    async fn insert(
        &self,
        owner_id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Application, RepositoryError> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications
                (owner_id, name, email, address_line1, address_line2,
                 city, state, zipcode, is_studying, studying_at, projects)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.address_line1)
        .bind(&draft.address_line2)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.zipcode)
        .bind(draft.is_studying)
        .bind(&draft.studying_at)
        .bind(Json(&draft.projects))
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    async fn replace(
        &self,
        id: Uuid,
        draft: &ApplicationDraft,
    ) -> Result<Application, RepositoryError> {
        let application = sqlx::query_as::<_, Application>(
            r#"
            UPDATE applications SET
                name = $2,
                email = $3,
                address_line1 = $4,
                address_line2 = $5,
                city = $6,
                state = $7,
                zipcode = $8,
                is_studying = $9,
                studying_at = $10,
                projects = $11,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.address_line1)
        .bind(&draft.address_line2)
        .bind(&draft.city)
        .bind(&draft.state)
        .bind(&draft.zipcode)
        .bind(draft.is_studying)
        .bind(&draft.studying_at)
        .bind(Json(&draft.projects))
        .fetch_one(&self.pool)
        .await?;
        Ok(application)
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<Application>, RepositoryError> {
        let application =
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(application)
    }

    /// All records owned by the caller, most recently touched first
    pub async fn list_owned(&self, owner_id: Uuid) -> Result<Vec<Application>, RepositoryError> {
        let applications = sqlx::query_as::<_, Application>(
            "SELECT * FROM applications WHERE owner_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(applications)
    }

    /// Single record, only if the caller owns it
    pub async fn fetch_owned(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> Result<Application, RepositoryError> {
        let application = self
            .fetch(id)
            .await?
            .ok_or(RepositoryError::NotFound(id))?;
        if application.owner_id != owner_id {
            return Err(RepositoryError::NotOwner);
        }
        Ok(application)
    }

    /// Permanent removal; there is no soft delete or audit trail
    pub async fn delete_owned(&self, id: Uuid, owner_id: Uuid) -> Result<(), RepositoryError> {
        // Ownership check first so a foreign id fails before any mutation
        self.fetch_owned(id, owner_id).await?;

        sqlx::query("DELETE FROM applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
