//! Sessions repository for database operations

use chrono::{DateTime, Utc};
use sqlx::{Pool, Sqlite};

use crate::{error::AppResult, models::session::Session};

#[derive(Clone)]
pub struct SessionsRepository {
    pool: Pool<Sqlite>,
}

impl SessionsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, session: &Session) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO sessions (id, principal_kind, principal_id, created_at, expires_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(session.principal_kind)
        .bind(session.principal_id)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get(&self, id: &str) -> AppResult<Option<Session>> {
        let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(session)
    }

    /// Delete a session, returning whether it existed
    pub async fn delete(&self, id: &str) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Drop every session that expired at or before `now`
    pub async fn delete_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::{models::PrincipalKind, repository::testing};

    #[tokio::test]
    async fn create_get_delete() {
        let repo = testing::repository().await.sessions;
        let now = Utc::now();
        let session = Session {
            id: "sid-1".to_string(),
            principal_kind: PrincipalKind::Librarian,
            principal_id: 3,
            created_at: now,
            expires_at: now + Duration::hours(1),
        };

        repo.create(&session).await.unwrap();
        let stored = repo.get("sid-1").await.unwrap().unwrap();
        assert_eq!(stored.principal_kind, PrincipalKind::Librarian);
        assert_eq!(stored.principal_id, 3);

        assert!(repo.delete("sid-1").await.unwrap());
        assert!(!repo.delete("sid-1").await.unwrap());
        assert!(repo.get("sid-1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_expired_keeps_live_sessions() {
        let repo = testing::repository().await.sessions;
        let now = Utc::now();

        for (id, expires_at) in [
            ("old-1", now - Duration::hours(2)),
            ("old-2", now - Duration::minutes(1)),
            ("live", now + Duration::hours(1)),
        ] {
            repo.create(&Session {
                id: id.to_string(),
                principal_kind: PrincipalKind::Student,
                principal_id: 1,
                created_at: expires_at - Duration::hours(24),
                expires_at,
            })
            .await
            .unwrap();
        }

        assert_eq!(repo.delete_expired(now).await.unwrap(), 2);
        assert!(repo.get("old-1").await.unwrap().is_none());
        assert!(repo.get("old-2").await.unwrap().is_none());
        assert!(repo.get("live").await.unwrap().is_some());
    }
}
