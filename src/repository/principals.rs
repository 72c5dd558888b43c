//! Principals repository for database operations
//!
//! Every query is scoped to a single variant table. Cross-variant
//! resolution lives in the auth service.

use chrono::Utc;
use sqlx::{Pool, Sqlite};

use crate::{
    error::{AppError, AppResult},
    models::principal::{NewPrincipal, Principal, PrincipalKind, PrincipalRow},
};

#[derive(Clone)]
pub struct PrincipalsRepository {
    pool: Pool<Sqlite>,
}

/// Column list shared by every variant table
fn columns(kind: PrincipalKind) -> &'static str {
    match kind {
        PrincipalKind::Student => "id, name, email, password, serie, created_at",
        _ => "id, name, email, password, NULL AS serie, created_at",
    }
}

impl PrincipalsRepository {
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Get principal of the given variant by email (case-insensitive)
    pub async fn find_by_email(&self, kind: PrincipalKind, email: &str) -> AppResult<Option<Principal>> {
        let sql = format!("SELECT {} FROM {} WHERE email = ?", columns(kind), kind.table());

        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_principal(kind)))
    }

    /// Get principal of the given variant by ID
    pub async fn find_by_id(&self, kind: PrincipalKind, id: i64) -> AppResult<Option<Principal>> {
        let sql = format!("SELECT {} FROM {} WHERE id = ?", columns(kind), kind.table());

        let row = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.into_principal(kind)))
    }

    /// Check if email already exists within the variant's table
    pub async fn email_exists(&self, kind: PrincipalKind, email: &str) -> AppResult<bool> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE email = ?)", kind.table());

        let exists: bool = sqlx::query_scalar(&sql)
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// List every principal of the variant in storage order
    pub async fn list(&self, kind: PrincipalKind) -> AppResult<Vec<Principal>> {
        let sql = format!("SELECT {} FROM {} ORDER BY id", columns(kind), kind.table());

        let rows = sqlx::query_as::<_, PrincipalRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|r| r.into_principal(kind)).collect())
    }

    /// Insert a principal into the variant's table.
    /// Fails with `DuplicateEmail` when the email is taken in that table only.
    pub async fn create(&self, kind: PrincipalKind, principal: &NewPrincipal) -> AppResult<Principal> {
        let sql = match kind {
            PrincipalKind::Student => format!(
                "INSERT INTO students (name, email, password, serie, created_at) \
                 VALUES (?, ?, ?, ?, ?) RETURNING {}",
                columns(kind)
            ),
            _ => format!(
                "INSERT INTO {} (name, email, password, created_at) \
                 VALUES (?, ?, ?, ?) RETURNING {}",
                kind.table(),
                columns(kind)
            ),
        };

        let mut query = sqlx::query_as::<_, PrincipalRow>(&sql)
            .bind(&principal.name)
            .bind(&principal.email)
            .bind(&principal.password);
        if kind == PrincipalKind::Student {
            query = query.bind(&principal.serie);
        }

        let row = query
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    AppError::DuplicateEmail(principal.email.clone())
                }
                other => AppError::Database(other),
            })?;

        Ok(row.into_principal(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::Profile, repository::testing};

    fn new_principal(email: &str) -> NewPrincipal {
        NewPrincipal {
            name: "Maria".to_string(),
            email: email.to_string(),
            password: "hash".to_string(),
            serie: Some("8B".to_string()),
        }
    }

    #[tokio::test]
    async fn create_and_find_student() {
        let repo = testing::repository().await.principals;

        let created = repo.create(PrincipalKind::Student, &new_principal("maria@escola.br")).await.unwrap();
        assert_eq!(created.profile, Profile::Student { serie: Some("8B".to_string()) });

        let found = repo
            .find_by_email(PrincipalKind::Student, "MARIA@escola.br")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);

        let by_id = repo.find_by_id(PrincipalKind::Student, created.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "maria@escola.br");
    }

    #[tokio::test]
    async fn non_student_rows_ignore_serie() {
        let repo = testing::repository().await.principals;

        let teacher = repo.create(PrincipalKind::Teacher, &new_principal("prof@escola.br")).await.unwrap();
        assert_eq!(teacher.profile, Profile::Teacher);
        assert!(repo.find_by_email(PrincipalKind::Student, "prof@escola.br").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_uniqueness_is_scoped_to_variant() {
        let repo = testing::repository().await.principals;

        repo.create(PrincipalKind::Student, &new_principal("a@x.com")).await.unwrap();
        repo.create(PrincipalKind::Teacher, &new_principal("a@x.com")).await.unwrap();

        let err = repo.create(PrincipalKind::Student, &new_principal("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AppError::DuplicateEmail(_)));

        assert!(repo.email_exists(PrincipalKind::Student, "a@x.com").await.unwrap());
        assert!(!repo.email_exists(PrincipalKind::Director, "a@x.com").await.unwrap());
        assert_eq!(repo.list(PrincipalKind::Student).await.unwrap().len(), 1);
    }
}
