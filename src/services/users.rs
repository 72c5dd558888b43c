//! Principal directory service: role listings and staff provisioning

use validator::Validate;

use crate::{
    config::BootstrapAccount,
    error::AppResult,
    models::principal::{NewAccount, NewPrincipal, Principal, PrincipalKind},
    repository::Repository,
    services::auth::hash_password,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
}

impl UsersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Every principal of one variant in storage order
    pub async fn list(&self, kind: PrincipalKind) -> AppResult<Vec<Principal>> {
        self.repository.principals.list(kind).await
    }

    /// Insert a principal of any variant. Staff accounts have no
    /// self-service route and are created through here.
    pub async fn provision(&self, kind: PrincipalKind, account: NewAccount) -> AppResult<Principal> {
        account.validate()?;

        let principal = NewPrincipal {
            name: account.name,
            email: account.email,
            password: hash_password(&account.password)?,
            serie: account.serie,
        };

        let created = self.repository.principals.create(kind, &principal).await?;

        tracing::info!(principal_id = created.id, kind = %kind, "Principal provisioned");

        Ok(created)
    }

    /// Create configured accounts whose email is still free in their
    /// variant. Returns how many were created.
    pub async fn bootstrap(&self, accounts: &[BootstrapAccount]) -> AppResult<usize> {
        let mut created = 0;

        for account in accounts {
            if self.repository.principals.email_exists(account.kind, &account.email).await? {
                tracing::debug!(email = %account.email, kind = %account.kind, "Bootstrap account already present");
                continue;
            }

            self.provision(
                account.kind,
                NewAccount {
                    name: account.name.clone(),
                    email: account.email.clone(),
                    password: account.password.clone(),
                    serie: None,
                },
            )
            .await?;
            created += 1;
        }

        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, repository::testing};

    fn account(email: &str) -> NewAccount {
        NewAccount {
            name: "Carla".to_string(),
            email: email.to_string(),
            password: "biblio123".to_string(),
            serie: None,
        }
    }

    #[tokio::test]
    async fn provision_and_list_per_variant() {
        let service = UsersService::new(testing::repository().await);

        service.provision(PrincipalKind::Librarian, account("carla@escola.br")).await.unwrap();
        service.provision(PrincipalKind::Librarian, account("rui@escola.br")).await.unwrap();
        service.provision(PrincipalKind::Director, account("dir@escola.br")).await.unwrap();

        let librarians = service.list(PrincipalKind::Librarian).await.unwrap();
        assert_eq!(
            librarians.iter().map(|p| p.email.as_str()).collect::<Vec<_>>(),
            vec!["carla@escola.br", "rui@escola.br"]
        );
        assert_eq!(service.list(PrincipalKind::Director).await.unwrap().len(), 1);
        assert!(service.list(PrincipalKind::Supervisor).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn provision_rejects_duplicate_within_variant() {
        let service = UsersService::new(testing::repository().await);

        service.provision(PrincipalKind::Supervisor, account("sup@escola.br")).await.unwrap();
        let err = service
            .provision(PrincipalKind::Supervisor, account("sup@escola.br"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::DuplicateEmail(_)));
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let service = UsersService::new(testing::repository().await);
        let accounts = vec![
            BootstrapAccount {
                kind: PrincipalKind::Librarian,
                name: "Biblioteca".to_string(),
                email: "biblioteca@escola.br".to_string(),
                password: "change-me".to_string(),
            },
            BootstrapAccount {
                kind: PrincipalKind::Director,
                name: "Direção".to_string(),
                email: "direcao@escola.br".to_string(),
                password: "change-me".to_string(),
            },
        ];

        assert_eq!(service.bootstrap(&accounts).await.unwrap(), 2);
        assert_eq!(service.bootstrap(&accounts).await.unwrap(), 0);
        assert_eq!(service.list(PrincipalKind::Librarian).await.unwrap().len(), 1);
    }
}
