//! Authentication, registration and session service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        principal::{NewAccount, NewPrincipal, Principal, PrincipalKind},
        session::{Session, SessionClaims},
    },
    repository::Repository,
};

/// A freshly established session and the token that carries it
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub session: Session,
    pub principal: Principal,
}

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Find the principal owning `email`, probing variants in
    /// `PrincipalKind::RESOLUTION_ORDER`. The first variant holding the
    /// email wins; emails are not unique across variants.
    pub async fn resolve_by_email(&self, email: &str) -> AppResult<Option<Principal>> {
        for kind in PrincipalKind::RESOLUTION_ORDER {
            if let Some(principal) = self.repository.principals.find_by_email(kind, email).await? {
                return Ok(Some(principal));
            }
        }
        Ok(None)
    }

    /// Find a principal by bare numeric id with the same priority probe.
    /// Ids are per-variant, so sessions rehydrate through the
    /// (variant, id) pair instead.
    pub async fn resolve_by_id(&self, id: i64) -> AppResult<Option<Principal>> {
        for kind in PrincipalKind::RESOLUTION_ORDER {
            if let Some(principal) = self.repository.principals.find_by_id(kind, id).await? {
                return Ok(Some(principal));
            }
        }
        Ok(None)
    }

    /// Check credentials and establish a session
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginOutcome> {
        let principal = match self.resolve_by_email(email).await? {
            Some(principal) => principal,
            None => {
                tracing::warn!(email = %email, "Login failed: unknown email");
                return Err(AppError::InvalidCredentials);
            }
        };

        if !verify_password(&principal.password, password)? {
            tracing::warn!(email = %email, kind = %principal.kind(), "Login failed: wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let now = Utc::now();
        let purged = self.repository.sessions.delete_expired(now).await?;
        if purged > 0 {
            tracing::debug!(purged, "Removed expired sessions");
        }

        let outcome = self.open_session(principal, now).await?;

        tracing::info!(
            principal_id = outcome.principal.id,
            kind = %outcome.principal.kind(),
            "Login succeeded"
        );

        Ok(outcome)
    }

    async fn open_session(&self, principal: Principal, now: DateTime<Utc>) -> AppResult<LoginOutcome> {
        let expires_at = i64::try_from(self.config.session_expiration_hours)
            .ok()
            .and_then(Duration::try_hours)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AppError::Internal(format!(
                    "Session expiration of {} hours is out of range",
                    self.config.session_expiration_hours
                ))
            })?;

        let session = Session {
            id: Uuid::new_v4().to_string(),
            principal_kind: principal.kind(),
            principal_id: principal.id,
            created_at: now,
            expires_at,
        };

        let claims = SessionClaims {
            sub: principal.email.clone(),
            sid: session.id.clone(),
            principal_id: principal.id,
            kind: principal.kind(),
            exp: session.expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = claims
            .create_token(&self.config.session_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        self.repository.sessions.create(&session).await?;

        Ok(LoginOutcome { token, session, principal })
    }

    /// Resolve a session token into its live session and principal
    pub async fn authenticate(&self, token: &str) -> AppResult<(Session, Principal)> {
        let claims = SessionClaims::from_token(token, &self.config.session_secret)
            .map_err(|_| AppError::Unauthenticated)?;

        let session = self
            .repository
            .sessions
            .get(&claims.sid)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        if session.is_expired(Utc::now()) {
            self.repository.sessions.delete(&session.id).await?;
            return Err(AppError::Unauthenticated);
        }

        if session.principal_id != claims.principal_id || session.principal_kind != claims.kind {
            return Err(AppError::Unauthenticated);
        }

        let principal = self
            .repository
            .principals
            .find_by_id(session.principal_kind, session.principal_id)
            .await?
            .ok_or(AppError::Unauthenticated)?;

        Ok((session, principal))
    }

    /// Invalidate a session immediately
    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.repository.sessions.delete(&session.id).await?;

        tracing::info!(
            principal_id = session.principal_id,
            kind = %session.principal_kind,
            "Logged out"
        );

        Ok(())
    }

    /// Self-register a student. Does not log the student in.
    pub async fn register(&self, request: NewAccount) -> AppResult<Principal> {
        request.validate()?;

        // Uniqueness is only checked among students
        if self
            .repository
            .principals
            .email_exists(PrincipalKind::Student, &request.email)
            .await?
        {
            tracing::warn!(email = %request.email, "Registration refused: email already registered");
            return Err(AppError::DuplicateEmail(request.email));
        }

        let student = NewPrincipal {
            name: request.name,
            email: request.email,
            password: hash_password(&request.password)?,
            serie: request.serie,
        };

        let created = self
            .repository
            .principals
            .create(PrincipalKind::Student, &student)
            .await?;

        tracing::info!(student_id = created.id, "Student registered");

        Ok(created)
    }
}

/// Verify a password against a stored argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}
