//! Principal (authenticated actor) model and related types
//!
//! Each variant lives in its own table. Email uniqueness is only enforced
//! within a variant's table, never across tables.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    encode::IsNull,
    error::BoxDynError,
    sqlite::{SqliteArgumentValue, SqliteTypeInfo, SqliteValueRef},
    Decode, Encode, FromRow, Sqlite,
};
use utoipa::ToSchema;
use validator::Validate;

/// The five disjoint principal variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PrincipalKind {
    Student,
    Teacher,
    Librarian,
    Director,
    Supervisor,
}

impl PrincipalKind {
    /// Order in which variant tables are probed when resolving a principal
    /// by email or by bare id. The first match wins, so a Student always
    /// shadows any other variant sharing the same email or id.
    pub const RESOLUTION_ORDER: [PrincipalKind; 5] = [
        PrincipalKind::Student,
        PrincipalKind::Teacher,
        PrincipalKind::Librarian,
        PrincipalKind::Director,
        PrincipalKind::Supervisor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrincipalKind::Student => "student",
            PrincipalKind::Teacher => "teacher",
            PrincipalKind::Librarian => "librarian",
            PrincipalKind::Director => "director",
            PrincipalKind::Supervisor => "supervisor",
        }
    }

    /// Backing table of the variant
    pub fn table(&self) -> &'static str {
        match self {
            PrincipalKind::Student => "students",
            PrincipalKind::Teacher => "teachers",
            PrincipalKind::Librarian => "librarians",
            PrincipalKind::Director => "directors",
            PrincipalKind::Supervisor => "supervisors",
        }
    }
}

impl std::fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for PrincipalKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "student" => Ok(PrincipalKind::Student),
            "teacher" => Ok(PrincipalKind::Teacher),
            "librarian" => Ok(PrincipalKind::Librarian),
            "director" => Ok(PrincipalKind::Director),
            "supervisor" => Ok(PrincipalKind::Supervisor),
            _ => Err(format!("Invalid principal kind: {}", s)),
        }
    }
}

// SQLx conversion for PrincipalKind
impl sqlx::Type<Sqlite> for PrincipalKind {
    fn type_info() -> SqliteTypeInfo {
        <String as sqlx::Type<Sqlite>>::type_info()
    }
}

impl<'r> Decode<'r, Sqlite> for PrincipalKind {
    fn decode(value: SqliteValueRef<'r>) -> Result<Self, BoxDynError> {
        let s: String = Decode::<Sqlite>::decode(value)?;
        s.parse().map_err(|e: String| e.into())
    }
}

impl<'q> Encode<'q, Sqlite> for PrincipalKind {
    fn encode_by_ref(&self, buf: &mut Vec<SqliteArgumentValue<'q>>) -> IsNull {
        <&str as Encode<Sqlite>>::encode(self.as_str(), buf)
    }
}

/// Variant-specific payload of a principal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Profile {
    Student {
        /// School grade / class ("série")
        serie: Option<String>,
    },
    Teacher,
    Librarian,
    Director,
    Supervisor,
}

impl Profile {
    pub fn kind(&self) -> PrincipalKind {
        match self {
            Profile::Student { .. } => PrincipalKind::Student,
            Profile::Teacher => PrincipalKind::Teacher,
            Profile::Librarian => PrincipalKind::Librarian,
            Profile::Director => PrincipalKind::Director,
            Profile::Supervisor => PrincipalKind::Supervisor,
        }
    }
}

/// Internal row structure shared by every principal table.
/// Non-student tables select `NULL AS serie`.
#[derive(Debug, Clone, FromRow)]
pub struct PrincipalRow {
    id: i64,
    name: String,
    email: String,
    password: String,
    serie: Option<String>,
    created_at: DateTime<Utc>,
}

impl PrincipalRow {
    pub fn into_principal(self, kind: PrincipalKind) -> Principal {
        let profile = match kind {
            PrincipalKind::Student => Profile::Student { serie: self.serie },
            PrincipalKind::Teacher => Profile::Teacher,
            PrincipalKind::Librarian => Profile::Librarian,
            PrincipalKind::Director => Profile::Director,
            PrincipalKind::Supervisor => Profile::Supervisor,
        };

        Principal {
            id: self.id,
            name: self.name,
            email: self.email,
            password: self.password,
            profile,
            created_at: self.created_at,
        }
    }
}

/// Any authenticated actor
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct Principal {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub profile: Profile,
    pub created_at: DateTime<Utc>,
}

impl Principal {
    pub fn kind(&self) -> PrincipalKind {
        self.profile.kind()
    }

    pub fn is_student(&self) -> bool {
        self.kind() == PrincipalKind::Student
    }
}

/// Fields needed to insert a principal of any variant.
/// `password` must already be hashed.
#[derive(Debug, Clone)]
pub struct NewPrincipal {
    pub name: String,
    pub email: String,
    pub password: String,
    pub serie: Option<String>,
}

/// Account creation request: student self-registration or staff provisioning
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewAccount {
    #[serde(alias = "nome")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(alias = "senha")]
    #[validate(length(min = 4, message = "Password must be at least 4 characters"))]
    pub password: String,
    pub serie: Option<String>,
}
