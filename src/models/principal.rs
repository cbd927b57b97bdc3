//! Roles, resolved principals and JWT claims

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Closed set of account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrator,
    Manager,
    Trainer,
}

text_enum!(Role {
    Administrator => "administrator",
    Manager => "manager",
    Trainer => "trainer",
});

impl Role {
    /// Roles allowed to approve, deliver, check out and take charge
    pub fn is_staff(&self) -> bool {
        match self {
            Role::Administrator | Role::Manager => true,
            Role::Trainer => false,
        }
    }

    pub fn is_administrator(&self) -> bool {
        match self {
            Role::Administrator => true,
            Role::Manager | Role::Trainer => false,
        }
    }
}

/// Authenticated caller, immutable for the duration of a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: i32,
    pub role: Role,
}

impl Principal {
    pub fn new(id: i32, role: Role) -> Self {
        Self { id, role }
    }

    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::Authorization("Manager or administrator role required".to_string()))
        }
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role.is_administrator() {
            Ok(())
        } else {
            Err(AppError::Authorization("Administrator privileges required".to_string()))
        }
    }
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.user_id, self.role)
    }
}
