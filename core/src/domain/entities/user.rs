//! User entity representing a registered account.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, ordered from least to most privileged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Banned,
    Locked,
    Pending,
    User,
    Moderator,
    Admin,
    Developer,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Banned => "banned",
            UserRole::Locked => "locked",
            UserRole::Pending => "pending",
            UserRole::User => "user",
            UserRole::Moderator => "moderator",
            UserRole::Admin => "admin",
            UserRole::Developer => "developer",
        }
    }

    /// Roles that may not use authenticated endpoints
    pub fn is_forbidden(&self) -> bool {
        matches!(self, UserRole::Banned | UserRole::Locked | UserRole::Pending)
    }

    /// Whether this role is at least as privileged as `required`
    pub fn has_required_role(&self, required: UserRole) -> bool {
        *self >= required
    }

    pub fn is_developer_or_admin(&self) -> bool {
        matches!(self, UserRole::Developer | UserRole::Admin)
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::User
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "banned" => Ok(UserRole::Banned),
            "locked" => Ok(UserRole::Locked),
            "pending" => Ok(UserRole::Pending),
            "user" => Ok(UserRole::User),
            "moderator" => Ok(UserRole::Moderator),
            "admin" => Ok(UserRole::Admin),
            "developer" => Ok(UserRole::Developer),
            other => Err(format!("unknown user role: {}", other)),
        }
    }
}

/// A registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned sequential id, zero until persisted
    pub id: u64,

    /// Public identifier carried in tokens
    pub account_id: Uuid,

    pub username: String,

    /// bcrypt hash, never the plain password
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    pub email: String,

    pub role: UserRole,
}

impl User {
    /// Creates a new user with a fresh account id and the default role
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0,
            account_id: Uuid::new_v4(),
            username,
            password_hash,
            email,
            role: UserRole::default(),
        }
    }

    /// Public representation. Internal id and email are omitted.
    pub fn to_dto(&self) -> UserDto {
        UserDto {
            id: None,
            account_id: self.account_id,
            username: self.username.clone(),
            email: None,
            role: self.role,
        }
    }

    /// Representation for the account owner, including email
    pub fn to_owner_dto(&self) -> UserDto {
        UserDto {
            email: Some(self.email.clone()),
            ..self.to_dto()
        }
    }
}

/// User as returned by the HTTP API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub account_id: Uuid,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub role: UserRole,
}
