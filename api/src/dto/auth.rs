use kb_core::services::{UserChanges, UserRegistration};
use kb_shared::validation::USERNAME_REGEX;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 2, max = 16, message = "must be 2-16 characters"),
        regex(path = "USERNAME_REGEX", message = "may only contain letters, digits, '_', '.' and '-'")
    )]
    pub username: String,
    #[validate(length(min = 12, max = 32, message = "must be 12-32 characters"))]
    pub password: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
}

impl From<RegisterRequest> for UserRegistration {
    fn from(request: RegisterRequest) -> Self {
        Self {
            username: request.username,
            password: request.password,
            email: request.email,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

/// Body of `PUT|PATCH /api/user`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateUserRequest {
    #[serde(default)]
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(min = 12, max = 32, message = "must be 12-32 characters"))]
    pub password: Option<String>,
}

impl UpdateUserRequest {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

impl From<UpdateUserRequest> for UserChanges {
    fn from(request: UpdateUserRequest) -> Self {
        Self {
            email: request.email,
            password: request.password,
        }
    }
}
