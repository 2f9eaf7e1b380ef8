use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Request body for user registration. Missing fields read as empty and are
/// left to validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub profile_picture: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegisterUserResponse {
    pub id: Uuid,
}

/// Request body for login lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUserRequest {
    #[serde(default)]
    pub email: String,
}

/// Everything the caller needs to check credentials itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoginUserResponse {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub phone_number: String,
    pub role: String,
}

#[derive(Debug, Clone, Copy)]
pub struct GetByIdUserRequest {
    pub id: Uuid,
}

/// Public profile of an active user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GetByIdUserResponse {
    pub email: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub phone_number: String,
}

/// Partial update. Fields left empty or set to `"string"` are ignored.
#[derive(Debug, Clone, Default)]
pub struct UpdateUserRequest {
    pub id: Uuid,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
}

/// PATCH body; the id comes from the path.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserBody {
    pub bio: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
}

impl UpdateUserBody {
    pub fn into_request(self, id: Uuid) -> UpdateUserRequest {
        UpdateUserRequest {
            id,
            bio: self.bio,
            email: self.email,
            full_name: self.full_name,
            profile_picture: self.profile_picture,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UpdateUserResponse {
    pub id: Uuid,
    pub bio: String,
    pub email: String,
    pub full_name: String,
    pub profile_picture: String,
}

#[derive(Debug, Clone, Copy)]
pub struct DeleteUserRequest {
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeleteUserResponse {}
