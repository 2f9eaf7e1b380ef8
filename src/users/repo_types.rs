use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::dto::{
    GetByIdUserResponse, LoginUserResponse, RegisterUserRequest, UpdateUserRequest,
    UpdateUserResponse,
};

/// Placeholder emitted by schema tooling for unset string fields.
pub const UNSET_PLACEHOLDER: &str = "string";

/// Row to insert on registration.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub phone_number: String,
    pub created_at: OffsetDateTime,
}

impl NewUser {
    pub fn from_request(req: RegisterUserRequest, created_at: OffsetDateTime) -> Self {
        Self {
            email: req.email,
            password: req.password,
            full_name: req.full_name,
            profile_picture: req.profile_picture,
            bio: req.bio,
            phone_number: req.phone_number,
            created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct LoginRow {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub phone_number: String,
    pub role: String,
}

impl From<LoginRow> for LoginUserResponse {
    fn from(r: LoginRow) -> Self {
        Self {
            id: r.id,
            email: r.email,
            password: r.password,
            full_name: r.full_name,
            profile_picture: r.profile_picture,
            bio: r.bio,
            phone_number: r.phone_number,
            role: r.role,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub email: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub phone_number: String,
}

impl From<ProfileRow> for GetByIdUserResponse {
    fn from(r: ProfileRow) -> Self {
        Self {
            email: r.email,
            full_name: r.full_name,
            profile_picture: r.profile_picture,
            bio: r.bio,
            phone_number: r.phone_number,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct UpdatedRow {
    pub id: Uuid,
    pub bio: String,
    pub email: String,
    pub full_name: String,
    pub profile_picture: String,
}

impl From<UpdatedRow> for UpdateUserResponse {
    fn from(r: UpdatedRow) -> Self {
        Self {
            id: r.id,
            bio: r.bio,
            email: r.email,
            full_name: r.full_name,
            profile_picture: r.profile_picture,
        }
    }
}

/// Columns an update actually touches. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserPatch {
    pub bio: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
}

impl UserPatch {
    pub fn from_request(req: &UpdateUserRequest) -> Self {
        Self {
            bio: effective(&req.bio),
            email: effective(&req.email),
            full_name: effective(&req.full_name),
            profile_picture: effective(&req.profile_picture),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments().next().is_none()
    }

    /// `(column, value)` pairs in statement order.
    pub fn assignments(&self) -> impl Iterator<Item = (&'static str, &str)> + '_ {
        [
            ("bio", &self.bio),
            ("email", &self.email),
            ("full_name", &self.full_name),
            ("profile_picture", &self.profile_picture),
        ]
        .into_iter()
        .filter_map(|(column, value)| value.as_deref().map(|v| (column, v)))
    }
}

fn effective(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|v| !v.is_empty() && *v != UNSET_PLACEHOLDER)
        .map(str::to_owned)
}
