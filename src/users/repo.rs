use std::sync::Arc;

use sqlx::PgPool;
use time::OffsetDateTime;
use tracing::debug;

use crate::users::{
    dto::{
        DeleteUserRequest, DeleteUserResponse, GetByIdUserRequest, GetByIdUserResponse,
        LoginUserRequest, LoginUserResponse, RegisterUserRequest, RegisterUserResponse,
        UpdateUserRequest, UpdateUserResponse,
    },
    error::{is_unique_violation, UserError},
    repo_types::{NewUser, UserPatch},
    store::{PgUserStore, UserStore},
    validation::{is_valid_email, is_valid_phone_number},
};

/// Account operations over a shared [`UserStore`].
///
/// Every call is independent: one validated statement (two for registration)
/// and no state of its own, so clones can be handed to any number of tasks.
#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn UserStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self { store }
    }

    pub fn postgres(db: PgPool) -> Self {
        Self::new(Arc::new(PgUserStore::new(db)))
    }

    /// Validate and insert a new account, returning its generated id.
    ///
    /// The existence check only rejects early. Two concurrent registrations can
    /// both pass it; the `users_email_key` constraint then rejects the second
    /// insert, which is reported the same way.
    pub async fn register_user(
        &self,
        req: RegisterUserRequest,
    ) -> Result<RegisterUserResponse, UserError> {
        if !is_valid_email(&req.email) {
            return Err(UserError::InvalidEmailFormat);
        }
        if !is_valid_phone_number(&req.phone_number) {
            return Err(UserError::InvalidPhoneFormat);
        }

        // soft-deleted accounts keep their email reserved
        let exists = self
            .store
            .email_exists(&req.email)
            .await
            .map_err(UserError::Storage)?;
        if exists {
            return Err(UserError::UserAlreadyRegistered);
        }

        let user = NewUser::from_request(req, OffsetDateTime::now_utc());
        let id = self.store.insert(&user).await.map_err(|e| {
            if is_unique_violation(&e) {
                UserError::UserAlreadyRegistered
            } else {
                UserError::Storage(e)
            }
        })?;

        debug!(user_id = %id, "user inserted");
        Ok(RegisterUserResponse { id })
    }

    /// Fetch the active account for an email. The password is returned as
    /// stored; comparing it is up to the caller.
    pub async fn login_user(&self, req: LoginUserRequest) -> Result<LoginUserResponse, UserError> {
        match self.store.find_active_by_email(&req.email).await {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::RowNotFound) => Err(UserError::InvalidCredentials),
            Err(e) => Err(UserError::Storage(e)),
        }
    }

    pub async fn get_by_id_user(
        &self,
        req: GetByIdUserRequest,
    ) -> Result<GetByIdUserResponse, UserError> {
        match self.store.find_active_by_id(req.id).await {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::RowNotFound) => Err(UserError::UserNotFound),
            Err(e) => Err(UserError::Storage(e)),
        }
    }

    /// Apply the non-empty fields of `req` in one statement and return the
    /// resulting row. Soft-deleted accounts are updated too.
    pub async fn update_user(&self, req: UpdateUserRequest) -> Result<UpdateUserResponse, UserError> {
        let patch = UserPatch::from_request(&req);
        if patch.is_empty() {
            return Err(UserError::NothingToUpdate);
        }

        match self.store.update(req.id, &patch).await {
            Ok(row) => Ok(row.into()),
            Err(sqlx::Error::RowNotFound) => Err(UserError::UserNotFound),
            Err(e) if is_unique_violation(&e) => Err(UserError::UserAlreadyRegistered),
            Err(e) => Err(UserError::Storage(e)),
        }
    }

    /// Mark an active account deleted. Unknown or already deleted ids succeed
    /// without touching anything.
    pub async fn delete_user(&self, req: DeleteUserRequest) -> Result<DeleteUserResponse, UserError> {
        let deleted_at = OffsetDateTime::now_utc().unix_timestamp();
        let affected = self
            .store
            .soft_delete(req.id, deleted_at)
            .await
            .map_err(UserError::Storage)?;
        debug!(user_id = %req.id, affected, "soft delete executed");
        Ok(DeleteUserResponse {})
    }
}
