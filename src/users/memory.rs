use std::borrow::Cow;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use sqlx::error::{DatabaseError, ErrorKind};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo_types::{LoginRow, NewUser, ProfileRow, UpdatedRow, UserPatch};
use crate::users::store::UserStore;

/// Full persisted record, as the `users` table holds it.
#[derive(Debug, Clone)]
pub struct StoredUser {
    pub id: Uuid,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub profile_picture: String,
    pub bio: String,
    pub phone_number: String,
    pub role: String,
    pub created_at: OffsetDateTime,
    pub deleted_at: i64,
}

/// Rejection raised when a write would duplicate `users_email_key`.
#[derive(Debug)]
struct EmailTaken;

impl std::fmt::Display for EmailTaken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(r#"duplicate key value violates unique constraint "users_email_key""#)
    }
}

impl std::error::Error for EmailTaken {}

impl DatabaseError for EmailTaken {
    fn message(&self) -> &str {
        r#"duplicate key value violates unique constraint "users_email_key""#
    }

    fn code(&self) -> Option<Cow<'_, str>> {
        Some(Cow::Borrowed("23505"))
    }

    fn as_error(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn as_error_mut(&mut self) -> &mut (dyn std::error::Error + Send + Sync + 'static) {
        self
    }

    fn into_error(self: Box<Self>) -> Box<dyn std::error::Error + Send + Sync + 'static> {
        self
    }

    fn constraint(&self) -> Option<&str> {
        Some("users_email_key")
    }

    fn kind(&self) -> ErrorKind {
        ErrorKind::UniqueViolation
    }
}

fn email_taken() -> sqlx::Error {
    sqlx::Error::Database(Box::new(EmailTaken))
}

/// `users` table kept in a vector. Mirrors the Postgres statements, including
/// the unique constraint on `email` (deleted rows count).
#[derive(Default)]
pub struct MemoryUserStore {
    rows: Mutex<Vec<StoredUser>>,
    calls: AtomicUsize,
    broken: bool,
    stale_exists: bool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every statement fails as if the pool were unreachable.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    /// The existence check always answers "free", as it would for a
    /// registration racing a concurrent insert of the same email.
    pub fn with_stale_exists_check() -> Self {
        Self {
            stale_exists: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn row(&self, id: Uuid) -> Option<StoredUser> {
        self.rows.lock().unwrap().iter().find(|u| u.id == id).cloned()
    }

    fn enter(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredUser>>, sqlx::Error> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.broken {
            return Err(sqlx::Error::PoolTimedOut);
        }
        Ok(self.rows.lock().unwrap())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        let rows = self.enter()?;
        Ok(!self.stale_exists && rows.iter().any(|u| u.email == email))
    }

    async fn insert(&self, user: &NewUser) -> Result<Uuid, sqlx::Error> {
        let mut rows = self.enter()?;
        if rows.iter().any(|u| u.email == user.email) {
            return Err(email_taken());
        }
        let id = Uuid::new_v4();
        rows.push(StoredUser {
            id,
            email: user.email.clone(),
            password: user.password.clone(),
            full_name: user.full_name.clone(),
            profile_picture: user.profile_picture.clone(),
            bio: user.bio.clone(),
            phone_number: user.phone_number.clone(),
            role: "user".into(),
            created_at: user.created_at,
            deleted_at: 0,
        });
        Ok(id)
    }

    async fn find_active_by_email(&self, email: &str) -> Result<LoginRow, sqlx::Error> {
        self.enter()?
            .iter()
            .find(|u| u.email == email && u.deleted_at == 0)
            .map(|u| LoginRow {
                id: u.id,
                email: u.email.clone(),
                password: u.password.clone(),
                full_name: u.full_name.clone(),
                profile_picture: u.profile_picture.clone(),
                bio: u.bio.clone(),
                phone_number: u.phone_number.clone(),
                role: u.role.clone(),
            })
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn find_active_by_id(&self, id: Uuid) -> Result<ProfileRow, sqlx::Error> {
        self.enter()?
            .iter()
            .find(|u| u.id == id && u.deleted_at == 0)
            .map(|u| ProfileRow {
                email: u.email.clone(),
                full_name: u.full_name.clone(),
                profile_picture: u.profile_picture.clone(),
                bio: u.bio.clone(),
                phone_number: u.phone_number.clone(),
            })
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<UpdatedRow, sqlx::Error> {
        let mut rows = self.enter()?;
        if let Some(email) = &patch.email {
            if rows.iter().any(|u| u.id != id && u.email == *email) {
                return Err(email_taken());
            }
        }
        let user = rows
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(sqlx::Error::RowNotFound)?;
        for (column, value) in patch.assignments() {
            let field = match column {
                "bio" => &mut user.bio,
                "email" => &mut user.email,
                "full_name" => &mut user.full_name,
                "profile_picture" => &mut user.profile_picture,
                other => unreachable!("unknown users column {other}"),
            };
            *field = value.to_owned();
        }
        Ok(UpdatedRow {
            id: user.id,
            bio: user.bio.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            profile_picture: user.profile_picture.clone(),
        })
    }

    async fn soft_delete(&self, id: Uuid, deleted_at: i64) -> Result<u64, sqlx::Error> {
        let mut rows = self.enter()?;
        match rows.iter_mut().find(|u| u.id == id && u.deleted_at == 0) {
            Some(user) => {
                user.deleted_at = deleted_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
