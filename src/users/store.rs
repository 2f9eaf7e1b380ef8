use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tracing::instrument;
use uuid::Uuid;

use crate::users::repo_types::{LoginRow, NewUser, ProfileRow, UpdatedRow, UserPatch};

/// Statement-level access to the `users` table.
///
/// Lookups that find nothing must fail with [`sqlx::Error::RowNotFound`] so the
/// repository can tell "absent" apart from a broken connection.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Any row with this email, soft-deleted ones included.
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error>;
    async fn insert(&self, user: &NewUser) -> Result<Uuid, sqlx::Error>;
    async fn find_active_by_email(&self, email: &str) -> Result<LoginRow, sqlx::Error>;
    async fn find_active_by_id(&self, id: Uuid) -> Result<ProfileRow, sqlx::Error>;
    /// Applies the patch regardless of `deleted_at`. `patch` is never empty.
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<UpdatedRow, sqlx::Error>;
    /// Returns the number of rows marked deleted (0 or 1).
    async fn soft_delete(&self, id: Uuid, deleted_at: i64) -> Result<u64, sqlx::Error>;
}

#[derive(Clone)]
pub struct PgUserStore {
    db: PgPool,
}

impl PgUserStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    #[instrument(skip(self))]
    async fn email_exists(&self, email: &str) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
            .bind(email)
            .fetch_one(&self.db)
            .await
    }

    #[instrument(skip_all, fields(email = %user.email))]
    async fn insert(&self, user: &NewUser) -> Result<Uuid, sqlx::Error> {
        sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (email, password, full_name, profile_picture, bio, phone_number, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.full_name)
        .bind(&user.profile_picture)
        .bind(&user.bio)
        .bind(&user.phone_number)
        .bind(user.created_at)
        .fetch_one(&self.db)
        .await
    }

    #[instrument(skip(self))]
    async fn find_active_by_email(&self, email: &str) -> Result<LoginRow, sqlx::Error> {
        sqlx::query_as::<_, LoginRow>(
            r#"
            SELECT id, email, password, full_name, profile_picture, bio, phone_number, role
            FROM users
            WHERE email = $1 AND deleted_at = 0
            "#,
        )
        .bind(email)
        .fetch_one(&self.db)
        .await
    }

    #[instrument(skip(self))]
    async fn find_active_by_id(&self, id: Uuid) -> Result<ProfileRow, sqlx::Error> {
        sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT email, full_name, profile_picture, bio, phone_number
            FROM users
            WHERE id = $1 AND deleted_at = 0
            "#,
        )
        .bind(id)
        .fetch_one(&self.db)
        .await
    }

    #[instrument(skip(self, patch))]
    async fn update(&self, id: Uuid, patch: &UserPatch) -> Result<UpdatedRow, sqlx::Error> {
        let mut query = update_query(id, patch);
        query
            .build_query_as::<UpdatedRow>()
            .fetch_one(&self.db)
            .await
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: Uuid, deleted_at: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(r#"UPDATE users SET deleted_at = $2 WHERE id = $1 AND deleted_at = 0"#)
            .bind(id)
            .bind(deleted_at)
            .execute(&self.db)
            .await?;
        Ok(result.rows_affected())
    }
}

/// `UPDATE users SET <patched columns> WHERE id = $n RETURNING ...` with every
/// value bound positionally.
fn update_query(id: Uuid, patch: &UserPatch) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new("UPDATE users SET ");
    let mut set = query.separated(", ");
    for (column, value) in patch.assignments() {
        set.push(format!("{column} = "));
        set.push_bind_unseparated(value.to_owned());
    }
    query
        .push(" WHERE id = ")
        .push_bind(id)
        .push(" RETURNING id, bio, email, full_name, profile_picture");
    query
}
