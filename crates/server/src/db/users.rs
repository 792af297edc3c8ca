//! Repository for the `users` table.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{NewUser, User, UserProfileUpdate};

const COLUMNS: &str =
    "id, name, email, password, phone, user_type, district, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    pub async fn create(pool: &SqlitePool, input: &NewUser) -> Result<User, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO users (id, name, email, password, phone, user_type, district, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.password)
            .bind(input.phone)
            .bind(&input.user_type)
            .bind(&input.district)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Emails are not unique; the earliest registration wins.
    pub async fn find_by_email(
        pool: &SqlitePool,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users WHERE email = ? ORDER BY created_at ASC, rowid ASC LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// Users whose `user_type` is one of `types`, optionally restricted to a district.
    pub async fn list_by_type(
        pool: &SqlitePool,
        types: &[&str],
        district: Option<&str>,
    ) -> Result<Vec<User>, sqlx::Error> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM users WHERE user_type IN ("));
        let mut separated = builder.separated(", ");
        for user_type in types {
            separated.push_bind(*user_type);
        }
        separated.push_unseparated(")");

        if let Some(district) = district {
            builder.push(" AND district = ").push_bind(district);
        }
        builder.push(" ORDER BY created_at ASC, rowid ASC");

        builder.build_query_as::<User>().fetch_all(pool).await
    }

    /// Applies the given fields; absent ones keep their stored value.
    pub async fn update_profile(
        pool: &SqlitePool,
        id: &str,
        input: &UserProfileUpdate,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                name = COALESCE(?, name),
                email = COALESCE(?, email),
                phone = COALESCE(?, phone),
                updated_at = ?
             WHERE id = ?
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(input.phone)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Returns `true` if a row was deleted. Complaints are left untouched.
    pub async fn delete(pool: &SqlitePool, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
