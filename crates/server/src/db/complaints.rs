//! Repository for the `complaints` table.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{Complaint, NewComplaint};

const COLUMNS: &str = "id, user_id, name, address, city, district, state, pincode, comment, \
                       status, file, created_at, updated_at";

pub struct ComplaintRepo;

impl ComplaintRepo {
    pub async fn create(pool: &SqlitePool, input: &NewComplaint) -> Result<Complaint, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO complaints
                (id, user_id, name, address, city, district, state, pincode, comment, status, file, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.user_id)
            .bind(&input.name)
            .bind(&input.address)
            .bind(&input.city)
            .bind(&input.district)
            .bind(&input.state)
            .bind(input.pincode)
            .bind(&input.comment)
            .bind(&input.status)
            .bind(&input.file)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints WHERE id = ?");
        sqlx::query_as::<_, Complaint>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_all(pool: &SqlitePool) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM complaints ORDER BY created_at ASC, rowid ASC");
        sqlx::query_as::<_, Complaint>(&query).fetch_all(pool).await
    }

    pub async fn list_by_user(
        pool: &SqlitePool,
        user_id: &str,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints WHERE user_id = ? ORDER BY created_at ASC, rowid ASC"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_district(
        pool: &SqlitePool,
        district: &str,
    ) -> Result<Vec<Complaint>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM complaints WHERE district = ? ORDER BY created_at ASC, rowid ASC"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(district)
            .fetch_all(pool)
            .await
    }

    /// Sets the status, returning the updated complaint if it exists.
    pub async fn update_status<'e, E>(
        executor: E,
        id: &str,
        status: &str,
    ) -> Result<Option<Complaint>, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let query = format!(
            "UPDATE complaints SET status = ?, updated_at = ? WHERE id = ? RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Complaint>(&query)
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .fetch_optional(executor)
            .await
    }
}
