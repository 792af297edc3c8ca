//! Repository for the `messages` table.

use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::models::{Message, MessageOrder, NewMessage};

const COLUMNS: &str = "id, name, message, complaint_id, created_at, updated_at";

pub struct MessageRepo;

impl MessageRepo {
    pub async fn create(pool: &SqlitePool, input: &NewMessage) -> Result<Message, sqlx::Error> {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO messages (id, name, message, complaint_id, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.name)
            .bind(&input.message)
            .bind(&input.complaint_id)
            .bind(now)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    pub async fn list_for_complaint(
        pool: &SqlitePool,
        complaint_id: &str,
        order: MessageOrder,
    ) -> Result<Vec<Message>, sqlx::Error> {
        let direction = match order {
            MessageOrder::NewestFirst => "DESC",
            MessageOrder::OldestFirst => "ASC",
        };
        let query = format!(
            "SELECT {COLUMNS} FROM messages WHERE complaint_id = ?
             ORDER BY created_at {direction}, rowid {direction}"
        );
        sqlx::query_as::<_, Message>(&query)
            .bind(complaint_id)
            .fetch_all(pool)
            .await
    }
}
