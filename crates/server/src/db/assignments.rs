//! Repository for the `assigned_complaints` table.

use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use super::models::{AssignedComplaint, NewAssignment};

const COLUMNS: &str = "id, agent_id, complaint_id, status, agent_name, created_at, updated_at";

pub struct AssignmentRepo;

impl AssignmentRepo {
    pub async fn create<'e, E>(
        executor: E,
        input: &NewAssignment,
    ) -> Result<AssignedComplaint, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let now = Utc::now();
        let query = format!(
            "INSERT INTO assigned_complaints (id, agent_id, complaint_id, status, agent_name, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AssignedComplaint>(&query)
            .bind(Uuid::new_v4().to_string())
            .bind(&input.agent_id)
            .bind(&input.complaint_id)
            .bind(&input.status)
            .bind(&input.agent_name)
            .bind(now)
            .bind(now)
            .fetch_one(executor)
            .await
    }

    /// Copies a complaint's new status onto its earliest assignment.
    /// Returns `false` when the complaint was never assigned.
    pub async fn update_status_for_complaint<'e, E>(
        executor: E,
        complaint_id: &str,
        status: &str,
    ) -> Result<bool, sqlx::Error>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let result = sqlx::query(
            "UPDATE assigned_complaints SET status = ?, updated_at = ?
             WHERE id = (
                SELECT id FROM assigned_complaints WHERE complaint_id = ?
                ORDER BY created_at ASC, rowid ASC LIMIT 1
             )",
        )
        .bind(status)
        .bind(Utc::now())
        .bind(complaint_id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Assignments of one agent. `agent_name` comes from the live user record
    /// and falls back to the copy stored at assignment time.
    pub async fn list_by_agent(
        pool: &SqlitePool,
        agent_id: &str,
    ) -> Result<Vec<AssignedComplaint>, sqlx::Error> {
        sqlx::query_as::<_, AssignedComplaint>(
            r#"
            SELECT a.id, a.agent_id, a.complaint_id, a.status,
                   COALESCE(u.name, a.agent_name) AS agent_name,
                   a.created_at, a.updated_at
            FROM assigned_complaints a
            LEFT JOIN users u ON u.id = a.agent_id
            WHERE a.agent_id = ?
            ORDER BY a.created_at ASC, a.rowid ASC
            "#,
        )
        .bind(agent_id)
        .fetch_all(pool)
        .await
    }
}
