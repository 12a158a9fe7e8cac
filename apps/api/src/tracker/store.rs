use chrono::Utc;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{ApplicationStatus, JobApplicationRow, NewApplication};

/// All applications, most recently applied first.
pub async fn list_applications(pool: &PgPool) -> Result<Vec<JobApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, JobApplicationRow>(
        "SELECT * FROM job_applications ORDER BY date_applied DESC",
    )
    .fetch_all(pool)
    .await
}

pub async fn create_application(
    pool: &PgPool,
    new: &NewApplication,
) -> Result<JobApplicationRow, sqlx::Error> {
    let row = sqlx::query_as::<_, JobApplicationRow>(
        r#"
        INSERT INTO job_applications
            (id, company, role, status, date_applied, notes, job_url, match_score)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.company.trim())
    .bind(new.role.trim())
    .bind(new.status.as_str())
    .bind(new.date_applied.unwrap_or_else(Utc::now))
    .bind(&new.notes)
    .bind(&new.job_url)
    .bind(new.match_score)
    .fetch_one(pool)
    .await?;

    info!("Tracked application {} ({} at {})", row.id, row.role, row.company);
    Ok(row)
}

/// `None` when no application has this id.
pub async fn update_status(
    pool: &PgPool,
    id: Uuid,
    status: ApplicationStatus,
) -> Result<Option<JobApplicationRow>, sqlx::Error> {
    sqlx::query_as::<_, JobApplicationRow>(
        "UPDATE job_applications SET status = $1 WHERE id = $2 RETURNING *",
    )
    .bind(status.as_str())
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Returns whether a row was deleted.
pub async fn delete_application(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
