//! Row-level access to the `scan_jobs` table.
//!
//! Each row keeps the status and timestamps in their own columns for
//! querying, and the full job as a JSON document in `data`.

use crate::error::{DatabaseError, Result};
use chrono::Utc;
use rigscout_core::ScanJob;
#[cfg(test)]
use rigscout_core::JobStatus;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::collections::{HashMap, HashSet};

fn decode(id: &str, data: &str) -> Result<ScanJob> {
    serde_json::from_str(data).map_err(|e| DatabaseError::Decode(format!("job {id}: {e}")))
}

/// Insert or update one job inside `tx`.
async fn upsert(tx: &mut Transaction<'_, Sqlite>, job: &ScanJob) -> Result<()> {
    let data = serde_json::to_string(job)
        .map_err(|e| DatabaseError::SerializationError(format!("job {}: {e}", job.id)))?;

    sqlx::query(
        "INSERT INTO scan_jobs (id, status, data, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
             status = excluded.status,
             data = excluded.data,
             updated_at = excluded.updated_at",
    )
    .bind(&job.id)
    .bind(job.status.to_string())
    .bind(data)
    .bind(job.created_at.to_rfc3339())
    .bind(Utc::now().to_rfc3339())
    .execute(&mut **tx)
    .await?;

    Ok(())
}

/// Load every stored job, keyed by id.
pub async fn load_all(pool: &SqlitePool) -> Result<HashMap<String, ScanJob>> {
    let rows: Vec<(String, String)> = sqlx::query_as("SELECT id, data FROM scan_jobs")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|(id, data)| decode(&id, &data).map(|job| (id, job)))
        .collect()
}

/// Load one job by id.
#[cfg(test)]
async fn get_job(pool: &SqlitePool, id: &str) -> Result<Option<ScanJob>> {
    let data: Option<String> = sqlx::query_scalar("SELECT data FROM scan_jobs WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    data.map(|data| decode(id, &data)).transpose()
}

/// Ids of jobs currently in `status`, oldest first.
#[cfg(test)]
async fn ids_by_status(pool: &SqlitePool, status: JobStatus) -> Result<Vec<String>> {
    let ids = sqlx::query_scalar("SELECT id FROM scan_jobs WHERE status = ? ORDER BY created_at, id")
        .bind(status.to_string())
        .fetch_all(pool)
        .await?;
    Ok(ids)
}

/// Insert or update `job` without touching other rows.
pub async fn save_one(pool: &SqlitePool, job: &ScanJob) -> Result<()> {
    let mut tx = pool.begin().await?;
    upsert(&mut tx, job).await?;
    tx.commit().await?;
    tracing::trace!(job_id = %job.id, status = %job.status, "scan job persisted");
    Ok(())
}

/// Make the table hold exactly `jobs`, in one transaction.
pub async fn replace_all(pool: &SqlitePool, jobs: &HashMap<String, ScanJob>) -> Result<()> {
    let mut tx = pool.begin().await?;

    let stored: Vec<String> = sqlx::query_scalar("SELECT id FROM scan_jobs")
        .fetch_all(&mut *tx)
        .await?;
    let keep: HashSet<&str> = jobs.keys().map(String::as_str).collect();

    let mut removed = 0usize;
    for id in stored.iter().filter(|id| !keep.contains(id.as_str())) {
        sqlx::query("DELETE FROM scan_jobs WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        removed += 1;
    }

    for job in jobs.values() {
        upsert(&mut tx, job).await?;
    }

    tx.commit().await?;
    tracing::trace!(saved = jobs.len(), removed, "scan jobs persisted");
    Ok(())
}
