use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::models::application::{
    ApplicationRow, ApplicationStatus, JobApplication, NewApplication,
};
use crate::storage::{ApplicationStore, StorageError};

const COLUMNS: &str = "id, company_name, job_title, date_applied, status, notes";

/// `job_applications` table access. The schema is created by `db::ensure_schema`.
#[derive(Clone)]
pub struct PgApplicationStore {
    pool: PgPool,
}

impl PgApplicationStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn to_application(row: ApplicationRow) -> Result<JobApplication, StorageError> {
    JobApplication::try_from(row).map_err(|e| StorageError::InvalidRow(e.to_string()))
}

#[async_trait]
impl ApplicationStore for PgApplicationStore {
    async fn create(&self, application: &NewApplication) -> Result<JobApplication, StorageError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"
            INSERT INTO job_applications (id, company_name, job_title, date_applied, status, notes)
            VALUES ($1, $2, $3, NOW(), $4, $5)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(application.company_name.trim())
        .bind(application.job_title.trim())
        .bind(application.status.as_str())
        .bind(&application.notes)
        .fetch_one(&self.pool)
        .await?;

        info!("Tracking application {} at {}", row.id, row.company_name);
        to_application(row)
    }

    async fn list(&self) -> Result<Vec<JobApplication>, StorageError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            "SELECT {COLUMNS} FROM job_applications ORDER BY date_applied DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(to_application).collect()
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, StorageError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "UPDATE job_applications SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(to_application).transpose()
    }

    async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        let result = sqlx::query("DELETE FROM job_applications WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self) -> Result<u64, StorageError> {
        let result = sqlx::query("DELETE FROM job_applications")
            .execute(&self.pool)
            .await?;
        info!("Cleared {} tracked applications", result.rows_affected());
        Ok(result.rows_affected())
    }
}
