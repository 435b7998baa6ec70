use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AlertRepository, RepositoryError, RepositoryResult};
use crate::models::alert::{NewSafetyAlert, SafetyAlert, SafetyAlertRow};

pub struct PgAlertRepository {
    pool: PgPool,
}

impl PgAlertRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertRepository for PgAlertRepository {
    async fn list_active(&self, now: DateTime<Utc>) -> RepositoryResult<Vec<SafetyAlert>> {
        let rows = sqlx::query_as::<_, SafetyAlertRow>(
            r#"
            SELECT id, title, description, location_name, lng, lat, severity, created_at, expires_at
            FROM safety_alerts
            WHERE expires_at > $1
            ORDER BY severity DESC, created_at ASC
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SafetyAlert::from).collect())
    }

    async fn create(
        &self,
        alert: NewSafetyAlert,
        created_at: DateTime<Utc>,
    ) -> RepositoryResult<SafetyAlert> {
        let row = sqlx::query_as::<_, SafetyAlertRow>(
            r#"
            INSERT INTO safety_alerts
                (id, title, description, location_name, lng, lat, severity, created_at, expires_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, title, description, location_name, lng, lat, severity, created_at, expires_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(alert.title)
        .bind(alert.description)
        .bind(alert.location_name)
        .bind(alert.coordinates.lng)
        .bind(alert.coordinates.lat)
        .bind(alert.severity)
        .bind(created_at)
        .bind(alert.expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn delete(&self, id: Uuid) -> RepositoryResult<()> {
        let result = sqlx::query("DELETE FROM safety_alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("safety alert '{}'", id)));
        }

        Ok(())
    }
}
