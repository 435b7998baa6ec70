use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;

use super::{DensityRepository, RepositoryResult};
use crate::models::density::{DensityReading, DensityReadingRow};

const SELECT_READINGS: &str = r#"
    SELECT id, location_name, lng, lat, density_level, density, crowd_size,
           capacity, occupancy_percentage, sections, updated_at
    FROM crowd_density
    ORDER BY updated_at DESC, id ASC
"#;

pub struct PgDensityRepository {
    pool: PgPool,
}

impl PgDensityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DensityRepository for PgDensityRepository {
    async fn list(&self) -> RepositoryResult<Vec<DensityReading>> {
        let rows = sqlx::query_as::<_, DensityReadingRow>(SELECT_READINGS)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(DensityReading::from).collect())
    }

    async fn replace_all(&self, readings: &[DensityReading]) -> RepositoryResult<usize> {
        // Borrado e inserción en una sola transacción: nadie ve la tabla vacía
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM crowd_density")
            .execute(&mut *tx)
            .await?;

        for reading in readings {
            sqlx::query(
                r#"
                INSERT INTO crowd_density
                    (location_name, lng, lat, density_level, density, crowd_size,
                     capacity, occupancy_percentage, sections, updated_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                "#,
            )
            .bind(&reading.location_name)
            .bind(reading.coordinates.lng)
            .bind(reading.coordinates.lat)
            .bind(reading.density_level)
            .bind(reading.density)
            .bind(reading.crowd_size)
            .bind(reading.capacity)
            .bind(reading.occupancy_percentage)
            .bind(Json(&reading.sections))
            .bind(reading.updated_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(readings.len())
    }

    async fn upsert(&self, reading: DensityReading) -> RepositoryResult<DensityReading> {
        let row = sqlx::query_as::<_, DensityReadingRow>(
            r#"
            INSERT INTO crowd_density
                (location_name, lng, lat, density_level, density, crowd_size,
                 capacity, occupancy_percentage, sections, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (location_name) DO UPDATE SET
                lng = EXCLUDED.lng,
                lat = EXCLUDED.lat,
                density_level = EXCLUDED.density_level,
                density = EXCLUDED.density,
                crowd_size = EXCLUDED.crowd_size,
                capacity = EXCLUDED.capacity,
                occupancy_percentage = EXCLUDED.occupancy_percentage,
                sections = EXCLUDED.sections,
                updated_at = EXCLUDED.updated_at
            RETURNING id, location_name, lng, lat, density_level, density, crowd_size,
                      capacity, occupancy_percentage, sections, updated_at
            "#,
        )
        .bind(&reading.location_name)
        .bind(reading.coordinates.lng)
        .bind(reading.coordinates.lat)
        .bind(reading.density_level)
        .bind(reading.density)
        .bind(reading.crowd_size)
        .bind(reading.capacity)
        .bind(reading.occupancy_percentage)
        .bind(Json(&reading.sections))
        .bind(reading.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }
}
