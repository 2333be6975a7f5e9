use sqlx::PgPool;

use crate::models::CarImage;

const IMAGE_COLUMNS: &str = "id, car_id, image_url, public_id";

/// Gallery rows keyed by car id. Insertion order is id order, which makes
/// the first row the car's main image.
#[derive(Clone)]
pub struct ImageRepository {
    pool: PgPool,
}

impl ImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_car_id(&self, car_id: i64) -> Result<Vec<CarImage>, sqlx::Error> {
        sqlx::query_as::<_, CarImage>(&format!(
            "SELECT {} FROM car_images WHERE car_id = $1 ORDER BY id",
            IMAGE_COLUMNS
        ))
        .bind(car_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_car_ids(&self, car_ids: &[i64]) -> Result<Vec<CarImage>, sqlx::Error> {
        sqlx::query_as::<_, CarImage>(&format!(
            "SELECT {} FROM car_images WHERE car_id = ANY($1) ORDER BY id",
            IMAGE_COLUMNS
        ))
        .bind(car_ids)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn find_by_car_and_url(
        &self,
        car_id: i64,
        image_url: &str,
    ) -> Result<Option<CarImage>, sqlx::Error> {
        sqlx::query_as::<_, CarImage>(&format!(
            "SELECT {} FROM car_images WHERE car_id = $1 AND image_url = $2 ORDER BY id LIMIT 1",
            IMAGE_COLUMNS
        ))
        .bind(car_id)
        .bind(image_url)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert(
        &self,
        car_id: i64,
        image_url: &str,
        public_id: &str,
    ) -> Result<CarImage, sqlx::Error> {
        sqlx::query_as::<_, CarImage>(&format!(
            "INSERT INTO car_images (car_id, image_url, public_id) VALUES ($1, $2, $3) RETURNING {}",
            IMAGE_COLUMNS
        ))
        .bind(car_id)
        .bind(image_url)
        .bind(public_id)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM car_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Bulk removal of a car's whole gallery, run ahead of deleting the car
    /// itself.
    pub async fn delete_by_car_id(&self, car_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_images WHERE car_id = $1")
            .bind(car_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
