use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::models::{Car, CarPayload, CarSearchParams};

const CAR_COLUMNS: &str = "id, brand, model, production_year, price, fuel_type, mileage, \
                           engine_capacity, transmission, description, created_at, updated_at";

#[derive(Clone)]
pub struct CarRepository {
    pool: PgPool,
}

impl CarRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_all(&self) -> Result<Vec<Car>, sqlx::Error> {
        sqlx::query_as::<_, Car>(&format!("SELECT {} FROM cars ORDER BY id", CAR_COLUMNS))
            .fetch_all(&self.pool)
            .await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Car>, sqlx::Error> {
        sqlx::query_as::<_, Car>(&format!("SELECT {} FROM cars WHERE id = $1", CAR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM cars WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await
    }

    pub async fn insert(&self, payload: &CarPayload) -> Result<Car, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Car>(&format!(
            "INSERT INTO cars (brand, model, production_year, price, fuel_type, mileage, \
             engine_capacity, transmission, description, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $10) RETURNING {}",
            CAR_COLUMNS
        ))
        .bind(&payload.brand)
        .bind(&payload.model)
        .bind(payload.production_year)
        .bind(payload.price)
        .bind(&payload.fuel_type)
        .bind(payload.mileage)
        .bind(payload.engine_capacity)
        .bind(&payload.transmission)
        .bind(&payload.description)
        .bind(now)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update(&self, id: i64, payload: &CarPayload) -> Result<Option<Car>, sqlx::Error> {
        let now = Utc::now();
        sqlx::query_as::<_, Car>(&format!(
            "UPDATE cars SET brand = $1, model = $2, production_year = $3, price = $4, \
             fuel_type = $5, mileage = $6, engine_capacity = $7, transmission = $8, \
             description = $9, updated_at = $10 WHERE id = $11 RETURNING {}",
            CAR_COLUMNS
        ))
        .bind(&payload.brand)
        .bind(&payload.model)
        .bind(payload.production_year)
        .bind(payload.price)
        .bind(&payload.fuel_type)
        .bind(payload.mileage)
        .bind(payload.engine_capacity)
        .bind(&payload.transmission)
        .bind(&payload.description)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Bumps `updated_at`; gallery mutations count as updates to the car.
    pub async fn touch(&self, id: i64) -> Result<Option<Car>, sqlx::Error> {
        sqlx::query_as::<_, Car>(&format!(
            "UPDATE cars SET updated_at = $1 WHERE id = $2 RETURNING {}",
            CAR_COLUMNS
        ))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn delete(&self, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn search(&self, params: &CarSearchParams) -> Result<Vec<Car>, sqlx::Error> {
        build_search_query(params)
            .build_query_as::<Car>()
            .fetch_all(&self.pool)
            .await
    }

    pub async fn distinct_brands(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT brand FROM cars ORDER BY brand COLLATE \"C\"",
        )
        .fetch_all(&self.pool)
        .await
    }

    pub async fn distinct_fuel_types(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT fuel_type FROM cars ORDER BY fuel_type COLLATE \"C\"",
        )
        .fetch_all(&self.pool)
        .await
    }
}

/// Folds the supplied criteria into one parameterized query. Every omitted
/// criterion is simply absent from the WHERE clause; `ORDER BY id` keeps the
/// result ordering stable across calls.
fn build_search_query(params: &CarSearchParams) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!("SELECT {} FROM cars WHERE 1=1", CAR_COLUMNS));

    if let Some(brand) = &params.brand {
        qb.push(" AND brand ILIKE ");
        qb.push_bind(format!("%{}%", brand));
    }
    if let Some(model) = &params.model {
        qb.push(" AND model ILIKE ");
        qb.push_bind(format!("%{}%", model));
    }
    if let Some(fuel_type) = &params.fuel_type {
        qb.push(" AND fuel_type ILIKE ");
        qb.push_bind(format!("%{}%", fuel_type));
    }
    if let Some(min_year) = params.min_year {
        qb.push(" AND production_year >= ");
        qb.push_bind(min_year);
    }
    if let Some(max_year) = params.max_year {
        qb.push(" AND production_year <= ");
        qb.push_bind(max_year);
    }
    if let Some(min_price) = params.min_price {
        qb.push(" AND price >= ");
        qb.push_bind(min_price);
    }
    if let Some(max_price) = params.max_price {
        qb.push(" AND price <= ");
        qb.push_bind(max_price);
    }
    if let Some(min_mileage) = params.min_mileage {
        qb.push(" AND mileage >= ");
        qb.push_bind(min_mileage);
    }
    if let Some(max_mileage) = params.max_mileage {
        qb.push(" AND mileage <= ");
        qb.push_bind(max_mileage);
    }
    if let Some(min_engine_capacity) = params.min_engine_capacity {
        qb.push(" AND engine_capacity >= ");
        qb.push_bind(min_engine_capacity);
    }
    if let Some(max_engine_capacity) = params.max_engine_capacity {
        qb.push(" AND engine_capacity <= ");
        qb.push_bind(max_engine_capacity);
    }

    qb.push(" ORDER BY id");
    qb
}
