use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use validator::Validate;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{CarDto, CarPayload, CarSearchParams};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_all_cars).post(create_car))
        .route("/search", get(search_cars))
        .route("/brands", get(get_all_brands))
        .route("/fuel-types", get(get_all_fuel_types))
        .route("/:id", get(get_car_by_id).put(update_car).delete(delete_car))
        .route("/:id/gallery", post(add_image_to_gallery).delete(remove_image_from_gallery))
}

async fn get_all_cars(State(state): State<AppState>) -> Result<Json<Vec<CarDto>>, AppError> {
    Ok(Json(state.car_service.get_all_cars().await?))
}

async fn get_car_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CarDto>, AppError> {
    let car = state
        .car_service
        .get_car_by_id(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car with id {} not found", id)))?;
    Ok(Json(car))
}

async fn create_car(
    State(state): State<AppState>,
    Json(payload): Json<CarPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let created = state.car_service.create_car(&payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CarPayload>,
) -> Result<Json<CarDto>, AppError> {
    payload
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let updated = state
        .car_service
        .update_car(id, &payload)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car with id {} not found", id)))?;
    Ok(Json(updated))
}

async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.car_service.delete_car(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Car with id {} not found", id)))
    }
}

async fn search_cars(
    State(state): State<AppState>,
    Query(params): Query<CarSearchParams>,
) -> Result<Json<Vec<CarDto>>, AppError> {
    Ok(Json(state.car_service.search_cars(&params).await?))
}

async fn get_all_brands(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.car_service.get_all_brands().await?))
}

async fn get_all_fuel_types(State(state): State<AppState>) -> Result<Json<Vec<String>>, AppError> {
    Ok(Json(state.car_service.get_all_fuel_types().await?))
}

async fn add_image_to_gallery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    mut multipart: Multipart,
) -> Result<Json<CarDto>, AppError> {
    let mut upload: Option<(Vec<u8>, String, String)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart payload: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read uploaded file: {}", e)))?;
        upload = Some((data.to_vec(), filename, content_type));
        break;
    }

    let (data, filename, content_type) =
        upload.ok_or_else(|| AppError::Validation("Missing multipart field 'file'".to_string()))?;

    tracing::info!(
        "{} Gallery upload for car {}: {} ({} bytes)",
        API_NAME,
        id,
        filename,
        data.len()
    );

    let car = state
        .car_service
        .add_image(id, data, &filename, &content_type)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car with id {} not found", id)))?;
    Ok(Json(car))
}

#[derive(Debug, Deserialize)]
struct RemoveImageParams {
    #[serde(rename = "imageUrl")]
    image_url: String,
}

async fn remove_image_from_gallery(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Query(params): Query<RemoveImageParams>,
) -> Result<Json<CarDto>, AppError> {
    let car = state
        .car_service
        .remove_image(id, &params.image_url)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Car with id {} not found", id)))?;
    Ok(Json(car))
}
