use std::collections::HashMap;

use crate::constants::API_NAME;
use crate::error::AppError;
use crate::models::{Car, CarDto, CarImage, CarPayload, CarSearchParams};
use crate::repository::{CarRepository, ImageRepository};
use crate::service::image_validation;
use crate::service::ImageStore;

#[derive(Clone)]
pub struct CarService {
    car_repo: CarRepository,
    image_repo: ImageRepository,
    store: ImageStore,
}

impl CarService {
    pub fn new(car_repo: CarRepository, image_repo: ImageRepository, store: ImageStore) -> Self {
        Self { car_repo, image_repo, store }
    }

    pub async fn get_all_cars(&self) -> Result<Vec<CarDto>, AppError> {
        let cars = self.car_repo.find_all().await?;
        self.attach_galleries(cars).await
    }

    pub async fn get_car_by_id(&self, id: i64) -> Result<Option<CarDto>, AppError> {
        match self.car_repo.find_by_id(id).await? {
            Some(car) => Ok(Some(self.to_dto(car).await?)),
            None => Ok(None),
        }
    }

    pub async fn create_car(&self, payload: &CarPayload) -> Result<CarDto, AppError> {
        let car = self.car_repo.insert(payload).await?;
        tracing::info!("{} Created car {} ({} {})", API_NAME, car.id, car.brand, car.model);
        Ok(CarDto::from_car(car, Vec::new()))
    }

    pub async fn update_car(
        &self,
        id: i64,
        payload: &CarPayload,
    ) -> Result<Option<CarDto>, AppError> {
        match self.car_repo.update(id, payload).await? {
            Some(car) => {
                tracing::info!("{} Updated car {}", API_NAME, id);
                Ok(Some(self.to_dto(car).await?))
            }
            None => Ok(None),
        }
    }

    /// Deletes the car together with its gallery. Store objects are removed
    /// best-effort first; the relational rows always go.
    pub async fn delete_car(&self, id: i64) -> Result<bool, AppError> {
        if !self.car_repo.exists(id).await? {
            return Ok(false);
        }

        let images = self.image_repo.find_by_car_id(id).await?;
        for image in &images {
            if let Err(e) = self.store.delete(&image.public_id).await {
                tracing::error!(
                    "{} Failed to delete image {} from storage: {}",
                    API_NAME,
                    image.public_id,
                    e
                );
            }
        }
        self.image_repo.delete_by_car_id(id).await?;

        let deleted = self.car_repo.delete(id).await?;
        if deleted {
            tracing::info!("{} Deleted car {} and {} gallery images", API_NAME, id, images.len());
        }
        Ok(deleted)
    }

    pub async fn search_cars(&self, params: &CarSearchParams) -> Result<Vec<CarDto>, AppError> {
        let cars = self.car_repo.search(params).await?;
        self.attach_galleries(cars).await
    }

    pub async fn get_all_brands(&self) -> Result<Vec<String>, AppError> {
        Ok(self.car_repo.distinct_brands().await?)
    }

    pub async fn get_all_fuel_types(&self) -> Result<Vec<String>, AppError> {
        Ok(self.car_repo.distinct_fuel_types().await?)
    }

    /// Appends an uploaded image to the car's gallery. The car must exist
    /// before anything is sent to the store, and no image row is written
    /// unless the upload succeeded.
    pub async fn add_image(
        &self,
        car_id: i64,
        data: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<Option<CarDto>, AppError> {
        let Some(car) = self.car_repo.find_by_id(car_id).await? else {
            return Ok(None);
        };

        image_validation::validate_image(&data, filename, content_type)?;

        let stored = self.store.upload(data, filename, content_type).await?;
        self.image_repo
            .insert(car_id, &stored.image_url, &stored.public_id)
            .await?;
        let car = self.car_repo.touch(car_id).await?.unwrap_or(car);

        tracing::info!("{} Added image {} to car {} gallery", API_NAME, stored.public_id, car_id);
        Ok(Some(self.to_dto(car).await?))
    }

    /// Removes the gallery entry with the given URL. A URL that matches
    /// nothing leaves the car unchanged; a store delete failure is logged
    /// and the row is removed regardless.
    pub async fn remove_image(
        &self,
        car_id: i64,
        image_url: &str,
    ) -> Result<Option<CarDto>, AppError> {
        let Some(mut car) = self.car_repo.find_by_id(car_id).await? else {
            return Ok(None);
        };

        if let Some(image) = self.image_repo.find_by_car_and_url(car_id, image_url).await? {
            if let Err(e) = self.store.delete(&image.public_id).await {
                tracing::error!(
                    "{} Failed to delete image {} from storage: {}",
                    API_NAME,
                    image.public_id,
                    e
                );
            }
            self.image_repo.delete(image.id).await?;
            car = self.car_repo.touch(car_id).await?.unwrap_or(car);
            tracing::info!("{} Removed image {} from car {} gallery", API_NAME, image.public_id, car_id);
        }

        Ok(Some(self.to_dto(car).await?))
    }

    async fn to_dto(&self, car: Car) -> Result<CarDto, AppError> {
        let images = self.image_repo.find_by_car_id(car.id).await?;
        Ok(CarDto::from_car(car, images))
    }

    /// One gallery query for a whole result set instead of one per car.
    async fn attach_galleries(&self, cars: Vec<Car>) -> Result<Vec<CarDto>, AppError> {
        let car_ids: Vec<i64> = cars.iter().map(|car| car.id).collect();
        let mut galleries: HashMap<i64, Vec<CarImage>> = HashMap::new();
        for image in self.image_repo.find_by_car_ids(&car_ids).await? {
            galleries.entry(image.car_id).or_default().push(image);
        }

        Ok(cars
            .into_iter()
            .map(|car| {
                let images = galleries.remove(&car.id).unwrap_or_default();
                CarDto::from_car(car, images)
            })
            .collect())
    }
}
