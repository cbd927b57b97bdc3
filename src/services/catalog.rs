//! Rooms, providers and equipment inventory

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        equipment::{CreateEquipment, Equipment, EquipmentStatus, UpdateEquipment},
        provider::{CreateProvider, Provider, UpdateProvider},
        room::{CreateRoom, Room, UpdateRoom},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Rooms

    pub async fn list_rooms(&self) -> AppResult<Vec<Room>> {
        self.repository.rooms_list().await
    }

    pub async fn get_room(&self, id: i32) -> AppResult<Room> {
        self.repository.rooms_get_by_id(id).await
    }

    pub async fn create_room(&self, data: CreateRoom) -> AppResult<Room> {
        data.validate()?;
        self.repository.rooms_create(&data).await
    }

    pub async fn update_room(&self, id: i32, data: UpdateRoom) -> AppResult<Room> {
        data.validate()?;
        self.repository.rooms_update(id, &data).await
    }

    pub async fn delete_room(&self, id: i32) -> AppResult<()> {
        self.repository.rooms_delete(id).await
    }

    // Providers

    pub async fn list_providers(&self) -> AppResult<Vec<Provider>> {
        self.repository.providers_list().await
    }

    pub async fn get_provider(&self, id: i32) -> AppResult<Provider> {
        self.repository.providers_get_by_id(id).await
    }

    pub async fn create_provider(&self, data: CreateProvider) -> AppResult<Provider> {
        data.validate()?;
        self.repository.providers_create(&data).await
    }

    pub async fn update_provider(&self, id: i32, data: UpdateProvider) -> AppResult<Provider> {
        data.validate()?;
        self.repository.providers_update(id, &data).await
    }

    pub async fn delete_provider(&self, id: i32) -> AppResult<()> {
        self.repository.providers_delete(id).await
    }

    // Equipment

    pub async fn list_equipment(&self, status: Option<EquipmentStatus>, room_id: Option<i32>) -> AppResult<Vec<Equipment>> {
        self.repository.equipment_list(status, room_id).await
    }

    pub async fn get_equipment(&self, id: i32) -> AppResult<Equipment> {
        self.repository.equipment_get_by_id(id).await
    }

    pub async fn create_equipment(&self, data: CreateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        let equipment = self.repository.equipment_create(&data).await?;
        tracing::info!(equipment_id = equipment.id, "Equipment created");
        Ok(equipment)
    }

    /// Edit equipment; `checked_out` can only be reached through a checkout
    pub async fn update_equipment(&self, id: i32, data: UpdateEquipment) -> AppResult<Equipment> {
        data.validate()?;
        if data.status == Some(EquipmentStatus::CheckedOut) {
            return Err(AppError::Validation(
                "Equipment status checked_out is managed by checkouts".to_string(),
            ));
        }
        self.repository.equipment_update(id, &data).await
    }

    pub async fn delete_equipment(&self, id: i32) -> AppResult<()> {
        self.repository.equipment_delete(id).await?;
        tracing::info!(equipment_id = id, "Equipment deleted");
        Ok(())
    }
}
