//! Vehicle service
//!
//! Business operations on vehicle records: listing, creation with
//! defaults, status and flag updates, deletion and photo attachment.
//!
//! Updates and deletes are unconditional overwrites: targeting an id that
//! does not exist affects zero rows and is reported as success, matching
//! the last-writer-wins model of the store.

use crate::db::repositories::VehicleRepository;
use crate::models::{NewVehicle, Vehicle};
use anyhow::Context;
use std::sync::Arc;

/// Error types for vehicle service operations
#[derive(Debug, thiserror::Error)]
pub enum VehicleServiceError {
    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Vehicle service
pub struct VehicleService {
    repo: Arc<dyn VehicleRepository>,
}

impl VehicleService {
    /// Create a new vehicle service
    pub fn new(repo: Arc<dyn VehicleRepository>) -> Self {
        Self { repo }
    }

    /// List all vehicles, most recently created first
    pub async fn list(&self) -> Result<Vec<Vehicle>, VehicleServiceError> {
        let vehicles = self.repo.list().await.context("Failed to list vehicles")?;
        Ok(vehicles)
    }

    /// Create a vehicle record.
    ///
    /// vin and company are required; transport_type defaults to "regular";
    /// both permit flags default to false. Returns the stored record
    /// including its generated id.
    pub async fn create(&self, input: NewVehicle) -> Result<Vehicle, VehicleServiceError> {
        if input.vin.trim().is_empty() {
            return Err(VehicleServiceError::ValidationError(
                "vin is required".to_string(),
            ));
        }
        if input.company.trim().is_empty() {
            return Err(VehicleServiceError::ValidationError(
                "company is required".to_string(),
            ));
        }

        let vehicle = Vehicle::from_new(input);
        let created = self
            .repo
            .create(&vehicle)
            .await
            .context("Failed to create vehicle")?;

        tracing::info!(vehicle_id = created.id, vin = %created.vin, "vehicle created");
        Ok(created)
    }

    /// Overwrite the status of a vehicle
    pub async fn update_status(
        &self,
        id: i64,
        status: &str,
    ) -> Result<(), VehicleServiceError> {
        let affected = self
            .repo
            .update_status(id, status)
            .await
            .context("Failed to update vehicle status")?;

        if affected == 0 {
            tracing::debug!(vehicle_id = id, "status update matched no rows");
        }
        Ok(())
    }

    /// Overwrite the mintrans_permit flag of a vehicle
    pub async fn update_permit(&self, id: i64, value: bool) -> Result<(), VehicleServiceError> {
        let affected = self
            .repo
            .set_permit(id, value)
            .await
            .context("Failed to update vehicle permit")?;

        if affected == 0 {
            tracing::debug!(vehicle_id = id, "permit update matched no rows");
        }
        Ok(())
    }

    /// Overwrite both permit flags of a vehicle together
    pub async fn update_flags(
        &self,
        id: i64,
        mintrans_permit: bool,
        escort_received: bool,
    ) -> Result<(), VehicleServiceError> {
        let affected = self
            .repo
            .update_flags(id, mintrans_permit, escort_received)
            .await
            .context("Failed to update vehicle flags")?;

        if affected == 0 {
            tracing::debug!(vehicle_id = id, "flags update matched no rows");
        }
        Ok(())
    }

    /// Delete a vehicle record (hard delete, irreversible)
    pub async fn delete(&self, id: i64) -> Result<(), VehicleServiceError> {
        let affected = self
            .repo
            .delete(id)
            .await
            .context("Failed to delete vehicle")?;

        if affected == 0 {
            tracing::debug!(vehicle_id = id, "delete matched no rows");
        } else {
            tracing::info!(vehicle_id = id, "vehicle deleted");
        }
        Ok(())
    }

    /// Record the stored photo reference on a vehicle.
    ///
    /// Called after the blob has been written. Returns whether a row was
    /// actually updated so the caller can clean up an orphaned blob.
    pub async fn attach_photo(
        &self,
        id: i64,
        photo: &str,
    ) -> Result<bool, VehicleServiceError> {
        let affected = self
            .repo
            .set_photo(id, photo)
            .await
            .context("Failed to attach vehicle photo")?;

        if affected == 0 {
            tracing::debug!(vehicle_id = id, photo, "photo attach matched no rows");
        }
        Ok(affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::SqlxVehicleRepository;
    use crate::db::{create_test_pool, migrations, DynDatabasePool};

    async fn setup_test_service() -> (DynDatabasePool, VehicleService) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let repo = SqlxVehicleRepository::boxed(pool.clone());
        (pool, VehicleService::new(repo))
    }

    fn minimal_input() -> NewVehicle {
        NewVehicle {
            vin: "X1".to_string(),
            company: "Acme".to_string(),
            ..NewVehicle::default()
        }
    }

    #[tokio::test]
    async fn test_create_applies_defaults() {
        let (_pool, service) = setup_test_service().await;

        let vehicle = service
            .create(minimal_input())
            .await
            .expect("Failed to create vehicle");

        assert!(vehicle.id > 0);
        assert_eq!(vehicle.transport_type, "regular");
        assert!(!vehicle.mintrans_permit);
        assert!(!vehicle.escort_received);
        assert!(vehicle.cargo_name.is_none());
    }

    #[tokio::test]
    async fn test_create_requires_vin() {
        let (_pool, service) = setup_test_service().await;

        let result = service
            .create(NewVehicle {
                vin: "".to_string(),
                ..minimal_input()
            })
            .await;

        assert!(matches!(
            result,
            Err(VehicleServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_create_requires_company() {
        let (_pool, service) = setup_test_service().await;

        let result = service
            .create(NewVehicle {
                company: "  ".to_string(),
                ..minimal_input()
            })
            .await;

        assert!(matches!(
            result,
            Err(VehicleServiceError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (_pool, service) = setup_test_service().await;

        let a = service.create(minimal_input()).await.unwrap();
        let b = service.create(minimal_input()).await.unwrap();

        let vehicles = service.list().await.expect("Failed to list");

        assert_eq!(vehicles[0].id, b.id);
        assert_eq!(vehicles[1].id, a.id);
    }

    #[tokio::test]
    async fn test_update_status_roundtrip() {
        let (_pool, service) = setup_test_service().await;
        let created = service.create(minimal_input()).await.unwrap();

        service
            .update_status(created.id, "done")
            .await
            .expect("Update should succeed");

        let vehicles = service.list().await.unwrap();
        assert_eq!(vehicles[0].status.as_deref(), Some("done"));
    }

    #[tokio::test]
    async fn test_update_status_missing_id_is_silent_noop() {
        let (_pool, service) = setup_test_service().await;

        service
            .update_status(999, "done")
            .await
            .expect("Missing id must not be an error");

        // And no record was created as a side effect
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_permit_missing_id_is_silent_noop() {
        let (_pool, service) = setup_test_service().await;

        service
            .update_permit(999, true)
            .await
            .expect("Missing id must not be an error");
    }

    #[tokio::test]
    async fn test_update_flags_sets_both() {
        let (_pool, service) = setup_test_service().await;
        let created = service.create(minimal_input()).await.unwrap();

        service
            .update_flags(created.id, true, true)
            .await
            .expect("Update should succeed");

        let vehicles = service.list().await.unwrap();
        assert!(vehicles[0].mintrans_permit);
        assert!(vehicles[0].escort_received);
    }

    #[tokio::test]
    async fn test_delete_then_list_excludes_id() {
        let (_pool, service) = setup_test_service().await;

        let keep = service.create(minimal_input()).await.unwrap();
        let gone = service.create(minimal_input()).await.unwrap();

        service.delete(gone.id).await.expect("Delete should succeed");

        let vehicles = service.list().await.unwrap();
        assert!(vehicles.iter().any(|v| v.id == keep.id));
        assert!(vehicles.iter().all(|v| v.id != gone.id));
    }

    #[tokio::test]
    async fn test_delete_missing_id_is_silent_noop() {
        let (_pool, service) = setup_test_service().await;

        service
            .delete(999)
            .await
            .expect("Missing id must not be an error");
    }

    #[tokio::test]
    async fn test_attach_photo_stores_reference() {
        let (_pool, service) = setup_test_service().await;
        let created = service.create(minimal_input()).await.unwrap();

        let attached = service
            .attach_photo(created.id, "f6b2.jpg")
            .await
            .expect("Attach should succeed");
        assert!(attached);

        let vehicles = service.list().await.unwrap();
        assert_eq!(vehicles[0].photo.as_deref(), Some("f6b2.jpg"));
    }

    #[tokio::test]
    async fn test_attach_photo_missing_id_reports_no_row() {
        let (_pool, service) = setup_test_service().await;

        let attached = service
            .attach_photo(999, "f6b2.jpg")
            .await
            .expect("Attach should not error");

        assert!(!attached);
    }
}
