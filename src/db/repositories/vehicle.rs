//! Vehicle repository
//!
//! Database operations for vehicle records. Every mutation issues exactly
//! one statement and reports the number of rows affected; updates and
//! deletes against an id that does not exist affect zero rows and are not
//! treated as errors here.

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::Vehicle;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row, SqlitePool};
use std::sync::Arc;

/// Vehicle repository trait
#[async_trait]
pub trait VehicleRepository: Send + Sync {
    /// Create a new vehicle record, returning it with its generated id
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle>;

    /// Get vehicle by ID
    async fn get_by_id(&self, id: i64) -> Result<Option<Vehicle>>;

    /// List all vehicles, newest id first
    async fn list(&self) -> Result<Vec<Vehicle>>;

    /// Overwrite the status field; returns rows affected
    async fn update_status(&self, id: i64, status: &str) -> Result<u64>;

    /// Overwrite the mintrans_permit flag; returns rows affected
    async fn set_permit(&self, id: i64, value: bool) -> Result<u64>;

    /// Overwrite both boolean flags together; returns rows affected
    async fn update_flags(&self, id: i64, mintrans_permit: bool, escort_received: bool)
        -> Result<u64>;

    /// Delete the record; returns rows affected
    async fn delete(&self, id: i64) -> Result<u64>;

    /// Store the photo reference; returns rows affected
    async fn set_photo(&self, id: i64, photo: &str) -> Result<u64>;
}

/// SQLx-based vehicle repository implementation
pub struct SqlxVehicleRepository {
    pool: DynDatabasePool,
}

impl SqlxVehicleRepository {
    /// Create a new SQLx vehicle repository
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a boxed repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn VehicleRepository> {
        Arc::new(Self::new(pool))
    }
}

#[async_trait]
impl VehicleRepository for SqlxVehicleRepository {
    async fn create(&self, vehicle: &Vehicle) -> Result<Vehicle> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => create_sqlite(self.pool.as_sqlite().unwrap(), vehicle).await,
            DatabaseDriver::Postgres => {
                create_postgres(self.pool.as_postgres().unwrap(), vehicle).await
            }
        }
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Vehicle>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => get_by_id_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Postgres => {
                get_by_id_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn list(&self) -> Result<Vec<Vehicle>> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => list_sqlite(self.pool.as_sqlite().unwrap()).await,
            DatabaseDriver::Postgres => list_postgres(self.pool.as_postgres().unwrap()).await,
        }
    }

    async fn update_status(&self, id: i64, status: &str) -> Result<u64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_status_sqlite(self.pool.as_sqlite().unwrap(), id, status).await
            }
            DatabaseDriver::Postgres => {
                update_status_postgres(self.pool.as_postgres().unwrap(), id, status).await
            }
        }
    }

    async fn set_permit(&self, id: i64, value: bool) -> Result<u64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_permit_sqlite(self.pool.as_sqlite().unwrap(), id, value).await
            }
            DatabaseDriver::Postgres => {
                set_permit_postgres(self.pool.as_postgres().unwrap(), id, value).await
            }
        }
    }

    async fn update_flags(
        &self,
        id: i64,
        mintrans_permit: bool,
        escort_received: bool,
    ) -> Result<u64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                update_flags_sqlite(
                    self.pool.as_sqlite().unwrap(),
                    id,
                    mintrans_permit,
                    escort_received,
                )
                .await
            }
            DatabaseDriver::Postgres => {
                update_flags_postgres(
                    self.pool.as_postgres().unwrap(),
                    id,
                    mintrans_permit,
                    escort_received,
                )
                .await
            }
        }
    }

    async fn delete(&self, id: i64) -> Result<u64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => delete_sqlite(self.pool.as_sqlite().unwrap(), id).await,
            DatabaseDriver::Postgres => {
                delete_postgres(self.pool.as_postgres().unwrap(), id).await
            }
        }
    }

    async fn set_photo(&self, id: i64, photo: &str) -> Result<u64> {
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                set_photo_sqlite(self.pool.as_sqlite().unwrap(), id, photo).await
            }
            DatabaseDriver::Postgres => {
                set_photo_postgres(self.pool.as_postgres().unwrap(), id, photo).await
            }
        }
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

const SELECT_COLUMNS: &str = "id, vin, company, status, transport_type, cargo_name, \
     cargo_weight, cargo_size, mintrans_permit, escort_received, photo, created_at";

async fn create_sqlite(pool: &SqlitePool, vehicle: &Vehicle) -> Result<Vehicle> {
    let now = Utc::now();

    let result = sqlx::query(
        r#"
        INSERT INTO vehicles
            (vin, company, status, transport_type, cargo_name, cargo_weight, cargo_size,
             mintrans_permit, escort_received, photo, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&vehicle.vin)
    .bind(&vehicle.company)
    .bind(&vehicle.status)
    .bind(&vehicle.transport_type)
    .bind(&vehicle.cargo_name)
    .bind(vehicle.cargo_weight)
    .bind(&vehicle.cargo_size)
    .bind(vehicle.mintrans_permit)
    .bind(vehicle.escort_received)
    .bind(&vehicle.photo)
    .bind(now)
    .execute(pool)
    .await
    .context("Failed to create vehicle")?;

    Ok(Vehicle {
        id: result.last_insert_rowid(),
        created_at: now,
        ..vehicle.clone()
    })
}

async fn get_by_id_sqlite(pool: &SqlitePool, id: i64) -> Result<Option<Vehicle>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM vehicles WHERE id = ?",
        SELECT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get vehicle by ID")?;

    Ok(row.map(|row| row_to_vehicle_sqlite(&row)))
}

async fn list_sqlite(pool: &SqlitePool) -> Result<Vec<Vehicle>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM vehicles ORDER BY id DESC",
        SELECT_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list vehicles")?;

    Ok(rows.iter().map(row_to_vehicle_sqlite).collect())
}

async fn update_status_sqlite(pool: &SqlitePool, id: i64, status: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE vehicles SET status = ? WHERE id = ?")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update vehicle status")?;

    Ok(result.rows_affected())
}

async fn set_permit_sqlite(pool: &SqlitePool, id: i64, value: bool) -> Result<u64> {
    let result = sqlx::query("UPDATE vehicles SET mintrans_permit = ? WHERE id = ?")
        .bind(value)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update vehicle permit")?;

    Ok(result.rows_affected())
}

async fn update_flags_sqlite(
    pool: &SqlitePool,
    id: i64,
    mintrans_permit: bool,
    escort_received: bool,
) -> Result<u64> {
    let result =
        sqlx::query("UPDATE vehicles SET mintrans_permit = ?, escort_received = ? WHERE id = ?")
            .bind(mintrans_permit)
            .bind(escort_received)
            .bind(id)
            .execute(pool)
            .await
            .context("Failed to update vehicle flags")?;

    Ok(result.rows_affected())
}

async fn delete_sqlite(pool: &SqlitePool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete vehicle")?;

    Ok(result.rows_affected())
}

async fn set_photo_sqlite(pool: &SqlitePool, id: i64, photo: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE vehicles SET photo = ? WHERE id = ?")
        .bind(photo)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to set vehicle photo")?;

    Ok(result.rows_affected())
}

fn row_to_vehicle_sqlite(row: &sqlx::sqlite::SqliteRow) -> Vehicle {
    Vehicle {
        id: row.get("id"),
        vin: row.get("vin"),
        company: row.get("company"),
        status: row.get("status"),
        transport_type: row.get("transport_type"),
        cargo_name: row.get("cargo_name"),
        cargo_weight: row.get("cargo_weight"),
        cargo_size: row.get("cargo_size"),
        mintrans_permit: row.get("mintrans_permit"),
        escort_received: row.get("escort_received"),
        photo: row.get("photo"),
        created_at: row.get("created_at"),
    }
}

// ============================================================================
// PostgreSQL implementations
// ============================================================================

async fn create_postgres(pool: &PgPool, vehicle: &Vehicle) -> Result<Vehicle> {
    let now = Utc::now();

    let row = sqlx::query(
        r#"
        INSERT INTO vehicles
            (vin, company, status, transport_type, cargo_name, cargo_weight, cargo_size,
             mintrans_permit, escort_received, photo, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        RETURNING id
        "#,
    )
    .bind(&vehicle.vin)
    .bind(&vehicle.company)
    .bind(&vehicle.status)
    .bind(&vehicle.transport_type)
    .bind(&vehicle.cargo_name)
    .bind(vehicle.cargo_weight)
    .bind(&vehicle.cargo_size)
    .bind(vehicle.mintrans_permit)
    .bind(vehicle.escort_received)
    .bind(&vehicle.photo)
    .bind(now)
    .fetch_one(pool)
    .await
    .context("Failed to create vehicle")?;

    Ok(Vehicle {
        id: row.get("id"),
        created_at: now,
        ..vehicle.clone()
    })
}

async fn get_by_id_postgres(pool: &PgPool, id: i64) -> Result<Option<Vehicle>> {
    let row = sqlx::query(&format!(
        "SELECT {} FROM vehicles WHERE id = $1",
        SELECT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to get vehicle by ID")?;

    Ok(row.map(|row| row_to_vehicle_postgres(&row)))
}

async fn list_postgres(pool: &PgPool) -> Result<Vec<Vehicle>> {
    let rows = sqlx::query(&format!(
        "SELECT {} FROM vehicles ORDER BY id DESC",
        SELECT_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .context("Failed to list vehicles")?;

    Ok(rows.iter().map(row_to_vehicle_postgres).collect())
}

async fn update_status_postgres(pool: &PgPool, id: i64, status: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE vehicles SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update vehicle status")?;

    Ok(result.rows_affected())
}

async fn set_permit_postgres(pool: &PgPool, id: i64, value: bool) -> Result<u64> {
    let result = sqlx::query("UPDATE vehicles SET mintrans_permit = $1 WHERE id = $2")
        .bind(value)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to update vehicle permit")?;

    Ok(result.rows_affected())
}

async fn update_flags_postgres(
    pool: &PgPool,
    id: i64,
    mintrans_permit: bool,
    escort_received: bool,
) -> Result<u64> {
    let result = sqlx::query(
        "UPDATE vehicles SET mintrans_permit = $1, escort_received = $2 WHERE id = $3",
    )
    .bind(mintrans_permit)
    .bind(escort_received)
    .bind(id)
    .execute(pool)
    .await
    .context("Failed to update vehicle flags")?;

    Ok(result.rows_affected())
}

async fn delete_postgres(pool: &PgPool, id: i64) -> Result<u64> {
    let result = sqlx::query("DELETE FROM vehicles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to delete vehicle")?;

    Ok(result.rows_affected())
}

async fn set_photo_postgres(pool: &PgPool, id: i64, photo: &str) -> Result<u64> {
    let result = sqlx::query("UPDATE vehicles SET photo = $1 WHERE id = $2")
        .bind(photo)
        .bind(id)
        .execute(pool)
        .await
        .context("Failed to set vehicle photo")?;

    Ok(result.rows_affected())
}

fn row_to_vehicle_postgres(row: &sqlx::postgres::PgRow) -> Vehicle {
    Vehicle {
        id: row.get("id"),
        vin: row.get("vin"),
        company: row.get("company"),
        status: row.get("status"),
        transport_type: row.get("transport_type"),
        cargo_name: row.get("cargo_name"),
        cargo_weight: row.get("cargo_weight"),
        cargo_size: row.get("cargo_size"),
        mintrans_permit: row.get("mintrans_permit"),
        escort_received: row.get("escort_received"),
        photo: row.get("photo"),
        created_at: row.get("created_at"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::models::NewVehicle;

    async fn setup_test_repo() -> (DynDatabasePool, SqlxVehicleRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxVehicleRepository::new(pool.clone());
        (pool, repo)
    }

    fn test_vehicle(vin: &str) -> Vehicle {
        Vehicle::from_new(NewVehicle {
            vin: vin.to_string(),
            company: "Acme".to_string(),
            ..NewVehicle::default()
        })
    }

    #[tokio::test]
    async fn test_create_vehicle_returns_generated_id() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&test_vehicle("X1"))
            .await
            .expect("Failed to create vehicle");

        assert!(created.id > 0);
        assert_eq!(created.vin, "X1");
        assert_eq!(created.transport_type, "regular");
        assert!(!created.mintrans_permit);
        assert!(!created.escort_received);
    }

    #[tokio::test]
    async fn test_create_ids_are_unique() {
        let (_pool, repo) = setup_test_repo().await;

        let a = repo.create(&test_vehicle("A")).await.unwrap();
        let b = repo.create(&test_vehicle("B")).await.unwrap();
        let c = repo.create(&test_vehicle("C")).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_ne!(b.id, c.id);
        assert_ne!(a.id, c.id);
    }

    #[tokio::test]
    async fn test_list_orders_by_id_descending() {
        let (_pool, repo) = setup_test_repo().await;

        let first = repo.create(&test_vehicle("A")).await.unwrap();
        let second = repo.create(&test_vehicle("B")).await.unwrap();
        let third = repo.create(&test_vehicle("C")).await.unwrap();

        let vehicles = repo.list().await.expect("Failed to list vehicles");

        let ids: Vec<i64> = vehicles.iter().map(|v| v.id).collect();
        assert_eq!(ids, vec![third.id, second.id, first.id]);
    }

    #[tokio::test]
    async fn test_get_by_id_round_trips_optional_fields() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo
            .create(&Vehicle::from_new(NewVehicle {
                vin: "X9".to_string(),
                company: "Acme".to_string(),
                status: Some("loading".to_string()),
                cargo_name: Some("turbine".to_string()),
                cargo_weight: Some(18.4),
                cargo_size: Some("4x3x3".to_string()),
                escort_received: Some(true),
                ..NewVehicle::default()
            }))
            .await
            .unwrap();

        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get vehicle")
            .expect("Vehicle not found");

        assert_eq!(found.status.as_deref(), Some("loading"));
        assert_eq!(found.cargo_name.as_deref(), Some("turbine"));
        assert_eq!(found.cargo_weight, Some(18.4));
        assert_eq!(found.cargo_size.as_deref(), Some("4x3x3"));
        assert!(found.escort_received);
        assert!(found.photo.is_none());
    }

    #[tokio::test]
    async fn test_update_status() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&test_vehicle("X1")).await.unwrap();

        let affected = repo
            .update_status(created.id, "in transit")
            .await
            .expect("Failed to update status");
        assert_eq!(affected, 1);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.status.as_deref(), Some("in transit"));
    }

    #[tokio::test]
    async fn test_update_status_missing_id_affects_no_rows() {
        let (_pool, repo) = setup_test_repo().await;

        let affected = repo
            .update_status(999, "done")
            .await
            .expect("Update should not error");

        assert_eq!(affected, 0);
        assert!(repo.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_permit() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&test_vehicle("X1")).await.unwrap();

        let affected = repo.set_permit(created.id, true).await.unwrap();
        assert_eq!(affected, 1);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert!(found.mintrans_permit);
        assert!(!found.escort_received);
    }

    #[tokio::test]
    async fn test_update_flags_together() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&test_vehicle("X1")).await.unwrap();

        let affected = repo.update_flags(created.id, true, true).await.unwrap();
        assert_eq!(affected, 1);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert!(found.mintrans_permit);
        assert!(found.escort_received);
    }

    #[tokio::test]
    async fn test_delete_removes_record() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&test_vehicle("X1")).await.unwrap();

        let affected = repo.delete(created.id).await.unwrap();
        assert_eq!(affected, 1);

        assert!(repo.get_by_id(created.id).await.unwrap().is_none());
        assert!(repo.list().await.unwrap().iter().all(|v| v.id != created.id));
    }

    #[tokio::test]
    async fn test_delete_missing_id_affects_no_rows() {
        let (_pool, repo) = setup_test_repo().await;

        let affected = repo.delete(12345).await.expect("Delete should not error");
        assert_eq!(affected, 0);
    }

    #[tokio::test]
    async fn test_set_photo() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(&test_vehicle("X1")).await.unwrap();

        let affected = repo.set_photo(created.id, "abc123.jpg").await.unwrap();
        assert_eq!(affected, 1);

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.photo.as_deref(), Some("abc123.jpg"));
    }
}
