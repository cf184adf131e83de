//! Repository layer
//!
//! Data access for the Fleettrack backend. Each repository is defined as a
//! trait (for dependency injection and test doubles) with a SQLx-backed
//! implementation supporting both SQLite and PostgreSQL.

pub mod user;
pub mod vehicle;

pub use user::{SqlxUserRepository, UserRepository};
pub use vehicle::{SqlxVehicleRepository, VehicleRepository};
