//! Data models
//!
//! Domain entities for the Fleettrack system.

pub mod user;
pub mod vehicle;

pub use user::User;
pub use vehicle::{NewVehicle, Vehicle};
