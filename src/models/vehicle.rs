//! Vehicle model
//!
//! Defines the Vehicle entity: one tracked transport with its cargo
//! details, permit flags and optional photo reference.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Vehicle entity representing a tracked fleet/cargo record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    /// Unique identifier
    pub id: i64,
    /// Vehicle identification number
    pub vin: String,
    /// Operating company
    pub company: String,
    /// Free-form lifecycle status (e.g. "loading", "in transit", "done")
    pub status: Option<String>,
    /// Transport category; "regular" unless stated otherwise
    pub transport_type: String,
    /// Cargo description
    pub cargo_name: Option<String>,
    /// Cargo weight in tonnes
    pub cargo_weight: Option<f64>,
    /// Cargo dimensions
    pub cargo_size: Option<String>,
    /// Transport-ministry permit received
    pub mintrans_permit: bool,
    /// Escort vehicle arranged
    pub escort_received: bool,
    /// Reference to the stored photo, when one has been uploaded
    pub photo: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Input for creating a new vehicle record.
///
/// Optional fields mirror what clients may omit; defaults are applied by
/// the vehicle service before the record is stored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewVehicle {
    pub vin: String,
    pub company: String,
    pub status: Option<String>,
    pub transport_type: Option<String>,
    pub cargo_name: Option<String>,
    pub cargo_weight: Option<f64>,
    pub cargo_size: Option<String>,
    pub mintrans_permit: Option<bool>,
    pub escort_received: Option<bool>,
}

impl Vehicle {
    /// Build a Vehicle from creation input, applying defaults.
    ///
    /// The id is assigned by the database.
    pub fn from_new(input: NewVehicle) -> Self {
        Self {
            id: 0,
            vin: input.vin,
            company: input.company,
            status: input.status,
            transport_type: input
                .transport_type
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| "regular".to_string()),
            cargo_name: input.cargo_name,
            cargo_weight: input.cargo_weight,
            cargo_size: input.cargo_size,
            mintrans_permit: input.mintrans_permit.unwrap_or(false),
            escort_received: input.escort_received.unwrap_or(false),
            photo: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_input() -> NewVehicle {
        NewVehicle {
            vin: "X1".to_string(),
            company: "Acme".to_string(),
            ..NewVehicle::default()
        }
    }

    #[test]
    fn test_from_new_applies_defaults() {
        let vehicle = Vehicle::from_new(minimal_input());

        assert_eq!(vehicle.id, 0);
        assert_eq!(vehicle.vin, "X1");
        assert_eq!(vehicle.company, "Acme");
        assert_eq!(vehicle.transport_type, "regular");
        assert!(!vehicle.mintrans_permit);
        assert!(!vehicle.escort_received);
        assert!(vehicle.status.is_none());
        assert!(vehicle.cargo_name.is_none());
        assert!(vehicle.photo.is_none());
    }

    #[test]
    fn test_from_new_keeps_explicit_values() {
        let vehicle = Vehicle::from_new(NewVehicle {
            status: Some("loading".to_string()),
            transport_type: Some("oversize".to_string()),
            cargo_name: Some("transformer".to_string()),
            cargo_weight: Some(42.5),
            mintrans_permit: Some(true),
            ..minimal_input()
        });

        assert_eq!(vehicle.status.as_deref(), Some("loading"));
        assert_eq!(vehicle.transport_type, "oversize");
        assert_eq!(vehicle.cargo_name.as_deref(), Some("transformer"));
        assert_eq!(vehicle.cargo_weight, Some(42.5));
        assert!(vehicle.mintrans_permit);
        assert!(!vehicle.escort_received);
    }

    #[test]
    fn test_from_new_blank_transport_type_falls_back() {
        let vehicle = Vehicle::from_new(NewVehicle {
            transport_type: Some("  ".to_string()),
            ..minimal_input()
        });

        assert_eq!(vehicle.transport_type, "regular");
    }
}
