//! In-memory vehicle list used for name lookups.

use crate::models::Vehicle;

/// The vehicle list last fetched from the server.
///
/// Owned by the [`Companion`](crate::Companion): populated on fetch (or from
/// the on-disk cache at start-up) and cleared on logout.
#[derive(Debug, Clone, Default)]
pub struct VehicleCache {
    vehicles: Vec<Vehicle>,
}

impl VehicleCache {
    pub fn new(vehicles: Vec<Vehicle>) -> Self {
        Self { vehicles }
    }

    pub fn replace(&mut self, vehicles: Vec<Vehicle>) {
        self.vehicles = vehicles;
    }

    pub fn clear(&mut self) {
        self.vehicles.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    pub fn all(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn find(&self, vehicle_id: i64) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.id() == vehicle_id)
    }

    /// Display name for a vehicle id, "Unknown Vehicle" when not cached.
    pub fn name_of(&self, vehicle_id: i64) -> String {
        self.find(vehicle_id)
            .map(|v| v.display_name())
            .unwrap_or_else(|| "Unknown Vehicle".to_string())
    }
}
