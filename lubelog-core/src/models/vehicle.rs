use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the `/api/vehicle/info` response.
///
/// Only the fields the client reads are typed; everything else is kept in
/// `extra` so the cached copy round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_data: VehicleData,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reported_odometer: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleData {
    pub id: i64,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub make: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub license_plate: String,
    /// Which field identifies the vehicle: "LicensePlate" or the name of an extra field.
    #[serde(default)]
    pub vehicle_identifier: String,
    #[serde(default)]
    pub extra_fields: Vec<ExtraField>,
    #[serde(default)]
    pub odometer_optional: bool,
    #[serde(default)]
    pub use_hours: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraField {
    pub name: String,
    #[serde(default)]
    pub value: String,
}

impl Vehicle {
    pub fn id(&self) -> i64 {
        self.vehicle_data.id
    }

    /// "2019 Honda Civic"
    pub fn display_name(&self) -> String {
        let data = &self.vehicle_data;
        let mut parts = Vec::new();
        if let Some(year) = data.year {
            parts.push(year.to_string());
        }
        for part in [&data.make, &data.model] {
            if !part.is_empty() {
                parts.push(part.clone());
            }
        }
        if parts.is_empty() {
            format!("Vehicle {}", data.id)
        } else {
            parts.join(" ")
        }
    }

    /// License plate, or the value of the extra field chosen as identifier.
    pub fn identifier(&self) -> String {
        let data = &self.vehicle_data;
        if data.vehicle_identifier.is_empty() || data.vehicle_identifier == "LicensePlate" {
            if data.license_plate.is_empty() {
                return "No Plate".to_string();
            }
            return data.license_plate.clone();
        }
        data.extra_fields
            .iter()
            .find(|f| f.name == data.vehicle_identifier)
            .map(|f| f.value.clone())
            .unwrap_or_default()
    }

    /// "Engine Hours" for hour-metered vehicles, "Odometer" otherwise.
    pub fn odometer_label(&self) -> &'static str {
        if self.vehicle_data.use_hours {
            "Engine Hours"
        } else {
            "Odometer"
        }
    }

    pub fn requires_odometer(&self) -> bool {
        !self.vehicle_data.odometer_optional
    }
}
