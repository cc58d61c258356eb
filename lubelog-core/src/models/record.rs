use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::record_type::RecordType;

/// A fuel-up observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GasRecord {
    pub date: NaiveDate,
    /// Some vehicles do not track the odometer on fuel-ups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub odometer: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fuel_consumed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(default = "default_fill_to_full")]
    pub is_fill_to_full: bool,
    #[serde(default)]
    pub missed_fuel_up: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

fn default_fill_to_full() -> bool {
    true
}

impl GasRecord {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            odometer: None,
            fuel_consumed: None,
            cost: None,
            is_fill_to_full: true,
            missed_fuel_up: false,
            notes: None,
            tags: Vec::new(),
        }
    }

    pub fn with_odometer(mut self, odometer: u64) -> Self {
        self.odometer = Some(odometer);
        self
    }

    pub fn with_fuel_consumed(mut self, fuel_consumed: f64) -> Self {
        self.fuel_consumed = Some(fuel_consumed);
        self
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_fill_to_full(mut self, is_fill_to_full: bool) -> Self {
        self.is_fill_to_full = is_fill_to_full;
        self
    }

    pub fn with_missed_fuel_up(mut self, missed_fuel_up: bool) -> Self {
        self.missed_fuel_up = missed_fuel_up;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// An odometer (or engine hours) reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OdometerRecord {
    pub date: NaiveDate,
    pub odometer: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl OdometerRecord {
    pub fn new(date: NaiveDate, odometer: u64) -> Self {
        Self {
            date,
            odometer,
            notes: None,
            tags: Vec::new(),
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// A user-entered record, tagged with its type when persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Record {
    Gas(GasRecord),
    Odometer(OdometerRecord),
}

impl Record {
    pub fn record_type(&self) -> RecordType {
        match self {
            Record::Gas(_) => RecordType::Gas,
            Record::Odometer(_) => RecordType::Odometer,
        }
    }

    /// Form fields for submission. Empty values are left out entirely.
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        let mut fields = Vec::new();
        match self {
            Record::Gas(gas) => {
                fields.push(("date", gas.date.format("%Y-%m-%d").to_string()));
                push_opt(&mut fields, "odometer", gas.odometer.map(|o| o.to_string()));
                push_opt(
                    &mut fields,
                    "fuelConsumed",
                    gas.fuel_consumed.map(|f| f.to_string()),
                );
                push_opt(&mut fields, "cost", gas.cost.map(|c| c.to_string()));
                fields.push(("isFillToFull", gas.is_fill_to_full.to_string()));
                fields.push(("missedFuelUp", gas.missed_fuel_up.to_string()));
                push_opt(&mut fields, "notes", gas.notes.clone());
                push_opt(&mut fields, "tags", join_tags(&gas.tags));
            }
            Record::Odometer(odo) => {
                fields.push(("date", odo.date.format("%Y-%m-%d").to_string()));
                fields.push(("odometer", odo.odometer.to_string()));
                push_opt(&mut fields, "notes", odo.notes.clone());
                push_opt(&mut fields, "tags", join_tags(&odo.tags));
            }
        }
        fields
    }
}

fn push_opt(fields: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<String>) {
    if let Some(value) = value {
        if !value.is_empty() {
            fields.push((key, value));
        }
    }
}

fn join_tags(tags: &[String]) -> Option<String> {
    let tags: Vec<&str> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        None
    } else {
        Some(tags.join(" "))
    }
}
