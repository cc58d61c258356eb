use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of maintenance record, which also selects the submission endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordType {
    Gas,
    Odometer,
}

impl RecordType {
    /// Human label used in notifications ("Gas record saved successfully!").
    pub fn label(&self) -> &'static str {
        match self {
            RecordType::Gas => "Gas",
            RecordType::Odometer => "Odometer",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::Gas => write!(f, "gas"),
            RecordType::Odometer => write!(f, "odometer"),
        }
    }
}

impl FromStr for RecordType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gas" | "fuel" => Ok(RecordType::Gas),
            "odometer" => Ok(RecordType::Odometer),
            _ => Err(format!(
                "Invalid record type '{}'. Valid options: gas, odometer",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_display() {
        assert_eq!(format!("{}", RecordType::Gas), "gas");
        assert_eq!(format!("{}", RecordType::Odometer), "odometer");
    }

    #[test]
    fn test_record_type_from_str() {
        assert_eq!(RecordType::from_str("gas").unwrap(), RecordType::Gas);
        assert_eq!(RecordType::from_str("FUEL").unwrap(), RecordType::Gas);
        assert_eq!(
            RecordType::from_str("Odometer").unwrap(),
            RecordType::Odometer
        );
    }

    #[test]
    fn test_record_type_from_str_invalid() {
        assert!(RecordType::from_str("service").is_err());
        assert!(RecordType::from_str("").is_err());
    }

    #[test]
    fn test_record_type_serializes_lowercase() {
        let json = serde_json::to_string(&RecordType::Odometer).unwrap();
        assert_eq!(json, "\"odometer\"");
    }
}
