use chrono::Duration;
use std::fmt;
use std::str::FromStr;

/// Stored value that turns automatic refresh off.
pub const DISABLED_SENTINEL: i64 = -1;

/// How often cached vehicle data may age before it is refreshed on foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshInterval {
    Days(u32),
    Disabled,
}

impl Default for RefreshInterval {
    fn default() -> Self {
        RefreshInterval::Days(1)
    }
}

impl RefreshInterval {
    pub fn from_stored(value: i64) -> Result<Self, String> {
        match value {
            DISABLED_SENTINEL => Ok(RefreshInterval::Disabled),
            v if (0..=u32::MAX as i64).contains(&v) => Ok(RefreshInterval::Days(v as u32)),
            v => Err(format!("Invalid refresh interval: {}", v)),
        }
    }

    pub fn to_stored(self) -> i64 {
        match self {
            RefreshInterval::Days(days) => days as i64,
            RefreshInterval::Disabled => DISABLED_SENTINEL,
        }
    }

    /// `None` when auto-refresh is disabled.
    pub fn threshold(self) -> Option<Duration> {
        match self {
            RefreshInterval::Days(days) => Some(Duration::days(days as i64)),
            RefreshInterval::Disabled => None,
        }
    }
}

impl fmt::Display for RefreshInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefreshInterval::Days(1) => write!(f, "1 day"),
            RefreshInterval::Days(days) => write!(f, "{} days", days),
            RefreshInterval::Disabled => write!(f, "disabled"),
        }
    }
}

impl FromStr for RefreshInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "never" | "disabled" => Ok(RefreshInterval::Disabled),
            other => {
                let value: i64 = other.parse().map_err(|_| {
                    format!(
                        "Invalid refresh interval '{}'. Use a number of days or 'off'",
                        s
                    )
                })?;
                Self::from_stored(value)
            }
        }
    }
}
