use serde::{Deserialize, Serialize};

const DEFAULT_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";

/// Display preferences carried inside claims for convenience. Not
/// security-relevant; never inspected by any authorization decision.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClaimPreferences {
    pub timezone: String,
    #[serde(rename = "pref_datetime_format")]
    pub datetime_format: String,
    #[serde(rename = "pref_date_format")]
    pub date_format: String,
    #[serde(rename = "pref_time_format")]
    pub time_format: String,
}

impl ClaimPreferences {
    pub fn new(
        timezone: Option<&str>,
        datetime_format: &str,
        date_format: &str,
        time_format: &str,
    ) -> Self {
        Self {
            timezone: timezone.unwrap_or_default().to_string(),
            datetime_format: datetime_format.to_string(),
            date_format: date_format.to_string(),
            time_format: time_format.to_string(),
        }
    }
}

impl Default for ClaimPreferences {
    fn default() -> Self {
        Self {
            timezone: String::new(),
            datetime_format: DEFAULT_DATETIME_FORMAT.to_string(),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            time_format: DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}
