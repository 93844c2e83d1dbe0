use crate::job::JobId;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Outcome of a single firing. Unknown statuses are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    Success,
    Failed,
    Other(String),
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutionStatus::Success => "SUCCESS",
            ExecutionStatus::Failed => "FAILED",
            ExecutionStatus::Other(s) => s,
        }
    }
}

impl From<&str> for ExecutionStatus {
    fn from(s: &str) -> Self {
        match s {
            "SUCCESS" => ExecutionStatus::Success,
            "FAILED" => ExecutionStatus::Failed,
            other => ExecutionStatus::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ExecutionStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ExecutionStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(ExecutionStatus::from(raw.as_str()))
    }
}

/// One firing of a job, as recorded by the backend. Read-only here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub uuid: Uuid,
    pub job_id: JobId,
    #[serde(default)]
    pub trigger_name: Option<String>,
    #[serde(deserialize_with = "timestamp::required")]
    pub start_time: DateTime<Utc>,
    #[serde(default, deserialize_with = "timestamp::optional")]
    pub end_time: Option<DateTime<Utc>>,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub error_message: Option<String>,
}

impl ExecutionRecord {
    /// Derived from the timestamps; `None` while running or if the end precedes the start.
    pub fn duration(&self) -> Option<Duration> {
        let end = self.end_time?;
        let elapsed = end - self.start_time;
        if elapsed < Duration::zero() {
            None
        } else {
            Some(elapsed)
        }
    }

    pub fn display_duration(&self) -> String {
        match self.duration() {
            Some(d) => format!("{}s", format_duration(d)),
            None => "-".to_string(),
        }
    }
}

/// Seconds with two decimals, rounded half-up on whole milliseconds.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.num_milliseconds().max(0);
    let centis = (millis + 5) / 10;
    format!("{}.{:02}", centis / 100, centis % 100)
}

// The backend emits ISO-8601 strings; older builds emitted epoch milliseconds.
mod timestamp {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    fn convert<E: serde::de::Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
        match raw {
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| E::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| E::custom(format!("invalid timestamp {:?}: {}", s, e))),
        }
    }

    pub fn required<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        convert(Raw::deserialize(deserializer)?)
    }

    pub fn optional<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<Raw>::deserialize(deserializer)? {
            Some(raw) => convert(raw).map(Some),
            None => Ok(None),
        }
    }
}
