// Response shaping
//
// Pure functions from the raw MyPages payloads to the output types
// consumers see. Tolerant by design: absent string fields become
// "unknown", absent collections become empty -- a half-filled payload
// never fails an operation that the service itself accepted.

use chrono::{DateTime, TimeZone, Utc};
use serde::Serialize;
use serde_json::Value;

/// Placeholder for a string field the payload did not carry.
pub const UNKNOWN: &str = "unknown";

/// Current arming state of a site, reduced from the panel overview.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusOutput {
    pub site_id: String,
    pub name: String,
    pub armed_status: String,
    pub annex_armed_status: String,
    pub partial_arm_available: bool,
    pub annex_available: bool,
    pub changed: Option<DateTime<Utc>>,
}

/// Static site information, reduced from the same overview payload.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InfoOutput {
    pub site_id: String,
    pub name: String,
    pub armed_status: String,
    pub partial_arm_available: bool,
    pub annex_available: bool,
    pub locks: usize,
    pub temperature_sensors: usize,
}

/// One panel log entry.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub time: Option<DateTime<Utc>>,
    pub action: String,
    pub user: String,
}

/// One temperature sensor reading.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureReading {
    pub sensor_id: String,
    pub name: String,
    pub temperature: String,
}

/// Current state of one connected lock.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LockStatus {
    pub lock_id: String,
    pub name: String,
    pub status: String,
    pub auto_lock_enabled: bool,
}

/// Outcome of a panel or lock command.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionOutcome {
    pub status: String,
    pub armed_status: Option<String>,
}

fn str_or_unknown(value: &Value) -> String {
    value.as_str().unwrap_or(UNKNOWN).to_owned()
}

/// Parse the service's `/Date(1536156984000)/` timestamp format,
/// ignoring any trailing offset suffix.
fn parse_dotnet_date(raw: &str) -> Option<DateTime<Utc>> {
    let inner = raw.strip_prefix("/Date(")?.strip_suffix(")/")?;
    let end = inner
        .char_indices()
        .position(|(i, c)| i > 0 && !c.is_ascii_digit())
        .unwrap_or(inner.len());
    let millis: i64 = inner[..end].parse().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}

/// Reduce the panel overview to the two arming statuses and display fields.
pub fn status_output(site_id: &str, raw: &Value) -> StatusOutput {
    let panel = &raw["Panel"];
    StatusOutput {
        site_id: site_id.to_owned(),
        name: str_or_unknown(&panel["PanelDisplayName"]),
        armed_status: str_or_unknown(&panel["ArmedStatus"]),
        annex_armed_status: str_or_unknown(&panel["StatusAnnex"]),
        // The service misspells these keys.
        partial_arm_available: panel["PartialAvalible"].as_bool().unwrap_or(false),
        annex_available: panel["AnnexAvalible"].as_bool().unwrap_or(false),
        changed: panel["PanelTime"].as_str().and_then(parse_dotnet_date),
    }
}

/// Reduce the panel overview to static site information.
pub fn info_output(site_id: &str, raw: &Value) -> InfoOutput {
    let panel = &raw["Panel"];
    InfoOutput {
        site_id: site_id.to_owned(),
        name: str_or_unknown(&panel["PanelDisplayName"]),
        armed_status: str_or_unknown(&panel["ArmedStatus"]),
        partial_arm_available: panel["PartialAvalible"].as_bool().unwrap_or(false),
        annex_available: panel["AnnexAvalible"].as_bool().unwrap_or(false),
        locks: raw["Locks"].as_array().map_or(0, Vec::len),
        temperature_sensors: raw["Temperatures"].as_array().map_or(0, Vec::len),
    }
}

/// Shape the panel log, newest first, truncated to `top` entries.
pub fn history_output(raw: &Value, top: usize) -> Vec<HistoryEntry> {
    raw["LogDetails"]
        .as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .take(top)
        .map(|entry| HistoryEntry {
            time: entry["Time"].as_str().and_then(parse_dotnet_date),
            action: str_or_unknown(&entry["EventType"]),
            user: str_or_unknown(&entry["User"]),
        })
        .collect()
}

/// Shape the temperature list, optionally filtered to one sensor.
pub fn temperatures_output(raw: &Value, sensor_id: Option<&str>) -> Vec<TemperatureReading> {
    raw.as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .map(|sensor| TemperatureReading {
            sensor_id: str_or_unknown(&sensor["Id"]),
            name: str_or_unknown(&sensor["Label"]),
            // Another service misspelling.
            temperature: str_or_unknown(&sensor["Temprature"]),
        })
        .filter(|reading| sensor_id.is_none_or(|id| reading.sensor_id == id))
        .collect()
}

/// Shape the lock list, optionally filtered to one lock.
pub fn locks_output(raw: &Value, lock_id: Option<&str>) -> Vec<LockStatus> {
    raw.as_array()
        .map(Vec::as_slice)
        .unwrap_or_default()
        .iter()
        .map(|lock| LockStatus {
            lock_id: str_or_unknown(&lock["Serial"]),
            name: str_or_unknown(&lock["Label"]),
            status: str_or_unknown(&lock["Status"]),
            auto_lock_enabled: lock["AutoLockEnabled"].as_bool().unwrap_or(false),
        })
        .filter(|lock| lock_id.is_none_or(|id| lock.lock_id == id))
        .collect()
}

/// Shape a panel command response.
pub fn action_output(raw: &Value) -> ActionOutcome {
    ActionOutcome {
        status: str_or_unknown(&raw["status"]),
        armed_status: raw["panelData"]["ArmedStatus"].as_str().map(str::to_owned),
    }
}

/// Shape a lock command response.
pub fn lock_action_output(raw: &Value) -> ActionOutcome {
    ActionOutcome {
        status: str_or_unknown(&raw["Status"]),
        armed_status: None,
    }
}
