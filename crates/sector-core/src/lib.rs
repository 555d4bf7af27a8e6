//! Site sessions and status change polling for Sector Alarm.
//!
//! [`Site`] composes the raw `sector-api` client into authenticated
//! business operations (status, history, arm/disarm, lock control), and
//! [`Site::watch`] runs a timed poll loop that fires edge-triggered
//! callbacks when the main or annex arming status changes.

pub mod config;
pub mod output;
pub mod site;
pub mod transform;
pub mod watch;

pub use config::Settings;
pub use site::Site;
pub use transform::{
    ActionOutcome, HistoryEntry, InfoOutput, LockStatus, StatusOutput, TemperatureReading,
};
pub use watch::{StatusWatch, WatchHandle};

// Errors from the api crate reach callers unmodified; re-export so
// consumers depend on one crate.
pub use sector_api::{ArmingAction, Error, LockAction};
