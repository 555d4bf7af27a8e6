// sector-api: Async Rust client for the Sector Alarm MyPages API

pub mod action;
pub mod client;
pub mod error;
pub mod transport;

mod locks;
mod panel;

pub use action::{ArmingAction, LockAction};
pub use client::{RequestToken, ServiceMetadata, SessionClient, SessionCookie};
pub use error::Error;
pub use transport::TransportConfig;
