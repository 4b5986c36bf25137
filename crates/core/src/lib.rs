//! Core functionality for the LaunchCore launch-records service.
//!
//! This crate provides the domain types, configuration, and logging
//! utilities shared by the query layer and the HTTP service.

pub mod config;
pub mod error;
pub mod logging;
pub mod timestamp;
pub mod types;

pub use config::{AppConfig, CredentialSource, LogFormat, ServerConfig, StoreConfig};
pub use error::{CoreError, Result};
pub use types::{
    FilterRequest, Launch, LaunchPage, LaunchStatus, LaunchSummary, RocketUsage, DEFAULT_LIMIT,
    MAX_LIMIT,
};
