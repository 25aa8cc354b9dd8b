//! Submission domain types
//!
//! What gets sent to the controller: the component scope, the optional
//! reboot behaviour and final power state, and the normalized profile.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised while building a submission from user input
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error(
        "Unsupported target '{0}' (expected one of: ALL, System, BIOS, IDRAC, NIC, FC, LifecycleController, RAID)"
    )]
    UnknownTarget(String),

    #[error("Unsupported shutdown type '{0}' (expected Graceful, Forced or NoReboot)")]
    UnknownShutdownType(String),

    #[error("Unsupported host power state '{0}' (expected On or Off)")]
    UnknownPowerState(String),

    #[error("Configuration payload is empty")]
    EmptyPayload,
}

/// Components the imported attributes are applied to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    #[serde(rename = "ALL")]
    All,
    System,
    #[serde(rename = "BIOS")]
    Bios,
    #[serde(rename = "IDRAC")]
    Idrac,
    #[serde(rename = "NIC")]
    Nic,
    #[serde(rename = "FC")]
    Fc,
    LifecycleController,
    #[serde(rename = "RAID")]
    Raid,
}

impl Target {
    pub const ALL: [Target; 8] = [
        Target::All,
        Target::System,
        Target::Bios,
        Target::Idrac,
        Target::Nic,
        Target::Fc,
        Target::LifecycleController,
        Target::Raid,
    ];

    /// Wire spelling expected by the controller
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::All => "ALL",
            Target::System => "System",
            Target::Bios => "BIOS",
            Target::Idrac => "IDRAC",
            Target::Nic => "NIC",
            Target::Fc => "FC",
            Target::LifecycleController => "LifecycleController",
            Target::Raid => "RAID",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownTarget(s.to_string()))
    }
}

/// How the host is brought down to apply the configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShutdownType {
    Graceful,
    Forced,
    /// Changes are staged and only applied on the next manual reboot
    NoReboot,
}

impl ShutdownType {
    pub const ALL: [ShutdownType; 3] = [
        ShutdownType::Graceful,
        ShutdownType::Forced,
        ShutdownType::NoReboot,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ShutdownType::Graceful => "Graceful",
            ShutdownType::Forced => "Forced",
            ShutdownType::NoReboot => "NoReboot",
        }
    }
}

impl fmt::Display for ShutdownType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShutdownType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ShutdownType::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownShutdownType(s.to_string()))
    }
}

/// Power state the host is left in once the import finishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HostPowerState {
    On,
    Off,
}

impl HostPowerState {
    pub const ALL: [HostPowerState; 2] = [HostPowerState::On, HostPowerState::Off];

    pub fn as_str(&self) -> &'static str {
        match self {
            HostPowerState::On => "On",
            HostPowerState::Off => "Off",
        }
    }
}

impl fmt::Display for HostPowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HostPowerState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HostPowerState::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownPowerState(s.to_string()))
    }
}

/// A configuration import request for one controller
///
/// The payload is guaranteed non-empty; use [`JobSubmission::new`] to build one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSubmission {
    target: Target,
    shutdown_type: Option<ShutdownType>,
    end_power_state: Option<HostPowerState>,
    payload: String,
}

impl JobSubmission {
    pub fn new(
        target: Target,
        shutdown_type: Option<ShutdownType>,
        end_power_state: Option<HostPowerState>,
        payload: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let payload = payload.into();
        if payload.is_empty() {
            return Err(ValidationError::EmptyPayload);
        }

        Ok(Self {
            target,
            shutdown_type,
            end_power_state,
            payload,
        })
    }

    pub fn target(&self) -> Target {
        self.target
    }

    pub fn shutdown_type(&self) -> Option<ShutdownType> {
        self.shutdown_type
    }

    pub fn end_power_state(&self) -> Option<HostPowerState> {
        self.end_power_state
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }
}
