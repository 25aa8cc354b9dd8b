//! Import action DTOs
//!
//! Body of the `EID_674_Manager.ImportSystemConfiguration` action.

use serde::{Deserialize, Serialize};

use crate::domain::submission::{HostPowerState, JobSubmission, ShutdownType, Target};

/// Request body for the import action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImportSystemConfiguration {
    /// The whole profile, inlined
    pub import_buffer: String,
    pub share_parameters: ShareParameters,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_type: Option<ShutdownType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_power_state: Option<HostPowerState>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ShareParameters {
    pub target: Target,
}

impl From<&JobSubmission> for ImportSystemConfiguration {
    fn from(submission: &JobSubmission) -> Self {
        Self {
            import_buffer: submission.payload().to_string(),
            share_parameters: ShareParameters {
                target: submission.target(),
            },
            shutdown_type: submission.shutdown_type(),
            host_power_state: submission.end_power_state(),
        }
    }
}
