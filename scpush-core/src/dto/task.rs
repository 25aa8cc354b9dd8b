//! Task resource DTOs
//!
//! Subset of `/redfish/v1/TaskService/Tasks/{id}` the poller reads. The
//! vendor block carries the human-readable status message; everything else
//! is kept as raw JSON for diagnostics.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Task resource returned by the status endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskResource {
    #[serde(rename = "Oem")]
    pub oem: TaskOem,

    /// Per-attribute results reported once the job finishes
    #[serde(rename = "Messages", default)]
    pub messages: Vec<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskOem {
    #[serde(rename = "Dell")]
    pub dell: DellJob,
}

/// Vendor job details
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DellJob {
    #[serde(rename = "Message")]
    pub message: String,

    #[serde(rename = "PercentComplete", default)]
    pub percent_complete: Option<Value>,

    #[serde(rename = "JobState", default)]
    pub job_state: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DellJob {
    /// Percent complete, accepting both numeric and string encodings
    pub fn percent(&self) -> Option<u32> {
        match self.percent_complete.as_ref()? {
            Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl TaskResource {
    /// Vendor detail blocks of each entry in `Messages`
    pub fn attribute_results(&self) -> impl Iterator<Item = &Map<String, Value>> {
        self.messages.iter().filter_map(|message| {
            message
                .get("Oem")
                .and_then(|oem| oem.get("Dell"))
                .and_then(Value::as_object)
        })
    }
}
