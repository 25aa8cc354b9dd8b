//! Redfish resource paths used by the import workflow

use scpush_core::domain::job::JobId;

/// Import action on the embedded controller
pub const IMPORT_SYSTEM_CONFIGURATION: &str =
    "/redfish/v1/Managers/iDRAC.Embedded.1/Actions/Oem/EID_674_Manager.ImportSystemConfiguration";

/// Task resource for a submitted job
pub fn task(job_id: &JobId) -> String {
    format!("/redfish/v1/TaskService/Tasks/{}", job_id)
}

/// Base URL for a controller given as a bare host or a full URL
///
/// Bare hosts are reached over HTTPS.
pub fn controller_url(host: &str) -> String {
    let host = host.trim().trim_end_matches('/');
    if host.starts_with("https://") || host.starts_with("http://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
