//! Data Transfer Objects for the Redfish wire protocol
//!
//! DTOs mirror the JSON bodies exchanged with the management controller.
//! Field names follow the controller's PascalCase schema.

pub mod import;
pub mod task;
