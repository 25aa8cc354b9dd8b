//! Scheduler layer
//!
//! Drives a submitted job through its lifecycle by polling the controller
//! until it reports a terminal status.

pub mod poller;

pub use poller::StatusPoller;
