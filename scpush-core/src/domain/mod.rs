//! Core domain types
//!
//! This module contains the core domain structures shared by the HTTP client
//! and the command-line tool. They describe what is being submitted to the
//! controller and the lifecycle of the job it creates.

pub mod job;
pub mod status;
pub mod submission;
