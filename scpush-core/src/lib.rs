//! scpush Core
//!
//! Core types and abstractions for importing Server Configuration Profiles
//! into a Redfish management controller.
//!
//! This crate contains:
//! - Domain types: Core entities (JobSubmission, Job, status classification)
//! - DTOs: Wire shapes of the Redfish import action and task resources

pub mod domain;
pub mod dto;
