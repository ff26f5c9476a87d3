//! Service integrations for external collaborators.
//!
//! This module contains the narrow interfaces the action handlers depend on:
//! - HTTP services (e.g., reqwest)
//! - Secret services (e.g., config and environment)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod http;
pub mod secrets;
