//! Core components, types, and utilities for the triage actions.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The ordered path-to-team rule table.
//! - Common types, named fallbacks, and result handling.

pub mod config;
pub mod rules;
pub mod types;
