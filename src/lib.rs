//! Library root for `triage-actions`.
//!
//! Triage-actions provides the action handlers an automated bug-triage agent calls to:
//! - Look up the reporting user's support tier in a CRM
//! - Search the codebase for the report's keywords and map the hit to an owning team
//! - Create the final, triaged Jira issue
//!
//! Each handler is a stateless request/response function with a single outbound call
//! and a well-formed fallback on failure. The handlers depend on extensible traits
//! for HTTP and secrets, so either can be swapped or mocked.

pub mod base;
pub mod action;
pub mod runtime;
pub mod service;

use action::Action;
use base::{config::Config, types::Void};
use serde_json::Value;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::info;

/// Public async entry for the binary crate.
///
/// Builds the runtime, runs one action against the event read from `input`, and
/// writes the pretty-printed result to stdout.
pub async fn start(config: Config, action: Action, mut input: impl AsyncRead + Unpin) -> Void {
    info!("Running `{action}` ...");

    // Read the event.
    let mut raw = String::new();
    input.read_to_string(&mut raw).await?;
    let event: Value = serde_json::from_str(&raw)?;

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Run the action.
    let result = runtime.invoke(action, event).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
