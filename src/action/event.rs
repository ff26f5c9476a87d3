//! Event envelopes delivered by the agent orchestrator.

use serde::{Deserialize, Serialize};

/// An invocation event; the handler inputs live under `payload`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event<P> {
    pub payload: P,
}

impl<P> Event<P> {
    pub fn new(payload: P) -> Self {
        Self { payload }
    }
}

/// Inputs to the user tier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserDetailsPayload {
    pub user_id: String,
}

/// Inputs to the codebase search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSearchPayload {
    pub keywords: String,
}

/// Triage fields synthesized by the agent for ticket creation.
///
/// Only presence is checked; `priority` and `component` go to Jira verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriageContext {
    pub summary: String,
    pub description: String,
    pub priority: String,
    pub component: String,
    #[serde(default)]
    pub assignee_id: Option<String>,
}
