use serde::{Deserialize, Serialize};

use super::rules::{DEFAULT_COMPONENT, DEFAULT_TEAM};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Tiers.

/// Tier reported when the CRM is silent or unreachable.
pub const DEFAULT_TIER: &str = "Standard";

/// The only tier that escalates priority.
pub const ENTERPRISE_TIER: &str = "Enterprise";

/// Path reported when a search succeeds but returns nothing.
pub const NO_PATH_FOUND: &str = "No path found";

/// Priority hint handed back to the agent alongside the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriorityModifier {
    #[serde(rename = "P1_Critical")]
    P1Critical,
    #[serde(rename = "P3_Neutral")]
    P3Neutral,
}

impl PriorityModifier {
    /// Derive the priority hint from a subscription level.
    pub fn from_subscription_level(level: Option<&str>) -> Self {
        match level {
            Some(ENTERPRISE_TIER) => Self::P1Critical,
            _ => Self::P3Neutral,
        }
    }
}

// Results.

/// Output of the user tier lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTierResult {
    pub tier: String,
    pub priority_modifier: PriorityModifier,
}

impl Default for UserTierResult {
    fn default() -> Self {
        Self {
            tier: DEFAULT_TIER.to_string(),
            priority_modifier: PriorityModifier::P3Neutral,
        }
    }
}

/// Output of the codebase search.
///
/// `path` is always serialized; it is `null` when the search itself failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeSearchResult {
    pub component: String,
    pub team: String,
    pub path: Option<String>,
}

impl CodeSearchResult {
    /// The unassigned result, carrying whatever path (if any) was observed.
    pub fn unassigned(path: Option<String>) -> Self {
        Self {
            component: DEFAULT_COMPONENT.to_string(),
            team: DEFAULT_TEAM.to_string(),
            path,
        }
    }
}

impl Default for CodeSearchResult {
    fn default() -> Self {
        Self::unassigned(None)
    }
}

/// Output of the Jira ticket creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketCreationResult {
    pub success: bool,
    pub issue_key: Option<String>,
    pub message: String,
}

impl TicketCreationResult {
    pub fn created(issue_key: String, message: String) -> Self {
        Self {
            success: true,
            issue_key: Some(issue_key),
            message,
        }
    }

    pub fn failed(message: String) -> Self {
        Self {
            success: false,
            issue_key: None,
            message,
        }
    }
}
