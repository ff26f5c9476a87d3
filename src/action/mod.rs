//! The action handlers invoked by the triage agent.
//!
//! Each handler is a leaf: it takes one event, makes one outbound call, and always
//! returns a well-formed result.

pub mod code_search;
pub mod event;
pub mod jira_ticket;
pub mod user_details;

use std::{fmt, str::FromStr};

use crate::base::types::Err;

pub use code_search::search_codebase;
pub use jira_ticket::create_jira_ticket;
pub use user_details::get_user_details;

/// The named actions exposed to the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    GetUserDetails,
    SearchCodebase,
    CreateJiraTicket,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::GetUserDetails, Action::SearchCodebase, Action::CreateJiraTicket];

    pub fn name(&self) -> &'static str {
        match self {
            Action::GetUserDetails => "get-user-details",
            Action::SearchCodebase => "search-codebase",
            Action::CreateJiraTicket => "create-jira-ticket",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept the manifest-style `-action` suffix as well.
        let name = s.trim().strip_suffix("-action").unwrap_or(s.trim());

        Action::ALL.into_iter().find(|a| a.name() == name).ok_or_else(|| {
            let known = Action::ALL.map(|a| a.name()).join(", ");
            anyhow::anyhow!("Unknown action `{s}`; expected one of: {known}.")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_names_round_trip() {
        for action in Action::ALL {
            assert_eq!(action.to_string().parse::<Action>().unwrap(), action);
        }

        assert_eq!("search-codebase-action".parse::<Action>().unwrap(), Action::SearchCodebase);
        assert!("delete-everything".parse::<Action>().unwrap_err().to_string().contains("create-jira-ticket"));
    }
}
