//! Ordered rules that map a matched source path to an owning component and team.

use serde::{Deserialize, Serialize};

/// Component reported when no rule matches.
pub const DEFAULT_COMPONENT: &str = "Unassigned";

/// Team reported when no rule matches.
pub const DEFAULT_TEAM: &str = "Triage_Team";

/// A single `(substring, component, team)` mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRule {
    pub substring: String,
    pub component: String,
    pub team: String,
}

impl ComponentRule {
    pub fn new(substring: &str, component: &str, team: &str) -> Self {
        Self {
            substring: substring.to_string(),
            component: component.to_string(),
            team: team.to_string(),
        }
    }
}

/// The built-in rule table, in priority order.
pub fn default_component_rules() -> Vec<ComponentRule> {
    vec![
        ComponentRule::new("auth", "Authentication", "Team-Ares"),
        ComponentRule::new("billing", "Billing/Payments", "Team-Zeus"),
    ]
}

/// Find the first rule whose substring occurs in `path`.
///
/// Matching is case-sensitive and the first match wins; rules never combine.
pub fn resolve_component<'a>(rules: &'a [ComponentRule], path: &str) -> Option<&'a ComponentRule> {
    rules.iter().find(|rule| path.contains(rule.substring.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_match_wins() {
        let rules = default_component_rules();

        let rule = resolve_component(&rules, "src/billing/auth_gate.rs").unwrap();
        assert_eq!(rule.component, "Authentication");
        assert_eq!(rule.team, "Team-Ares");

        let rule = resolve_component(&rules, "src/billing/invoice.rs").unwrap();
        assert_eq!(rule.component, "Billing/Payments");
        assert_eq!(rule.team, "Team-Zeus");
    }

    #[test]
    fn test_no_match() {
        let rules = default_component_rules();

        assert!(resolve_component(&rules, "src/ui/button.tsx").is_none());
        assert!(resolve_component(&rules, "src/AUTH/login.rs").is_none());
        assert!(resolve_component(&[], "src/auth/login.rs").is_none());
    }

    #[test]
    fn test_custom_table_order() {
        let rules = vec![
            ComponentRule::new("login", "Sessions", "Team-Hermes"),
            ComponentRule::new("auth", "Authentication", "Team-Ares"),
        ];

        let rule = resolve_component(&rules, "src/auth/login.rs").unwrap();
        assert_eq!(rule.team, "Team-Hermes");
    }
}
