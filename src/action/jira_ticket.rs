//! Create the triaged Jira issue from the agent's synthesized fields.
//!
//! There is no idempotency key: two identical calls create two issues. The orchestrator
//! owns deduplication per triage event.

use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use crate::{
    base::{
        config::Config,
        types::{Res, TicketCreationResult},
    },
    runtime::Runtime,
    service::{http::HttpRequest, secrets::JIRA_API_TOKEN},
};

use super::event::{Event, TriageContext};

/// Issue type of every triaged ticket.
pub const ISSUE_TYPE: &str = "Bug";

/// Assignee name used when the agent supplies no account id.
pub const UNASSIGNED: &str = "unassigned";

/// Header paragraph separating the report from the triage notes.
const TRIAGE_CONTEXT_HEADER: &str = "--- Triage Context ---";

// Issue creation payload (Jira REST v3).

#[derive(Debug, Serialize)]
pub struct CreateIssueRequest {
    pub fields: CreateIssueFields,
}

#[derive(Debug, Serialize)]
pub struct CreateIssueFields {
    pub project: ProjectRef,
    pub summary: String,
    pub description: AdfDocument,
    pub issuetype: NameRef,
    pub priority: NameRef,
    pub components: Vec<NameRef>,
    pub assignee: AssigneeRef,
}

#[derive(Debug, Serialize)]
pub struct ProjectRef {
    pub key: String,
}

#[derive(Debug, Serialize)]
pub struct NameRef {
    pub name: String,
}

impl NameRef {
    fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AssigneeRef {
    Id { id: String },
    Name { name: String },
}

/// An Atlassian Document Format document made of plain paragraphs.
#[derive(Debug, Serialize)]
pub struct AdfDocument {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub version: u32,
    pub content: Vec<AdfParagraph>,
}

#[derive(Debug, Serialize)]
pub struct AdfParagraph {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub content: Vec<AdfText>,
}

#[derive(Debug, Serialize)]
pub struct AdfText {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub text: String,
}

impl AdfDocument {
    fn from_paragraphs(paragraphs: impl IntoIterator<Item = String>) -> Self {
        Self {
            kind: "doc",
            version: 1,
            content: paragraphs
                .into_iter()
                .map(|text| AdfParagraph {
                    kind: "paragraph",
                    content: vec![AdfText { kind: "text", text }],
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    key: String,
}

/// Build the issue creation payload.
pub fn build_issue_request(context: &TriageContext, config: &Config) -> CreateIssueRequest {
    let assignee = match context.assignee_id.as_deref() {
        Some(id) if !id.is_empty() => AssigneeRef::Id { id: id.to_string() },
        _ => AssigneeRef::Name { name: UNASSIGNED.to_string() },
    };

    CreateIssueRequest {
        fields: CreateIssueFields {
            project: ProjectRef {
                key: config.jira_project_key.clone(),
            },
            summary: format!("{} {}", config.jira_summary_tag, context.summary),
            description: AdfDocument::from_paragraphs([
                context.description.clone(),
                TRIAGE_CONTEXT_HEADER.to_string(),
                format!("Component Determined: {}", context.component),
            ]),
            issuetype: NameRef::new(ISSUE_TYPE),
            priority: NameRef::new(context.priority.as_str()),
            components: vec![NameRef::new(context.component.as_str())],
            assignee,
        },
    }
}

/// Create the triaged issue.
///
/// Failures are reported as `success: false` with the cause in `message`, never as an error.
#[instrument(skip_all, fields(component = %event.payload.component, priority = %event.payload.priority))]
pub async fn create_jira_ticket(event: Event<TriageContext>, runtime: &Runtime) -> TicketCreationResult {
    let context = event.payload;

    match create_jira_ticket_internal(&context, runtime).await {
        Ok(key) => {
            info!("Successfully created triaged issue: {key}");

            let message = format!(
                "Jira ticket {key} successfully created and triaged to {} with priority {}.",
                context.component, context.priority
            );

            TicketCreationResult::created(key, message)
        }
        Err(err) => {
            error!("Jira ticket creation failed: {err:#}");
            TicketCreationResult::failed(format!("Failed to create Jira ticket: {err}"))
        }
    }
}

async fn create_jira_ticket_internal(context: &TriageContext, runtime: &Runtime) -> Res<String> {
    let config = &runtime.config;

    let mut url = url::Url::parse(&config.jira_base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Jira base URL cannot carry a path."))?
        .pop_if_empty()
        .extend(["rest", "api", "3", "issue"]);
    let payload = serde_json::to_value(build_issue_request(context, config))?;

    let token = runtime.secrets.get_secret(JIRA_API_TOKEN).await?;
    let request = HttpRequest::post_json(url.as_str(), payload).basic(config.jira_email.as_str(), token);
    let response = runtime.http.send(request).await?;

    if !response.is_success() {
        return Err(anyhow::anyhow!("Jira API failed to create issue: {} - {}", response.status, response.body));
    }

    let issue: CreatedIssue = response.json().map_err(|e| anyhow::anyhow!("Jira API returned an unreadable issue: {e}"))?;

    Ok(issue.key)
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering},
    };

    use serde_json::json;

    use super::*;
    use crate::{
        base::config::ConfigInner,
        service::{
            http::{HttpAuth, HttpClient, HttpMethod, HttpResponse},
            mocks::{MockHttp, get_failing_http, get_failing_secrets, get_mock_http, get_mock_secrets, get_unreachable_http},
        },
    };

    fn context(assignee_id: Option<&str>) -> TriageContext {
        TriageContext {
            summary: "Checkout double-charges cards".to_string(),
            description: "Two charges appear after a single click.".to_string(),
            priority: "Highest".to_string(),
            component: "Billing/Payments".to_string(),
            assignee_id: assignee_id.map(str::to_string),
        }
    }

    fn jira_config() -> Config {
        ConfigInner {
            jira_base_url: "https://acme.atlassian.net".to_string(),
            jira_email: "triage@acme.dev".to_string(),
            ..Default::default()
        }
        .into()
    }

    #[test]
    fn test_payload_shape() {
        let payload = serde_json::to_value(build_issue_request(&context(Some("5b10ac8d82e05b22cc7d4ef5")), &jira_config())).unwrap();

        assert_eq!(
            payload,
            json!({
                "fields": {
                    "project": { "key": "PROJ" },
                    "summary": "[SOBTA Triage] Checkout double-charges cards",
                    "description": {
                        "type": "doc",
                        "version": 1,
                        "content": [
                            { "type": "paragraph", "content": [{ "type": "text", "text": "Two charges appear after a single click." }] },
                            { "type": "paragraph", "content": [{ "type": "text", "text": "--- Triage Context ---" }] },
                            { "type": "paragraph", "content": [{ "type": "text", "text": "Component Determined: Billing/Payments" }] },
                        ],
                    },
                    "issuetype": { "name": "Bug" },
                    "priority": { "name": "Highest" },
                    "components": [{ "name": "Billing/Payments" }],
                    "assignee": { "id": "5b10ac8d82e05b22cc7d4ef5" },
                }
            })
        );
    }

    #[test]
    fn test_missing_assignee_is_unassigned() {
        for assignee_id in [None, Some("")] {
            let payload = serde_json::to_value(build_issue_request(&context(assignee_id), &jira_config())).unwrap();

            assert_eq!(payload["fields"]["assignee"], json!({ "name": "unassigned" }));
        }
    }

    #[tokio::test]
    async fn test_created() {
        let mut mock = MockHttp::new();
        mock.expect_send()
            .withf(|request| {
                request.method == HttpMethod::Post
                    && request.url == "https://acme.atlassian.net/rest/api/3/issue"
                    && request.auth
                        == Some(HttpAuth::Basic {
                            username: "triage@acme.dev".to_string(),
                            password: "JIRA_API_TOKEN-value".to_string(),
                        })
                    && request.body.as_ref().is_some_and(|b| b["fields"]["project"]["key"] == "PROJ")
            })
            .times(1)
            .returning(|_| Ok(HttpResponse::new(201, r#"{"id":"10042","key":"PROJ-42","self":"https://acme.atlassian.net/rest/api/3/issue/10042"}"#)));

        let runtime = Runtime::from_parts(jira_config(), HttpClient::new(Arc::new(mock)), get_mock_secrets());

        let result = create_jira_ticket(Event::new(context(None)), &runtime).await;

        assert!(result.success);
        assert_eq!(result.issue_key.as_deref(), Some("PROJ-42"));
        assert_eq!(result.message, "Jira ticket PROJ-42 successfully created and triaged to Billing/Payments with priority Highest.");
    }

    #[tokio::test]
    async fn test_base_url_path_is_kept() {
        for base in ["https://corp.example.com/jira", "https://corp.example.com/jira/"] {
            let mut mock = MockHttp::new();
            mock.expect_send()
                .withf(|request| request.url == "https://corp.example.com/jira/rest/api/3/issue")
                .times(1)
                .returning(|_| Ok(HttpResponse::new(201, r#"{"key":"PROJ-7"}"#)));

            let config: Config = ConfigInner {
                jira_base_url: base.to_string(),
                jira_email: "triage@acme.dev".to_string(),
                ..Default::default()
            }
            .into();
            let runtime = Runtime::from_parts(config, HttpClient::new(Arc::new(mock)), get_mock_secrets());

            let result = create_jira_ticket(Event::new(context(None)), &runtime).await;

            assert_eq!(result.issue_key.as_deref(), Some("PROJ-7"));
        }
    }

    #[tokio::test]
    async fn test_rejected_carries_status_and_body() {
        let runtime = Runtime::from_parts(jira_config(), get_mock_http(400, "bad request"), get_mock_secrets());

        let result = create_jira_ticket(Event::new(context(None)), &runtime).await;

        assert!(!result.success);
        assert_eq!(result.issue_key, None);
        assert_eq!(result.message, "Failed to create Jira ticket: Jira API failed to create issue: 400 - bad request");
    }

    #[tokio::test]
    async fn test_other_failures_are_reported() {
        for http in [get_failing_http(), get_mock_http(201, r#"{"id":"10042"}"#)] {
            let runtime = Runtime::from_parts(jira_config(), http, get_mock_secrets());

            let result = create_jira_ticket(Event::new(context(None)), &runtime).await;

            assert!(!result.success);
            assert!(result.message.starts_with("Failed to create Jira ticket: "));
        }

        let runtime = Runtime::from_parts(jira_config(), get_unreachable_http(), get_failing_secrets());
        let result = create_jira_ticket(Event::new(context(None)), &runtime).await;

        assert!(!result.success);
        assert!(result.message.contains("JIRA_API_TOKEN"));
    }

    #[tokio::test]
    async fn test_identical_calls_create_distinct_issues() {
        let counter = Arc::new(AtomicU32::new(41));
        let mut mock = MockHttp::new();
        mock.expect_send().times(2).returning(move |_| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(HttpResponse::new(201, format!(r#"{{"key":"PROJ-{n}"}}"#)))
        });

        let runtime = Runtime::from_parts(jira_config(), HttpClient::new(Arc::new(mock)), get_mock_secrets());

        let first = create_jira_ticket(Event::new(context(None)), &runtime).await;
        let second = create_jira_ticket(Event::new(context(None)), &runtime).await;

        assert_eq!(first.issue_key.as_deref(), Some("PROJ-42"));
        assert_eq!(second.issue_key.as_deref(), Some("PROJ-43"));
    }
}
