//! Search the repository for bug keywords and map the top hit to an owning team.

use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    base::{
        rules::resolve_component,
        types::{CodeSearchResult, NO_PATH_FOUND, Res},
    },
    runtime::Runtime,
    service::{http::HttpRequest, secrets::BITBUCKET_API_TOKEN},
};

use super::event::{CodeSearchPayload, Event};

/// Path of the first hit, if there is one.
///
/// Only `values[0].file.path` is inspected; later hits may have any shape.
fn first_path(body: &Value) -> Option<String> {
    body.pointer("/values/0/file/path")
        .and_then(Value::as_str)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

/// Percent-encode a query value, spaces included, the way `encodeURIComponent` does.
fn encode_query_value(value: &str) -> String {
    // `byte_serialize` escapes a literal `+` as `%2B`, so every remaining `+` is a space.
    url::form_urlencoded::byte_serialize(value.as_bytes()).collect::<String>().replace('+', "%20")
}

/// Search the configured repository and resolve the component and team.
///
/// Never fails: a failed search yields the unassigned result with a `null` path, and a
/// search without hits yields the unassigned result with `"No path found"`.
#[instrument(skip_all, fields(keywords = %event.payload.keywords))]
pub async fn search_codebase(event: Event<CodeSearchPayload>, runtime: &Runtime) -> CodeSearchResult {
    match search_codebase_internal(&event.payload.keywords, runtime).await {
        Ok(Some(result)) => {
            info!("Mapped search hit to component `{}` ({}).", result.component, result.team);
            result
        }
        Ok(None) => CodeSearchResult::default(),
        Err(err) => {
            warn!("Codebase search failed: {err:#}");
            CodeSearchResult::default()
        }
    }
}

/// `Ok(None)` means the search API answered with a non-success status.
async fn search_codebase_internal(keywords: &str, runtime: &Runtime) -> Res<Option<CodeSearchResult>> {
    let config = &runtime.config;

    let mut url = url::Url::parse(&config.code_search_base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("Code search base URL cannot carry a path."))?
        .pop_if_empty()
        .extend(["repositories", config.code_search_workspace.as_str(), config.code_search_repo_slug.as_str(), "search", "code"]);
    url.set_query(Some(&format!("q={}", encode_query_value(keywords))));

    let token = runtime.secrets.get_secret(BITBUCKET_API_TOKEN).await?;
    let response = runtime.http.send(HttpRequest::get(url.as_str()).bearer(token)).await?;

    if !response.is_success() {
        warn!("Codebase search failed: {} {}", response.status, response.status_text);
        return Ok(None);
    }

    let body: Value = response.json()?;

    Ok(Some(map_path(first_path(&body), runtime)))
}

fn map_path(path: Option<String>, runtime: &Runtime) -> CodeSearchResult {
    let Some(path) = path else {
        return CodeSearchResult::unassigned(Some(NO_PATH_FOUND.to_string()));
    };

    let rules = runtime.config.component_rules();

    match resolve_component(&rules, &path) {
        Some(rule) => CodeSearchResult {
            component: rule.component.clone(),
            team: rule.team.clone(),
            path: Some(path),
        },
        None => CodeSearchResult::unassigned(Some(path)),
    }
}
