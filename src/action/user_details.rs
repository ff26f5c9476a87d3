//! Look up the reporting user's support tier in the CRM.

use serde::Deserialize;
use tracing::{info, instrument, warn};

use crate::{
    base::types::{DEFAULT_TIER, PriorityModifier, Res, UserTierResult},
    runtime::Runtime,
    service::{http::HttpRequest, secrets::CRM_API_KEY},
};

use super::event::{Event, UserDetailsPayload};

/// The slice of the CRM user record the lookup reads.
#[derive(Debug, Default, Deserialize)]
struct CrmUser {
    #[serde(default)]
    subscription_level: Option<String>,
}

/// Resolve the user's tier and priority hint.
///
/// Never fails: any error yields the `Standard` / `P3_Neutral` default.
#[instrument(skip_all, fields(user_id = %event.payload.user_id))]
pub async fn get_user_details(event: Event<UserDetailsPayload>, runtime: &Runtime) -> UserTierResult {
    let user_id = event.payload.user_id;

    if user_id.trim().is_empty() {
        warn!("Empty user id; assuming the standard tier.");
        return UserTierResult::default();
    }

    match get_user_details_internal(&user_id, runtime).await {
        Ok(Some(result)) => {
            info!("Resolved tier `{}` for user {user_id}.", result.tier);
            result
        }
        Ok(None) => UserTierResult::default(),
        Err(err) => {
            warn!("User details lookup for {user_id} failed: {err:#}");
            UserTierResult::default()
        }
    }
}

/// `Ok(None)` means the CRM answered with a non-success status.
async fn get_user_details_internal(user_id: &str, runtime: &Runtime) -> Res<Option<UserTierResult>> {
    let mut url = url::Url::parse(&runtime.config.crm_base_url)?;
    url.path_segments_mut()
        .map_err(|_| anyhow::anyhow!("CRM base URL cannot carry a path."))?
        .pop_if_empty()
        .extend(["users", user_id]);

    let token = runtime.secrets.get_secret(CRM_API_KEY).await?;
    let response = runtime.http.send(HttpRequest::get(url.as_str()).bearer(token)).await?;

    if !response.is_success() {
        warn!("Error fetching user details for {user_id}: {} {}", response.status, response.status_text);
        return Ok(None);
    }

    let user: CrmUser = response.json()?;

    Ok(Some(tier_from_user(user)))
}

fn tier_from_user(user: CrmUser) -> UserTierResult {
    let priority_modifier = PriorityModifier::from_subscription_level(user.subscription_level.as_deref());

    // An empty level counts as absent.
    let tier = user.subscription_level.filter(|level| !level.is_empty()).unwrap_or_else(|| DEFAULT_TIER.to_string());

    UserTierResult { tier, priority_modifier }
}
