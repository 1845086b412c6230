//! Identity reconciliation: maps an identity-provider principal to a user
//! record in the content store and keeps the subscription tier in sync.
//!
//! Runs on every authenticated request and is idempotent: repeated calls
//! for the same principal converge to the same record and never create
//! duplicates. Races between concurrent first-sight requests are resolved
//! optimistically with a single conflict-retry; strict exclusion would
//! need a uniqueness constraint in the store itself.

use rand::{distributions::Alphanumeric, Rng};
use std::sync::Arc;

use pantry_chef_common::{Tier, UserRecord};

use crate::auth::Principal;
use crate::content::{ContentClient, ContentError, NewUser, UserPatch};

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("no principal available")]
    NotAuthenticated,
    #[error("user store unavailable: {0}")]
    BackendUnavailable(String),
    #[error("user record conflict: {0}")]
    Conflict(String),
}

pub struct UserReconciler {
    content: Arc<ContentClient>,
    default_role_id: i64,
}

impl UserReconciler {
    pub fn new(content: Arc<ContentClient>, default_role_id: i64) -> Self {
        Self {
            content,
            default_role_id,
        }
    }

    /// Find or create the user record for `principal` and sync its tier.
    ///
    /// `None` short-circuits to [`ReconcileError::NotAuthenticated`].
    /// Store outages surface as [`ReconcileError::BackendUnavailable`];
    /// callers treat any failure as "no user for this request", never as a
    /// crash.
    pub async fn reconcile(
        &self,
        principal: Option<&Principal>,
    ) -> Result<UserRecord, ReconcileError> {
        let principal = principal.ok_or(ReconcileError::NotAuthenticated)?;
        let tier = derive_tier(principal);

        // Primary lookup by the provider identifier. A store hiccup here
        // degrades to "not found" so the email fallback still runs.
        let existing = match self
            .content
            .find_user_by_external_id(&principal.id)
            .await
        {
            Ok(found) => found,
            Err(err) => {
                tracing::warn!(
                    external_id = %principal.id,
                    error = %err,
                    "user lookup by external id failed, treating as not found"
                );
                None
            }
        };

        if let Some(user) = existing {
            return Ok(self.sync_tier(user, tier).await);
        }

        // Records created before the provider migration have no externalId
        // yet; match them by email and link them.
        let by_email = self
            .content
            .find_user_by_email(&principal.email)
            .await
            .map_err(backend_unavailable)?;

        if let Some(user) = by_email {
            return Ok(self.link_external_id(user, principal, tier).await);
        }

        self.create(principal, tier).await
    }

    /// Partial tier update when the stored tier drifted from the current
    /// entitlement. Update failures are non-fatal: the stored record is
    /// returned unchanged.
    async fn sync_tier(&self, user: UserRecord, tier: Tier) -> UserRecord {
        if user.subscription_tier == tier {
            return user;
        }

        let patch = UserPatch {
            subscription_tier: Some(tier),
            ..Default::default()
        };
        match self.content.update_user(user.id, &patch).await {
            Ok(updated) => updated,
            Err(err) => {
                tracing::warn!(
                    user_id = user.id,
                    error = %err,
                    "tier update failed, returning stored record"
                );
                user
            }
        }
    }

    /// Best-effort linking of the provider identifier onto a record that
    /// matched by email only.
    async fn link_external_id(
        &self,
        user: UserRecord,
        principal: &Principal,
        tier: Tier,
    ) -> UserRecord {
        let patch = UserPatch {
            external_id: Some(principal.id.clone()),
            subscription_tier: Some(tier),
        };
        match self.content.update_user(user.id, &patch).await {
            Ok(linked) => linked,
            Err(err) => {
                tracing::warn!(
                    user_id = user.id,
                    external_id = %principal.id,
                    error = %err,
                    "linking external id failed, returning unlinked record"
                );
                user
            }
        }
    }

    async fn create(
        &self,
        principal: &Principal,
        tier: Tier,
    ) -> Result<UserRecord, ReconcileError> {
        let new_user = NewUser {
            username: synthesize_username(principal),
            email: principal.email.clone(),
            // The identity provider is the actual authentication factor;
            // the store just needs an unguessable value.
            password: placeholder_password(&principal.id),
            confirmed: true,
            role: self.resolve_role().await,
            external_id: principal.id.clone(),
            display_name: principal.display_name.clone(),
            subscription_tier: tier,
        };

        match self.content.create_user(&new_user).await {
            Ok(created) => Ok(created),
            Err(ContentError::Conflict(detail)) => {
                // Lost a first-sight race: another request created the
                // record between our lookup and the POST.
                tracing::warn!(
                    external_id = %principal.id,
                    "user create conflicted, retrying lookup"
                );
                let winner = self
                    .content
                    .find_user_by_email_or_external_id(&principal.email, &principal.id)
                    .await
                    .map_err(backend_unavailable)?;
                winner.ok_or(ReconcileError::Conflict(detail))
            }
            Err(err) => Err(backend_unavailable(err)),
        }
    }

    /// Resolve the role assigned to new records. Failures fall back to the
    /// configured default id.
    async fn resolve_role(&self) -> i64 {
        match self.content.list_roles().await {
            Ok(roles) => match roles.iter().find(|role| role.matches("authenticated")) {
                Some(role) => role.id,
                None => {
                    tracing::warn!(
                        default_role_id = self.default_role_id,
                        "no authenticated role in role list, using default"
                    );
                    self.default_role_id
                }
            },
            Err(err) => {
                tracing::warn!(
                    default_role_id = self.default_role_id,
                    error = %err,
                    "role lookup failed, using default"
                );
                self.default_role_id
            }
        }
    }
}

fn derive_tier(principal: &Principal) -> Tier {
    if principal.has_plan("pro") {
        Tier::Pro
    } else {
        Tier::Free
    }
}

fn backend_unavailable(err: ContentError) -> ReconcileError {
    ReconcileError::BackendUnavailable(err.to_string())
}

/// Username from the principal, or email local part plus a random suffix
/// to keep the store's uniqueness constraint satisfied.
fn synthesize_username(principal: &Principal) -> String {
    match &principal.username {
        Some(username) => username.clone(),
        None => {
            let local_part = principal.email.split('@').next().unwrap_or_default();
            format!("{}_{}", local_part, random_token(4))
        }
    }
}

fn placeholder_password(external_id: &str) -> String {
    format!("idp_managed_{}_{}", external_id, random_token(12))
}

fn random_token(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(plans: Vec<&str>) -> Principal {
        Principal {
            id: "ext_1".to_string(),
            email: "a@x.com".to_string(),
            username: None,
            display_name: None,
            plans: plans.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn tier_derives_from_pro_plan() {
        assert_eq!(derive_tier(&principal(vec!["pro"])), Tier::Pro);
        assert_eq!(derive_tier(&principal(vec![])), Tier::Free);
        assert_eq!(derive_tier(&principal(vec!["beta"])), Tier::Free);
    }

    #[test]
    fn username_prefers_principal_username() {
        let p = Principal {
            username: Some("ada".to_string()),
            ..principal(vec![])
        };
        assert_eq!(synthesize_username(&p), "ada");
    }

    #[test]
    fn username_synthesized_from_email_local_part() {
        let name = synthesize_username(&principal(vec![]));
        assert!(name.starts_with("a_"), "got {}", name);
        assert_eq!(name.len(), "a_".len() + 4);
    }

    #[test]
    fn random_tokens_differ() {
        assert_ne!(random_token(12), random_token(12));
    }

    #[test]
    fn placeholder_password_embeds_external_id() {
        let password = placeholder_password("ext_9");
        assert!(password.starts_with("idp_managed_ext_9_"));
    }
}
