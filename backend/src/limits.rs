//! Tiered usage quotas for the expensive generative endpoints.
//!
//! Keyed token buckets per backend user id, one pair of buckets per
//! guarded action. Pro users get the larger quota; free users get the
//! upgrade hint when they run dry.

use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;

use pantry_chef_common::{Tier, UserRecord};

use crate::config::LimitsConfig;

#[derive(Debug, thiserror::Error)]
#[error("{action} limit reached")]
pub struct LimitExceeded {
    pub action: &'static str,
    pub tier: Tier,
}

/// Free/pro bucket pair for one guarded action.
pub struct TierLimiter {
    action: &'static str,
    free: DefaultKeyedRateLimiter<i64>,
    pro: DefaultKeyedRateLimiter<i64>,
}

impl TierLimiter {
    pub fn per_hour(action: &'static str, free: u32, pro: u32) -> Self {
        Self {
            action,
            free: RateLimiter::keyed(Quota::per_hour(nonzero(free))),
            pro: RateLimiter::keyed(Quota::per_hour(nonzero(pro))),
        }
    }

    pub fn check(&self, user: &UserRecord) -> Result<(), LimitExceeded> {
        let limiter = match user.subscription_tier {
            Tier::Pro => &self.pro,
            Tier::Free => &self.free,
        };
        limiter.check_key(&user.id).map_err(|_| LimitExceeded {
            action: self.action,
            tier: user.subscription_tier,
        })
    }
}

/// All quota buckets, built once from config and shared in app state.
pub struct QuotaSet {
    pub scans: TierLimiter,
    pub suggestions: TierLimiter,
}

impl QuotaSet {
    pub fn new(config: &LimitsConfig) -> Self {
        Self {
            scans: TierLimiter::per_hour(
                "scan",
                config.free_scans_per_hour,
                config.pro_scans_per_hour,
            ),
            suggestions: TierLimiter::per_hour(
                "suggestion",
                config.free_suggestions_per_hour,
                config.pro_suggestions_per_hour,
            ),
        }
    }
}

fn nonzero(count: u32) -> NonZeroU32 {
    NonZeroU32::new(count.max(1)).unwrap_or(NonZeroU32::MIN)
}
