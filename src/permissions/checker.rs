//! Permission checker with caching.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheConfig, CacheRegistry, TypedCache};
use crate::gateway::ChatGateway;

/// Cache key for admin lookups.
type AdminCacheKey = (i64, u64); // (chat_id, user_id)

/// Answers "is this user a chat administrator?" with a short-lived cache in
/// front of `getChatMember`.
#[derive(Clone)]
pub struct Permissions {
    gateway: Arc<dyn ChatGateway>,
    cache: TypedCache<AdminCacheKey, bool>,
}

impl Permissions {
    pub fn new(gateway: Arc<dyn ChatGateway>, cache_registry: &CacheRegistry) -> Self {
        let cache = cache_registry.get_or_create(
            "admin_status",
            CacheConfig::with_capacity(10_000)
                .ttl(Duration::from_secs(300)) // 5 minutes
                .tti(Duration::from_secs(120)), // 2 minutes idle
        );

        Self { gateway, cache }
    }

    /// Check if a user is an administrator or the creator of a chat.
    ///
    /// A failed lookup counts as "not an admin" and is not cached.
    pub async fn is_admin(&self, chat_id: i64, user_id: u64) -> bool {
        let cache_key = (chat_id, user_id);

        if let Some(cached) = self.cache.get(&cache_key) {
            debug!("Admin cache hit for user {} in chat {}", user_id, chat_id);
            return cached;
        }

        match self.gateway.member_status(chat_id, user_id).await {
            Ok(status) => {
                let admin = status.is_admin();
                self.cache.insert(cache_key, admin);
                admin
            }
            Err(e) => {
                warn!("Failed to fetch member status of {} in chat {}: {}", user_id, chat_id, e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::recording::RecordingGateway;

    #[tokio::test]
    async fn admin_lookups_are_cached() {
        let gateway = RecordingGateway::new();
        gateway.make_admin(-1, 10);
        let perms = Permissions::new(gateway.clone(), &CacheRegistry::new());

        assert!(perms.is_admin(-1, 10).await);
        assert!(perms.is_admin(-1, 10).await);
        assert!(!perms.is_admin(-1, 11).await);
        assert!(!perms.is_admin(-2, 10).await);
        assert_eq!(gateway.status_lookups(), 3);
    }

    #[tokio::test]
    async fn failed_lookup_is_not_admin_and_not_cached() {
        let gateway = RecordingGateway::new();
        gateway.make_admin(-1, 10);
        gateway.fail_all(true);
        let perms = Permissions::new(gateway.clone(), &CacheRegistry::new());

        assert!(!perms.is_admin(-1, 10).await);

        gateway.fail_all(false);
        assert!(perms.is_admin(-1, 10).await);
    }
}
