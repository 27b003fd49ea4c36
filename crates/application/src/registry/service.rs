use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

use domain::event::{DomainEvent, EventPublisher};
use domain::tv::{Tv, TvId, TvStatus};
use domain::DomainError;

use crate::playlist::PlaylistManager;
use crate::store::{ContentStore, emit};

/// How long a TV may stay silent before it is considered offline
#[derive(Debug, Clone, Copy)]
pub struct LivenessPolicy {
    pub heartbeat_interval: Duration,
    pub missed_threshold: u32,
}

impl Default for LivenessPolicy {
    fn default() -> Self {
        Self {
            heartbeat_interval: Duration::from_secs(30),
            missed_threshold: 2,
        }
    }
}

impl LivenessPolicy {
    /// `interval * (threshold + 1)`: the threshold counts missed beats.
    /// Saturates instead of overflowing.
    pub fn timeout(&self) -> chrono::Duration {
        self.missed_threshold
            .checked_add(1)
            .and_then(|beats| self.heartbeat_interval.checked_mul(beats))
            .and_then(|window| chrono::Duration::from_std(window).ok())
            .unwrap_or(chrono::Duration::MAX)
    }
}

/// Set of known TVs and their online status
pub struct RegistryService {
    store: ContentStore,
    playlists: Arc<PlaylistManager>,
    publisher: Arc<dyn EventPublisher>,
    policy: LivenessPolicy,
    next_id: AtomicU64,
}

impl RegistryService {
    pub fn new(
        store: ContentStore,
        playlists: Arc<PlaylistManager>,
        publisher: Arc<dyn EventPublisher>,
        policy: LivenessPolicy,
    ) -> Self {
        Self {
            store,
            playlists,
            publisher,
            policy,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn policy(&self) -> LivenessPolicy {
        self.policy
    }

    /// Registration order
    pub async fn list(&self) -> Result<Vec<Tv>, DomainError> {
        self.store.tvs.find_all().await
    }

    pub async fn get(&self, id: &TvId) -> Result<Tv, DomainError> {
        self.store
            .tvs
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("TV", id))
    }

    /// Add a TV. It starts offline and has never been seen.
    pub async fn register(&self, name: &str, location: &str) -> Result<Tv, DomainError> {
        let _guard = self.store.lock().await;

        let id = self.allocate_id().await?;
        let tv = Tv::register(id, name, location, Utc::now())?;
        self.store.tvs.save(&tv).await?;

        info!(tv_id = %tv.id(), name = %tv.name, location = %tv.location, "TV registered");
        emit(
            &self.publisher,
            DomainEvent::tv_registered(tv.id().clone(), tv.name.clone(), tv.location.clone()),
        )
        .await;
        Ok(tv)
    }

    /// Forget a TV and everything pointing at it
    pub async fn remove(&self, id: &TvId) -> Result<(), DomainError> {
        let _guard = self.store.lock().await;

        self.get(id).await?;
        self.playlists.detach_tv_locked(id).await?;
        self.store.tvs.delete(id).await?;

        info!(tv_id = %id, "TV removed");
        emit(&self.publisher, DomainEvent::tv_removed(id.clone())).await;
        Ok(())
    }

    /// Record a heartbeat. Unknown TVs are rejected, never auto-registered.
    pub async fn heartbeat(&self, id: &TvId, at: DateTime<Utc>) -> Result<Tv, DomainError> {
        let _guard = self.store.lock().await;

        let mut tv = self.get(id).await?;
        let came_online = tv.record_heartbeat(at);
        self.store.tvs.save(&tv).await?;

        debug!(tv_id = %id, "Heartbeat received");
        emit(&self.publisher, DomainEvent::tv_heartbeat(id.clone(), at)).await;
        if came_online {
            info!(tv_id = %id, "TV is online");
            emit(
                &self.publisher,
                DomainEvent::tv_status_changed(id.clone(), TvStatus::Online, "Heartbeat received"),
            )
            .await;
        }
        Ok(tv)
    }

    /// Mark every online TV whose last heartbeat is older than the policy
    /// timeout as offline. Returns the TVs that changed.
    pub async fn check_liveness(&self, now: DateTime<Utc>) -> Result<Vec<Tv>, DomainError> {
        let _guard = self.store.lock().await;

        let timeout = self.policy.timeout();
        let mut changed = Vec::new();
        for mut tv in self.store.tvs.find_all().await? {
            if !tv.is_stale(now, timeout) || !tv.mark_offline() {
                continue;
            }
            self.store.tvs.save(&tv).await?;
            warn!(
                tv_id = %tv.id(),
                last_seen = %tv.last_seen_label(),
                "TV missed {} heartbeats, marking offline",
                self.policy.missed_threshold
            );
            emit(
                &self.publisher,
                DomainEvent::tv_status_changed(tv.id().clone(), TvStatus::Offline, "Heartbeat timeout"),
            )
            .await;
            changed.push(tv);
        }
        Ok(changed)
    }

    async fn allocate_id(&self) -> Result<TvId, DomainError> {
        loop {
            let id = TvId::from_sequence(self.next_id.fetch_add(1, Ordering::SeqCst));
            if self.store.tvs.find_by_id(&id).await?.is_none() {
                return Ok(id);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_allows_missed_beats() {
        let policy = LivenessPolicy {
            heartbeat_interval: Duration::from_secs(30),
            missed_threshold: 2,
        };
        assert_eq!(policy.timeout(), chrono::Duration::seconds(90));

        let strict = LivenessPolicy {
            missed_threshold: 0,
            ..policy
        };
        assert_eq!(strict.timeout(), chrono::Duration::seconds(30));
    }

    #[test]
    fn test_timeout_saturates_on_huge_settings() {
        let huge = LivenessPolicy {
            heartbeat_interval: Duration::from_secs(u64::MAX / 2),
            missed_threshold: 2,
        };
        assert_eq!(huge.timeout(), chrono::Duration::MAX);

        let many_beats = LivenessPolicy {
            heartbeat_interval: Duration::from_secs(30),
            missed_threshold: u32::MAX,
        };
        assert_eq!(many_beats.timeout(), chrono::Duration::MAX);

        let now = Utc::now();
        assert!(now - (now - chrono::Duration::days(365)) < huge.timeout());
    }
}
