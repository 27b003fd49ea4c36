use std::time::Duration;

use application::player::PlayerSettings;
use application::retry::BackoffPolicy;
use domain::DomainError;
use domain::tv::TvId;
use infrastructure::config::PlayerConfig;

/// Runtime timing derived from the loaded configuration
pub fn player_settings(config: &PlayerConfig) -> PlayerSettings {
    PlayerSettings {
        refresh_interval: Duration::from_secs(config.refresh_interval_secs),
        heartbeat_interval: Duration::from_secs(config.heartbeat_interval_secs),
        backoff: BackoffPolicy {
            initial: Duration::from_millis(config.retry.initial_ms),
            max: Duration::from_millis(config.retry.max_ms),
            ..BackoffPolicy::default()
        },
    }
}

/// Validate and de-duplicate configured TV ids, keeping their order
pub fn tv_ids(raw: &[String]) -> Result<Vec<TvId>, DomainError> {
    let mut ids: Vec<TvId> = Vec::with_capacity(raw.len());
    for id in raw {
        let id = TvId::new(id.trim())?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return Err(DomainError::InvalidConfiguration(
            "No TV ids configured (tv_ids or --tv)".into(),
        ));
    }
    Ok(ids)
}
