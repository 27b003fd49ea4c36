use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{TvId, TvStatus};
use crate::error::{DomainError, Result};

/// Label shown for a TV that never sent a heartbeat
pub const NEVER_CONNECTED: &str = "Nunca conectada";

/// A registered display.
///
/// Status changes only through [`Tv::record_heartbeat`] and
/// [`Tv::mark_offline`]; the id is fixed at registration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tv {
    id: TvId,
    pub name: String,
    pub location: String,
    status: TvStatus,
    last_seen: Option<DateTime<Utc>>,
    registered_at: DateTime<Utc>,
}

impl Tv {
    /// New registrations start offline and never seen
    pub fn register(
        id: TvId,
        name: impl Into<String>,
        location: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        let name = name.into().trim().to_string();
        let location = location.into().trim().to_string();

        if name.is_empty() || location.is_empty() {
            return Err(DomainError::validation(
                "TV name and location are required",
            ));
        }

        Ok(Self {
            id,
            name,
            location,
            status: TvStatus::Offline,
            last_seen: None,
            registered_at: now,
        })
    }

    pub fn id(&self) -> &TvId {
        &self.id
    }

    pub fn status(&self) -> TvStatus {
        self.status
    }

    pub fn last_seen(&self) -> Option<DateTime<Utc>> {
        self.last_seen
    }

    pub fn registered_at(&self) -> DateTime<Utc> {
        self.registered_at
    }

    /// Human readable last-seen, as shown in the admin panel
    pub fn last_seen_label(&self) -> String {
        match self.last_seen {
            Some(ts) => ts.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => NEVER_CONNECTED.to_string(),
        }
    }

    /// Returns true when the TV transitioned from offline to online.
    /// Out-of-order heartbeats never move last_seen backwards.
    pub fn record_heartbeat(&mut self, at: DateTime<Utc>) -> bool {
        let was_offline = !self.status.is_online();
        self.status = TvStatus::Online;
        if self.last_seen.is_none_or(|prev| at > prev) {
            self.last_seen = Some(at);
        }
        was_offline
    }

    /// Returns true when the TV was online before the call
    pub fn mark_offline(&mut self) -> bool {
        let was_online = self.status.is_online();
        self.status = TvStatus::Offline;
        was_online
    }

    /// Online TV whose last heartbeat is older than `timeout`
    pub fn is_stale(&self, now: DateTime<Utc>, timeout: chrono::Duration) -> bool {
        match (self.status, self.last_seen) {
            (TvStatus::Online, Some(seen)) => now - seen > timeout,
            (TvStatus::Online, None) => true,
            (TvStatus::Offline, _) => false,
        }
    }
}
