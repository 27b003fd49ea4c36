use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{Instant, MissedTickBehavior, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use domain::player::{ContentSource, Playback, PlayerState, Slide, SlideRenderer};
use domain::playlist::PlaylistId;
use domain::tv::TvId;
use domain::DomainError;

use crate::retry::{Backoff, BackoffPolicy};

#[derive(Debug, Clone, Copy)]
pub struct PlayerSettings {
    /// Upper bound on how stale the shown content may be
    pub refresh_interval: Duration,
    pub heartbeat_interval: Duration,
    pub backoff: BackoffPolicy,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            refresh_interval: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
            backoff: BackoffPolicy::default(),
        }
    }
}

/// What a runtime is showing, published after every change
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    pub tv_id: TvId,
    #[serde(flatten)]
    pub state: PlayerState,
    pub playlist_id: Option<PlaylistId>,
    pub revision: u64,
    pub slide: Option<Slide>,
}

impl PlayerSnapshot {
    fn capture(tv_id: &TvId, playback: &Playback) -> Self {
        Self {
            tv_id: tv_id.clone(),
            state: playback.state(),
            playlist_id: playback.content().and_then(|c| c.playlist_id.clone()),
            revision: playback.content().map(|c| c.revision).unwrap_or_default(),
            slide: playback.current_slide().cloned(),
        }
    }
}

/// Drives a single TV: pulls content, rotates slides and sends heartbeats
/// until cancelled.
pub struct PlayerRuntime {
    tv_id: TvId,
    source: Arc<dyn ContentSource>,
    renderer: Arc<dyn SlideRenderer>,
    settings: PlayerSettings,
    cancel_token: CancellationToken,
    snapshot_tx: watch::Sender<PlayerSnapshot>,
}

impl PlayerRuntime {
    pub fn new(
        tv_id: TvId,
        source: Arc<dyn ContentSource>,
        renderer: Arc<dyn SlideRenderer>,
        settings: PlayerSettings,
    ) -> Self {
        let (snapshot_tx, _) = watch::channel(PlayerSnapshot::capture(&tv_id, &Playback::new()));
        Self {
            tv_id,
            source,
            renderer,
            settings,
            cancel_token: CancellationToken::new(),
            snapshot_tx,
        }
    }

    pub fn tv_id(&self) -> &TvId {
        &self.tv_id
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.snapshot_tx.subscribe()
    }

    pub async fn run(self) {
        info!(tv_id = %self.tv_id, "Starting player");

        let mut playback = Playback::new();
        let mut backoff = Backoff::new(self.settings.backoff);
        let mut next_refresh = Instant::now();
        let mut slide_deadline: Option<Instant> = None;

        let mut heartbeat = tokio::time::interval(self.settings.heartbeat_interval);
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;

                _ = self.cancel_token.cancelled() => {
                    info!(tv_id = %self.tv_id, "Shutdown signal received");
                    break;
                }

                _ = sleep_until(next_refresh) => {
                    match self.source.fetch_content(&self.tv_id).await {
                        Ok(content) => {
                            if backoff.is_backing_off() {
                                info!(tv_id = %self.tv_id, "Content source reachable again");
                                backoff.reset();
                            }
                            if playback.load(content) {
                                debug!(
                                    tv_id = %self.tv_id,
                                    state = ?playback.state(),
                                    "Content changed, restarting rotation"
                                );
                                slide_deadline = self.show(&playback).await;
                            }
                            next_refresh = Instant::now() + self.settings.refresh_interval;
                        }
                        Err(e) if e.is_retryable() => {
                            let delay = backoff.next_delay();
                            warn!(
                                tv_id = %self.tv_id,
                                retry_in_ms = delay.as_millis() as u64,
                                "Content fetch failed, keeping current content: {}", e
                            );
                            next_refresh = Instant::now() + delay;
                        }
                        Err(e) => {
                            if matches!(e, DomainError::NotFound { .. }) {
                                warn!(tv_id = %self.tv_id, "TV is not registered: {}", e);
                            } else {
                                error!(tv_id = %self.tv_id, "Content fetch rejected: {}", e);
                            }
                            backoff.reset();
                            if playback.clear() {
                                slide_deadline = self.show(&playback).await;
                            }
                            next_refresh = Instant::now() + self.settings.refresh_interval;
                        }
                    }
                }

                _ = sleep_until(slide_deadline.unwrap_or_else(Instant::now)), if slide_deadline.is_some() => {
                    let (Some(deadline), Some(content)) = (slide_deadline, playback.content()) else {
                        slide_deadline = None;
                        continue;
                    };
                    // Scheduled from the previous deadline so rotation does not drift
                    let next_deadline = deadline + content.slide_duration();

                    if playback.advance() {
                        self.render_current(&playback).await;
                        self.publish(&playback);
                        slide_deadline = Some(next_deadline);
                    } else {
                        debug!(tv_id = %self.tv_id, "Holding last slide");
                        slide_deadline = None;
                    }
                }

                _ = heartbeat.tick() => {
                    if let Err(e) = self.source.send_heartbeat(&self.tv_id).await {
                        warn!(tv_id = %self.tv_id, "Heartbeat failed: {}", e);
                    }
                }
            }
        }

        info!(tv_id = %self.tv_id, "Player stopped");
    }

    /// Render from the start of the loaded content. Returns the first slide
    /// deadline, or `None` when idle.
    async fn show(&self, playback: &Playback) -> Option<Instant> {
        self.publish(playback);
        match (playback.state(), playback.content()) {
            (PlayerState::Playing { .. }, Some(content)) => {
                self.render_current(playback).await;
                Some(Instant::now() + content.slide_duration())
            }
            _ => {
                if let Err(e) = self.renderer.show_idle(&self.tv_id).await {
                    warn!(tv_id = %self.tv_id, "Idle screen failed: {}", e);
                }
                None
            }
        }
    }

    async fn render_current(&self, playback: &Playback) {
        let (Some(index), Some(slide), Some(content)) = (
            playback.state().index(),
            playback.current_slide(),
            playback.content(),
        ) else {
            return;
        };
        // Render failures are not retried; the next slide comes on schedule
        if let Err(e) = self.renderer.render(&self.tv_id, index, slide, content).await {
            warn!(tv_id = %self.tv_id, url = %slide.url, "Render failed: {}", e);
        }
    }

    fn publish(&self, playback: &Playback) {
        self.snapshot_tx
            .send_replace(PlayerSnapshot::capture(&self.tv_id, playback));
    }
}
