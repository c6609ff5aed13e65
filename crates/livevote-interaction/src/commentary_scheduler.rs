//! Debounced, cancellable commentary requests.
//!
//! Each change of leader or totals restarts a quiet-period timer. When the
//! timer fires, one request goes out in a background task; a newer change
//! cancels both the timer and any request still in flight, and a cancelled
//! task never publishes its result.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use livevote_core::commentary::{CommentaryGenerator, CommentaryRequest};
use livevote_core::leaderboard::{CommentaryTrigger, Standings};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Schedules commentary for the leaderboard.
///
/// [`CommentaryScheduler::notify`] spawns onto the current tokio runtime and
/// must be called from within one.
pub struct CommentaryScheduler {
    generator: Arc<dyn CommentaryGenerator>,
    debounce: Duration,
    timeout: Duration,
    last_trigger: Option<CommentaryTrigger>,
    pending: Option<CancellationToken>,
    /// Bumped whenever earlier requests stop being wanted
    generation: Arc<AtomicU64>,
    latest: Arc<watch::Sender<Option<String>>>,
}

impl CommentaryScheduler {
    pub fn new(generator: Arc<dyn CommentaryGenerator>, debounce: Duration, timeout: Duration) -> Self {
        let (sender, _) = watch::channel(None);
        Self {
            generator,
            debounce,
            timeout,
            last_trigger: None,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
            latest: Arc::new(sender),
        }
    }

    /// Latest commentary line, if any arrived.
    pub fn latest(&self) -> Option<String> {
        self.latest.borrow().clone()
    }

    /// Follows commentary updates.
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.latest.subscribe()
    }

    /// Reacts to new standings.
    ///
    /// Nothing happens while leader and totals stay the same. With no votes
    /// at all, pending work is cancelled and the old line is cleared.
    pub fn notify(&mut self, standings: &Standings, session_title: &str) {
        let Some(trigger) = standings.commentary_trigger() else {
            self.clear();
            return;
        };

        if self.last_trigger.as_ref() == Some(&trigger) {
            return;
        }

        let leader_name = standings
            .leader()
            .map(|s| s.participant.name.clone())
            .unwrap_or_default();
        let request = CommentaryRequest {
            session_title: session_title.to_string(),
            total_votes: trigger.total_votes,
            leader_name,
        };
        self.last_trigger = Some(trigger);
        self.schedule(request);
    }

    /// Cancels pending work and forgets both the last trigger and the last line.
    ///
    /// The next [`CommentaryScheduler::notify`] with votes starts over.
    pub fn clear(&mut self) {
        self.cancel_pending();
        self.last_trigger = None;
        self.latest.send_replace(None);
    }

    /// Cancels the pending timer or request, if any.
    pub fn cancel_pending(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    fn schedule(&mut self, request: CommentaryRequest) {
        self.cancel_pending();

        let token = CancellationToken::new();
        self.pending = Some(token.clone());

        let generator = Arc::clone(&self.generator);
        let latest = Arc::clone(&self.latest);
        let generation = Arc::clone(&self.generation);
        let expected = generation.load(Ordering::SeqCst);
        let debounce = self.debounce;
        let timeout = self.timeout;

        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            let prompt = request.prompt();
            let result = tokio::select! {
                _ = token.cancelled() => return,
                result = tokio::time::timeout(timeout, generator.generate(&prompt)) => result,
            };

            match result {
                Ok(Ok(text)) => {
                    let chars = text.chars().count();
                    if publish_if_current(&latest, &generation, expected, text) {
                        tracing::debug!("Commentary received ({} chars)", chars);
                    }
                }
                Ok(Err(e)) => tracing::warn!("Commentary request failed: {}", e),
                Err(_) => tracing::warn!("Commentary request timed out after {:?}", timeout),
            }
        });
    }
}

/// Publishes `text` only while `expected` is still the current generation.
///
/// The check runs under the channel's write lock, and `clear` bumps the
/// generation before taking that lock, so a cleared line is never revived.
fn publish_if_current(
    latest: &watch::Sender<Option<String>>,
    generation: &AtomicU64,
    expected: u64,
    text: String,
) -> bool {
    latest.send_if_modified(|slot| {
        if generation.load(Ordering::SeqCst) != expected {
            return false;
        }
        *slot = Some(text);
        true
    })
}

impl Drop for CommentaryScheduler {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use livevote_core::error::{LiveVoteError, Result};
    use livevote_core::session::model::Participant;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGenerator {
        prompts: Mutex<Vec<String>>,
        fail: bool,
        delay: Option<Duration>,
    }

    #[async_trait]
    impl CommentaryGenerator for RecordingGenerator {
        async fn generate(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                return Err(LiveVoteError::commentary("boom"));
            }
            Ok(format!("reply #{}", self.prompts.lock().unwrap().len()))
        }
    }

    fn roster(votes: &[u32]) -> Vec<Participant> {
        votes
            .iter()
            .enumerate()
            .map(|(i, v)| Participant {
                id: format!("p{}", i),
                name: format!("Участник #{}", i + 1),
                photo_url: String::new(),
                votes: *v,
            })
            .collect()
    }

    fn scheduler(generator: Arc<RecordingGenerator>) -> CommentaryScheduler {
        CommentaryScheduler::new(generator, Duration::from_secs(3), Duration::from_secs(30))
    }

    #[tokio::test(start_paused = true)]
    async fn test_debounce_collapses_rapid_changes() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut scheduler = scheduler(generator.clone());
        let mut rx = scheduler.subscribe();

        scheduler.notify(&Standings::from_roster(&roster(&[1, 0])), "Финал");
        tokio::time::sleep(Duration::from_secs(1)).await;
        scheduler.notify(&Standings::from_roster(&roster(&[1, 2])), "Финал");

        rx.changed().await.unwrap();
        assert_eq!(scheduler.latest().as_deref(), Some("reply #1"));

        let prompts = generator.prompts.lock().unwrap().clone();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Лидер: Участник #2"));
        assert!(prompts[0].contains("Проголосовало 3"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_trigger_does_not_refire() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut scheduler = scheduler(generator.clone());
        let standings = Standings::from_roster(&roster(&[2, 1]));

        scheduler.notify(&standings, "Финал");
        tokio::time::sleep(Duration::from_secs(5)).await;
        scheduler.notify(&standings, "Финал");
        tokio::time::sleep(Duration::from_secs(5)).await;

        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_votes_means_no_request() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut scheduler = scheduler(generator.clone());

        scheduler.notify(&Standings::from_roster(&roster(&[0, 0])), "Финал");
        scheduler.notify(&Standings::from_roster(&[]), "Финал");
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(generator.prompts.lock().unwrap().is_empty());
        assert_eq!(scheduler.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_leaves_commentary_empty() {
        let generator = Arc::new(RecordingGenerator {
            fail: true,
            ..Default::default()
        });
        let mut scheduler = scheduler(generator.clone());

        scheduler.notify(&Standings::from_roster(&roster(&[1])), "Финал");
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
        assert_eq!(scheduler.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_leaves_commentary_empty() {
        let generator = Arc::new(RecordingGenerator {
            delay: Some(Duration::from_secs(60)),
            ..Default::default()
        });
        let mut scheduler = scheduler(generator.clone());

        scheduler.notify(&Standings::from_roster(&roster(&[1])), "Финал");
        tokio::time::sleep(Duration::from_secs(120)).await;

        assert_eq!(scheduler.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_in_flight_result_is_dropped_after_newer_change() {
        let generator = Arc::new(RecordingGenerator {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let mut scheduler = scheduler(generator.clone());

        scheduler.notify(&Standings::from_roster(&roster(&[1, 0])), "Финал");
        // Past the debounce, request in flight
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(generator.prompts.lock().unwrap().len(), 1);

        scheduler.notify(&Standings::from_roster(&roster(&[1, 2])), "Финал");
        tokio::time::sleep(Duration::from_secs(3)).await;
        // First request would have completed by now but was cancelled
        assert_eq!(scheduler.latest(), None);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(scheduler.latest().as_deref(), Some("reply #2"));
    }

    #[test]
    fn test_publish_after_clear_is_dropped() {
        let (latest, _rx) = watch::channel(None);
        let generation = AtomicU64::new(7);

        assert!(publish_if_current(&latest, &generation, 7, "fresh".to_string()));
        assert_eq!(latest.borrow().as_deref(), Some("fresh"));

        // clear() between the request finishing and the publish
        generation.fetch_add(1, Ordering::SeqCst);
        latest.send_replace(None);
        assert!(!publish_if_current(&latest, &generation, 7, "stale".to_string()));
        assert_eq!(*latest.borrow(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_drops_in_flight_result() {
        let generator = Arc::new(RecordingGenerator {
            delay: Some(Duration::from_secs(5)),
            ..Default::default()
        });
        let mut scheduler = scheduler(generator.clone());

        scheduler.notify(&Standings::from_roster(&roster(&[1])), "Финал");
        tokio::time::sleep(Duration::from_secs(4)).await;
        scheduler.clear();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(generator.prompts.lock().unwrap().len(), 1);
        assert_eq!(scheduler.latest(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending() {
        let generator = Arc::new(RecordingGenerator::default());
        let mut scheduler = scheduler(generator.clone());

        scheduler.notify(&Standings::from_roster(&roster(&[1])), "Финал");
        drop(scheduler);
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert!(generator.prompts.lock().unwrap().is_empty());
    }
}
