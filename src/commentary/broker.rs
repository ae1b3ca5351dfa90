use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, warn};

use super::{CommentaryError, CommentaryService, EvolutionProfile, FALLBACK_OBITUARY};

/// What a finished request produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyKind {
    Evolution {
        /// Milestone label the request was fired for
        milestone: String,
        profile: EvolutionProfile,
    },
    Obituary(String),
}

/// A finished request, tagged with the epoch of the run that asked for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentaryReply {
    pub epoch: u64,
    pub kind: ReplyKind,
}

/// Runs commentary requests in the background and collects their replies.
///
/// Requests never fail from the caller's point of view: errors and timeouts
/// are logged and replaced by the fallback text before the reply is queued.
/// Nothing is ever cancelled; the owner drops replies whose epoch is stale.
pub struct CommentaryBroker {
    service: Arc<dyn CommentaryService>,
    timeout: Duration,
    tx: UnboundedSender<CommentaryReply>,
    rx: UnboundedReceiver<CommentaryReply>,
}

impl CommentaryBroker {
    pub fn new(service: Arc<dyn CommentaryService>, timeout: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            service,
            timeout,
            tx,
            rx,
        }
    }

    pub fn service_name(&self) -> &str {
        self.service.name()
    }

    /// Ask for a species profile
    pub fn request_evolution(&self, epoch: u64, milestone: String, length_stat: u32, score: u32) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(backend = self.service.name(), "no async runtime, using fallback evolution");
            self.send(CommentaryReply {
                epoch,
                kind: ReplyKind::Evolution {
                    milestone,
                    profile: EvolutionProfile::fallback(),
                },
            });
            return;
        };

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let timeout = self.timeout;

        runtime.spawn(async move {
            let result = tokio::time::timeout(timeout, service.evolution_profile(length_stat, score))
                .await
                .unwrap_or(Err(CommentaryError::Timeout(timeout.as_secs())));

            let profile = result.unwrap_or_else(|err| {
                warn!(backend = service.name(), error = %err, "evolution commentary failed, using fallback");
                EvolutionProfile::fallback()
            });

            // The receiver lives as long as the broker; a closed channel just means shutdown
            let _ = tx.send(CommentaryReply {
                epoch,
                kind: ReplyKind::Evolution { milestone, profile },
            });
        });
    }

    /// Ask for an obituary
    pub fn request_obituary(&self, epoch: u64, score: u32, length_stat: u32) {
        let Ok(runtime) = Handle::try_current() else {
            warn!(backend = self.service.name(), "no async runtime, using fallback obituary");
            self.send(CommentaryReply {
                epoch,
                kind: ReplyKind::Obituary(FALLBACK_OBITUARY.to_string()),
            });
            return;
        };

        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        let timeout = self.timeout;

        runtime.spawn(async move {
            let result = tokio::time::timeout(timeout, service.obituary(score, length_stat))
                .await
                .unwrap_or(Err(CommentaryError::Timeout(timeout.as_secs())));

            let text = result.unwrap_or_else(|err| {
                warn!(backend = service.name(), error = %err, "obituary commentary failed, using fallback");
                FALLBACK_OBITUARY.to_string()
            });

            let _ = tx.send(CommentaryReply {
                epoch,
                kind: ReplyKind::Obituary(text),
            });
        });
    }

    fn send(&self, reply: CommentaryReply) {
        // We hold the receiver, so this only fails during teardown
        let _ = self.tx.send(reply);
    }

    /// Everything that has finished since the last call, without waiting
    pub fn drain(&mut self) -> Vec<CommentaryReply> {
        let mut replies = Vec::new();
        while let Ok(reply) = self.rx.try_recv() {
            replies.push(reply);
        }
        if !replies.is_empty() {
            debug!(count = replies.len(), "drained commentary replies");
        }
        replies
    }

    /// Wait for the next reply
    pub async fn next_reply(&mut self) -> Option<CommentaryReply> {
        self.rx.recv().await
    }
}
