//! The simulation context owned by the loop driver
//!
//! A [`Session`] holds the current snapshot and everything that has to survive
//! between ticks: the engine, the run epoch, the frame counter and the
//! commentary bookkeeping. Mode loops call [`Session::tick`] once per tick and
//! hand `&Session` to the renderer.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info};

use crate::commentary::{
    CommentaryBroker, CommentaryReply, CommentaryService, EvolutionProfile, ReplyKind,
};
use crate::game::{milestone, GameConfig, GameEngine, GameState, Point, TerminationEvent, Viewport};

pub struct Session {
    engine: GameEngine,
    viewport: Viewport,
    state: GameState,
    /// Bumped on every reset; commentary replies from older epochs are dropped
    epoch: u64,
    /// Ticks since the session started, for idle animation only
    frame: u64,
    broker: CommentaryBroker,
    evolution_in_flight: bool,
    last_fact: Option<EvolutionProfile>,
    obituary: Option<String>,
}

impl Session {
    pub fn new(config: GameConfig, service: Arc<dyn CommentaryService>, timeout: Duration) -> Self {
        let viewport = config.viewport();
        let mut engine = GameEngine::new(config);
        let state = engine.reset_in(viewport);
        let broker = CommentaryBroker::new(service, timeout);

        info!(
            backend = broker.service_name(),
            width = viewport.width,
            height = viewport.height,
            "session started"
        );

        Self {
            engine,
            viewport,
            state,
            epoch: 0,
            frame: 0,
            broker,
            evolution_in_flight: false,
            last_fact: None,
            obituary: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn is_evolving(&self) -> bool {
        self.evolution_in_flight
    }

    pub fn last_fact(&self) -> Option<&EvolutionProfile> {
        self.last_fact.as_ref()
    }

    pub fn obituary(&self) -> Option<&str> {
        self.obituary.as_deref()
    }

    /// Advance one tick: apply finished commentary, step the simulation and
    /// fire any commentary the new snapshot calls for.
    ///
    /// Returns the termination event on the tick that ends the run.
    pub fn tick(&mut self, pointer: Point) -> Option<TerminationEvent> {
        self.apply_replies();
        self.frame += 1;

        if self.state.is_terminated {
            return None;
        }

        let result = self.engine.step(&self.state, pointer, self.viewport);
        let termination = result.termination();

        if let Some(food) = &result.info.eaten {
            debug!(
                id = %food.id,
                kind = ?food.kind,
                value = food.value,
                score = result.state.score,
                length = result.state.length_stat,
                "food eaten"
            );
        }
        self.state = result.state;

        if let Some(event) = termination {
            info!(
                epoch = self.epoch,
                score = event.score,
                length = event.length_stat,
                cause = ?event.cause,
                "organism died"
            );
            self.broker
                .request_obituary(self.epoch, event.score, event.length_stat);
            return Some(event);
        }

        self.maybe_evolve();
        None
    }

    /// Start a new run. Commentary still in flight for the old run is ignored
    /// when it lands.
    pub fn reset(&mut self) {
        self.epoch += 1;
        self.state = self.engine.reset_in(self.viewport);
        self.evolution_in_flight = false;
        self.last_fact = None;
        self.obituary = None;
        info!(epoch = self.epoch, "session reset");
    }

    /// Apply every commentary reply that has already arrived
    pub fn apply_replies(&mut self) {
        for reply in self.broker.drain() {
            self.apply_reply(reply);
        }
    }

    /// Wait for the next commentary reply and apply it
    pub async fn wait_for_commentary(&mut self) {
        if let Some(reply) = self.broker.next_reply().await {
            self.apply_reply(reply);
        }
    }

    fn apply_reply(&mut self, reply: CommentaryReply) {
        if reply.epoch != self.epoch {
            debug!(
                reply_epoch = reply.epoch,
                epoch = self.epoch,
                "dropping stale commentary"
            );
            return;
        }

        match reply.kind {
            ReplyKind::Evolution { milestone, profile } => {
                info!(
                    milestone = %milestone,
                    species = %profile.species_name,
                    "organism evolved"
                );
                self.state = self.state.evolved(profile.species_name.clone(), milestone);
                self.last_fact = Some(profile);
                self.evolution_in_flight = false;
            }
            ReplyKind::Obituary(text) => {
                self.obituary = Some(text);
            }
        }
    }

    fn maybe_evolve(&mut self) {
        if self.evolution_in_flight {
            return;
        }

        let reached = milestone::next_milestone(
            &self.engine.config().milestones,
            self.state.length_stat,
            &self.state.evolution_history,
        );

        if let Some(milestone) = reached {
            info!(
                milestone = %milestone.name,
                length = self.state.length_stat,
                "milestone reached, requesting evolution"
            );
            self.broker.request_evolution(
                self.epoch,
                milestone.name.clone(),
                self.state.length_stat,
                self.state.score,
            );
            self.evolution_in_flight = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commentary::{
        CommentaryError, CommentaryResult, OfflineCommentary, FALLBACK_OBITUARY,
    };
    use crate::game::{Segment, Snake};
    use async_trait::async_trait;
    use std::f64::consts::PI;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts evolution requests and answers after an optional delay
    struct CountingCommentary {
        evolutions: AtomicUsize,
        delay: Duration,
    }

    impl CountingCommentary {
        fn new(delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                evolutions: AtomicUsize::new(0),
                delay,
            })
        }
    }

    #[async_trait]
    impl CommentaryService for CountingCommentary {
        fn name(&self) -> &str {
            "counting"
        }

        async fn evolution_profile(
            &self,
            length_stat: u32,
            _score: u32,
        ) -> CommentaryResult<EvolutionProfile> {
            self.evolutions.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(EvolutionProfile {
                species_name: format!("Length {length_stat} Serpent"),
                fact: "Counted.".to_string(),
                traits: vec!["a".into(), "b".into(), "c".into()],
            })
        }

        async fn obituary(&self, _score: u32, _length_stat: u32) -> CommentaryResult<String> {
            Err(CommentaryError::Unavailable)
        }
    }

    fn session_with(service: Arc<dyn CommentaryService>) -> Session {
        Session::new(GameConfig::seeded(21), service, Duration::from_secs(5))
    }

    /// A pointer straight ahead of the spawn heading
    fn ahead(session: &Session) -> Point {
        let head = session.state().head_position();
        Point::new(head.x + 200.0, head.y)
    }

    /// Place the head just inside the left wall, facing out
    fn doom(session: &mut Session) -> Point {
        session.state.snake = Snake::new(Point::new(1.0, 270.0), PI, 3, 8.0);
        Point::new(-100.0, 270.0)
    }

    #[tokio::test]
    async fn test_tick_advances_frame_and_state() {
        let mut session = session_with(Arc::new(OfflineCommentary));
        let start = session.state().head_position();
        let pointer = ahead(&session);

        assert_eq!(session.tick(pointer), None);
        assert_eq!(session.frame(), 1);
        assert!(session.state().head_position().x > start.x);
    }

    #[tokio::test]
    async fn test_failed_obituary_uses_fallback_and_loop_continues() {
        let mut session = session_with(Arc::new(OfflineCommentary));
        let pointer = doom(&mut session);

        let event = session.tick(pointer).expect("wall hit ends the run");
        assert_eq!(event.score, 0);
        assert!(session.state().is_terminated);

        // Same loop keeps ticking; the frozen state does not change
        let frozen = session.state().clone();
        assert_eq!(session.tick(pointer), None);
        assert_eq!(session.state(), &frozen);
        assert_eq!(session.frame(), 2);

        session.wait_for_commentary().await;
        assert_eq!(session.obituary(), Some(FALLBACK_OBITUARY));
    }

    #[test]
    fn test_ticks_outside_runtime_use_fallbacks() {
        let mut session = session_with(Arc::new(OfflineCommentary));
        session.state.length_stat = 21;

        session.tick(ahead(&session));
        assert!(session.is_evolving());
        session.apply_replies();
        assert!(!session.is_evolving());
        assert_eq!(session.state().species, EvolutionProfile::fallback().species_name);

        let pointer = doom(&mut session);
        assert!(session.tick(pointer).is_some());
        session.tick(pointer);
        assert_eq!(session.obituary(), Some(FALLBACK_OBITUARY));
    }

    #[tokio::test]
    async fn test_milestone_fires_once() {
        let service = CountingCommentary::new(Duration::ZERO);
        let mut session = session_with(service.clone());
        session.state.length_stat = 21;

        session.tick(ahead(&session));
        assert!(session.is_evolving());

        // Still in flight: further ticks do not ask again
        session.tick(ahead(&session));
        session.wait_for_commentary().await;

        assert!(!session.is_evolving());
        assert_eq!(
            session.state().evolution_history,
            vec!["Common Grass Snake".to_string()]
        );
        assert!(session.state().species.ends_with("Serpent"));
        assert!(session.last_fact().is_some());

        // Hovering around the same threshold never re-fires
        for _ in 0..5 {
            session.tick(ahead(&session));
        }
        assert!(!session.is_evolving());
        assert_eq!(service.evolutions.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_reply_after_reset_is_dropped() {
        let service = CountingCommentary::new(Duration::from_secs(1));
        let mut session = session_with(service.clone());
        session.state.length_stat = 20;

        session.tick(ahead(&session));
        assert!(session.is_evolving());

        session.reset();
        assert_eq!(session.epoch(), 1);
        assert!(!session.is_evolving());

        // The old run's reply lands after the reset
        session.wait_for_commentary().await;

        assert_eq!(session.state().species, "Primitive Hatchling");
        assert!(session.state().evolution_history.is_empty());
        assert!(session.last_fact().is_none());
    }

    #[tokio::test]
    async fn test_reset_clears_run() {
        let mut session = session_with(Arc::new(OfflineCommentary));
        let pointer = doom(&mut session);
        session.tick(pointer);
        session.wait_for_commentary().await;

        session.reset();

        assert!(!session.state().is_terminated);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.obituary(), None);
        assert_eq!(session.state().snake.len(), 15);
        assert_eq!(
            session.state().snake.head(),
            Segment::new(480.0, 270.0, 0.0)
        );
    }
}
