use std::time::{Duration, Instant};

use crate::game::TerminationEvent;

/// Wall-clock and per-session bests shown in the HUD.
///
/// Purely presentational: nothing in here feeds back into the simulation.
pub struct GameMetrics {
    pub start_time: Instant,
    pub elapsed_time: Duration,
    pub high_score: u32,
    pub longest: u32,
    pub runs: u32,
    /// Set once the current run has ended, so the clock stops
    finished: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            elapsed_time: Duration::ZERO,
            high_score: 0,
            longest: 0,
            runs: 0,
            finished: false,
        }
    }

    pub fn update(&mut self) {
        if !self.finished {
            self.elapsed_time = self.start_time.elapsed();
        }
    }

    pub fn on_run_start(&mut self) {
        self.start_time = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.finished = false;
    }

    pub fn on_run_end(&mut self, event: &TerminationEvent) {
        self.update();
        self.finished = true;
        self.runs += 1;
        self.high_score = self.high_score.max(event.score);
        self.longest = self.longest.max(event.length_stat);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        let minutes = total_secs / 60;
        let seconds = total_secs % 60;
        format!("{:02}:{:02}", minutes, seconds)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
