//! The per-tick morph state machine.
//!
//! Drives morph progress from 0 toward `1 + HOLD_FRACTION`, then either
//! rests in a pause window before requesting a buffer swap (loop mode) or
//! stops on the held frame (single-shot mode).
//!
//! The machine itself never touches buffers; it reports what should happen
//! via [`MorphTick`] and the engine applies the swap within the same tick,
//! so swap and progress reset are atomic from the outside.

use crate::config::Config;

/// Extra progress beyond 1.0 held for the per-point stagger tail.
pub const HOLD_FRACTION: f32 = 0.3;

/// Cadence, in ticks, of the "Pausing..." status while holding.
const PAUSE_STATUS_INTERVAL: u32 = 30;

/// Observable phase of the morph machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not playing.
    Idle,
    /// Progress advancing toward the ceiling.
    Morphing,
    /// At the ceiling, waiting out the pause window (loop mode).
    HoldPause,
    /// A single-shot morph completed; holding the final frame.
    Finished,
}

/// What a single tick of the machine decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphTick {
    /// Not playing; nothing happened.
    Idle,
    /// Progress advanced.
    Advanced,
    /// Holding at the ceiling; no status due this tick.
    Holding,
    /// Holding, and a periodic "Pausing..." status is due.
    PauseStatus {
        /// Ticks spent in the pause window so far.
        frame: u32,
    },
    /// The pause window elapsed; the engine must swap to the next image
    /// and then call [`MorphState::on_swapped`] in the same tick.
    SwapRequested,
    /// Single-shot morph finished; playback stopped on the held frame.
    Finished,
}

/// Outcome of toggling playback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// Playback started.
    Started {
        /// The previous morph was fully settled, so the engine must swap
        /// immediately before the first tick.
        immediate_swap: bool,
    },
    /// Playback stopped.
    Stopped,
}

/// Morph progress, playback flag, and pause bookkeeping.
#[derive(Debug)]
pub struct MorphState {
    progress: f32,
    playing: bool,
    pause_counter: u32,
    finished: bool,
}

impl MorphState {
    /// Create a stopped machine with zero progress.
    pub fn new() -> Self {
        Self {
            progress: 0.0,
            playing: false,
            pause_counter: 0,
            finished: false,
        }
    }

    /// Shared progress scalar in `[0, 1 + HOLD_FRACTION]`.
    pub fn progress(&self) -> f32 {
        self.progress
    }

    /// Whether playback is active.
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Current observable phase.
    pub fn phase(&self) -> Phase {
        if self.playing {
            if self.progress < 1.0 + HOLD_FRACTION {
                Phase::Morphing
            } else {
                Phase::HoldPause
            }
        } else if self.finished {
            Phase::Finished
        } else {
            Phase::Idle
        }
    }

    /// Advance one tick.
    ///
    /// Only moves while playing. At the progress ceiling, loop mode counts
    /// out the pause window (announcing every 30 ticks while still short of
    /// the configured duration, never on the threshold tick itself) and
    /// then requests a swap; single-shot mode stops on the held frame.
    pub fn tick(&mut self, config: &Config) -> MorphTick {
        if !self.playing {
            return MorphTick::Idle;
        }

        if self.progress < 1.0 + HOLD_FRACTION {
            self.progress += config.morph_speed;
            return MorphTick::Advanced;
        }

        if !config.loop_mode {
            self.playing = false;
            self.finished = true;
            return MorphTick::Finished;
        }

        self.pause_counter += 1;
        if self.pause_counter >= config.pause_duration {
            self.pause_counter = 0;
            return MorphTick::SwapRequested;
        }
        if self.pause_counter % PAUSE_STATUS_INTERVAL == 0 {
            return MorphTick::PauseStatus {
                frame: self.pause_counter,
            };
        }
        MorphTick::Holding
    }

    /// Toggle playback. Needs at least two images to start.
    pub fn toggle(&mut self, image_count: usize) -> Result<Toggle, crate::error::EngineError> {
        if image_count < 2 {
            return Err(crate::error::EngineError::InsufficientImages);
        }

        if self.playing {
            self.playing = false;
            self.pause_counter = 0;
            Ok(Toggle::Stopped)
        } else {
            self.playing = true;
            self.pause_counter = 0;
            self.finished = false;
            Ok(Toggle::Started {
                immediate_swap: self.progress >= 1.0,
            })
        }
    }

    /// Record that the engine swapped buffers; restarts progress from zero.
    pub fn on_swapped(&mut self) {
        self.progress = 0.0;
    }

    /// Pin the machine to a fully settled frame (static display).
    pub fn settle(&mut self) {
        self.progress = 1.0;
        self.pause_counter = 0;
    }

    /// Stop playback without touching progress.
    pub fn stop(&mut self) {
        self.playing = false;
        self.pause_counter = 0;
    }

    /// Reset to the initial stopped state.
    pub fn reset(&mut self) {
        self.progress = 0.0;
        self.playing = false;
        self.pause_counter = 0;
        self.finished = false;
    }
}

impl Default for MorphState {
    fn default() -> Self {
        Self::new()
    }
}
