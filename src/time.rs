//! Frame clock: tick counting, FPS estimation, visibility gating.
//!
//! The engine runs off an external display-refresh callback; this clock
//! only counts what happens. While the view is hidden the tick is skipped
//! entirely (no work, no buffer mutation), but the schedule keeps running
//! so animation resumes the moment visibility returns.

use std::time::{Duration, Instant};

/// How often the FPS estimate refreshes.
const FPS_WINDOW: Duration = Duration::from_secs(1);

/// Per-session frame bookkeeping.
#[derive(Debug)]
pub struct FrameClock {
    frame_count: u64,
    visible: bool,
    fps: f32,
    window_start: Instant,
    window_frames: u64,
}

impl FrameClock {
    /// Create a clock for a visible view.
    pub fn new() -> Self {
        Self {
            frame_count: 0,
            visible: true,
            fps: 0.0,
            window_start: Instant::now(),
            window_frames: 0,
        }
    }

    /// Count one frame and refresh the FPS estimate once per second.
    pub fn tick(&mut self, now: Instant) {
        self.frame_count += 1;
        self.window_frames += 1;

        let elapsed = now.duration_since(self.window_start);
        if elapsed >= FPS_WINDOW {
            self.fps = self.window_frames as f32 / elapsed.as_secs_f32();
            self.window_frames = 0;
            self.window_start = now;
        }
    }

    /// Total frames ticked.
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Most recent FPS estimate (0 until the first window completes).
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Whether the view is visible and ticks should run.
    pub fn visible(&self) -> bool {
        self.visible
    }

    /// Record a visibility change.
    pub fn set_visible(&mut self, visible: bool) {
        if visible && !self.visible {
            // Don't let hidden time depress the next FPS estimate.
            self.window_start = Instant::now();
            self.window_frames = 0;
        }
        self.visible = visible;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
