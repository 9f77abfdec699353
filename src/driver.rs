//! Host-owned frame driver
//!
//! Turns display-refresh timestamps into elapsed-time ticks for every
//! registered target. Engines never schedule themselves.

use std::collections::VecDeque;

use crate::consts::MAX_FRAME_DT_MS;

/// Anything advanced once per displayed frame
pub trait FrameTarget {
    fn tick(&mut self, elapsed_ms: f32);
}

/// Frames kept for the FPS average
const FPS_WINDOW: usize = 60;

#[derive(Debug, Clone)]
pub struct FrameDriver {
    last_time: Option<f64>,
    max_dt_ms: f32,
    frame_times: VecDeque<f32>,
    frames: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            last_time: None,
            max_dt_ms: MAX_FRAME_DT_MS,
            frame_times: VecDeque::with_capacity(FPS_WINDOW),
            frames: 0,
        }
    }

    /// Forget the previous timestamp so the next frame reports zero elapsed
    /// time (after a tab becomes visible again, for example)
    pub fn reset(&mut self) {
        self.last_time = None;
        self.frame_times.clear();
    }

    /// Elapsed time since the previous frame, clamped to `0..=max_dt_ms`.
    /// The first frame reports zero.
    pub fn elapsed(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_time {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, self.max_dt_ms),
            None => 0.0,
        };
        self.last_time = Some(now_ms);
        dt
    }

    /// Advance one displayed frame: compute elapsed time and tick every
    /// target in order. Returns the elapsed time used.
    pub fn frame(&mut self, now_ms: f64, targets: &mut [&mut dyn FrameTarget]) -> f32 {
        let dt = self.elapsed(now_ms);
        self.frames += 1;
        if dt > 0.0 {
            if self.frame_times.len() == FPS_WINDOW {
                self.frame_times.pop_front();
            }
            self.frame_times.push_back(dt);
        }
        for target in targets.iter_mut() {
            target.tick(dt);
        }
        dt
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Average frames per second over the recent window
    pub fn fps(&self) -> f32 {
        if self.frame_times.is_empty() {
            return 0.0;
        }
        let total: f32 = self.frame_times.iter().sum();
        self.frame_times.len() as f32 * 1000.0 / total
    }
}
