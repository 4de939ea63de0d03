//! Shared utilities

use std::collections::VecDeque;
use std::time::Instant;

// ============================================================================
// Frame Clock
// ============================================================================

/// Scene time plus an FPS counter with rolling average
pub struct FrameClock {
    start: Instant,
    frame_times: VecDeque<f32>,
    last_frame: Instant,
    sample_count: usize,
    frames: u64,
}

impl FrameClock {
    /// Create a new clock with specified FPS sample window
    pub fn new(sample_count: usize) -> Self {
        let now = Instant::now();
        Self {
            start: now,
            frame_times: VecDeque::with_capacity(sample_count),
            last_frame: now,
            sample_count: sample_count.max(1),
            frames: 0,
        }
    }

    /// Milliseconds since the clock was created; drives the noise and sun animation.
    pub fn elapsed_ms(&self) -> f32 {
        self.start.elapsed().as_secs_f32() * 1000.0
    }

    /// Call once per frame to record timing
    /// Returns (delta_time, current_fps, average_fps)
    pub fn tick(&mut self) -> (f32, f32, f32) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(dt)
    }

    fn record(&mut self, dt: f32) -> (f32, f32, f32) {
        self.frames += 1;
        self.frame_times.push_back(dt);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        let current_fps = if dt > 0.0 { 1.0 / dt } else { 0.0 };
        (dt, current_fps, self.average_fps())
    }

    pub fn average_fps(&self) -> f32 {
        let avg_dt = self.avg_frame_time_ms() / 1000.0;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }

    /// Get the average frame time in milliseconds
    pub fn avg_frame_time_ms(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        avg_dt * 1000.0
    }

    /// Total frames ticked since creation
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rolling_average() {
        let mut clock = FrameClock::new(4);
        for _ in 0..4 {
            clock.record(0.02);
        }
        assert!((clock.average_fps() - 50.0).abs() < 1e-2);
        assert!((clock.avg_frame_time_ms() - 20.0).abs() < 1e-3);

        // Old samples fall out of the window
        for _ in 0..4 {
            clock.record(0.01);
        }
        assert!((clock.average_fps() - 100.0).abs() < 1e-2);
        assert_eq!(clock.frame_count(), 8);
    }

    #[test]
    fn test_empty_clock() {
        let clock = FrameClock::new(10);
        assert_eq!(clock.average_fps(), 0.0);
        assert!(clock.elapsed_ms() >= 0.0);
    }

    #[test]
    fn test_zero_delta_reports_zero_fps() {
        let mut clock = FrameClock::new(2);
        let (dt, fps, _) = clock.record(0.0);
        assert_eq!(dt, 0.0);
        assert_eq!(fps, 0.0);
    }
}
