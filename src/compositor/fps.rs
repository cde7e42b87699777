// Frame rate and flush volume counter
use std::time::{Duration, Instant};

/// Rolling frame counter, reporting every `report_interval`
pub struct FrameCounter {
    last_report: Instant,
    frame_count: u32,
    /// Scanlines flushed since the last report
    lines: usize,
    current_fps: f64,
    /// Average lines flushed per frame over the last interval
    current_lines: f64,
    report_interval: Duration,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(report_interval: Duration) -> Self {
        Self {
            last_report: Instant::now(),
            frame_count: 0,
            lines: 0,
            current_fps: 0.0,
            current_lines: 0.0,
            report_interval,
        }
    }

    /// Call this after each frame
    /// Returns Some(fps) if a new measurement is available
    pub fn tick(&mut self, lines_flushed: usize) -> Option<f64> {
        self.frame_count += 1;
        self.lines += lines_flushed;

        let elapsed = self.last_report.elapsed();
        if elapsed >= self.report_interval {
            self.current_fps = self.frame_count as f64 / elapsed.as_secs_f64();
            self.current_lines = self.lines as f64 / self.frame_count as f64;
            self.frame_count = 0;
            self.lines = 0;
            self.last_report = Instant::now();
            Some(self.current_fps)
        } else {
            None
        }
    }

    /// Get the last calculated FPS
    pub fn fps(&self) -> f64 {
        self.current_fps
    }

    pub fn lines_per_frame(&self) -> f64 {
        self.current_lines
    }
}

impl Default for FrameCounter {
    fn default() -> Self {
        Self::new()
    }
}
