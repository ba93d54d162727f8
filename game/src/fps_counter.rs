use std::{
    collections::VecDeque,
    time::{Duration, Instant},
};

const MEASUREMENTS: usize = 120;

pub struct FpsCounter {
    frame_durations: VecDeque<Duration>,
    last_frame_time: Instant,
}

impl FpsCounter {
    pub fn new() -> Self {
        FpsCounter {
            frame_durations: VecDeque::with_capacity(MEASUREMENTS),
            last_frame_time: Instant::now(),
        }
    }

    pub fn tick(&mut self) {
        let now = Instant::now();
        let delta = now.duration_since(self.last_frame_time);
        self.last_frame_time = now;
        self.record(delta);
    }

    fn record(&mut self, delta: Duration) {
        if self.frame_durations.len() == MEASUREMENTS {
            self.frame_durations.pop_front();
        }
        self.frame_durations.push_back(delta);
    }

    pub fn average_frame_time(&self) -> Duration {
        if self.frame_durations.is_empty() {
            // Default to 60 FPS-equivalent frame time, to avoid division by zero
            return Duration::from_millis(16);
        }

        let sum: Duration = self.frame_durations.iter().sum();
        sum / (self.frame_durations.len() as u32)
    }

    pub fn fps(&self) -> f32 {
        let average = self.average_frame_time().as_secs_f32();
        if average <= 0.0 {
            return 0.0;
        }
        1.0 / average
    }
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}
