use std::time::Instant;

// Fixed timestep loop, see https://gafferongames.com/post/fix_your_timestep/

/// Host side of the frame loop: fixed-rate simulation updates plus one render per frame.
pub trait FrameHandler {
    fn update(&mut self, time: &FrameTime) -> anyhow::Result<()>;
    fn render(&mut self, _time: &FrameTime) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct FrameLoopConfig {
    pub updates_per_s: u32,
    pub max_frame_time_s: f64,
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            updates_per_s: 60,
            max_frame_time_s: 0.2,
        }
    }
}

pub struct FrameLoop<H: FrameHandler> {
    pub handler: H,
    pub exit_next_frame: bool,

    previous_instant: Instant,
    accumulated_time_s: f64,
    fixed_time_step_s: f64,
    number_of_updates: u64,
    number_of_renders: u64,
    last_frame_time_s: f64,
    running_time_s: f64,
    blending_factor: f64,
    max_frame_time_s: f64,
}

impl<H: FrameHandler> FrameLoop<H> {
    pub fn new(handler: H, config: FrameLoopConfig) -> Self {
        Self {
            handler,
            exit_next_frame: false,

            previous_instant: Instant::now(),
            accumulated_time_s: 0.0,
            fixed_time_step_s: 1.0 / config.updates_per_s.max(1) as f64,
            number_of_updates: 0,
            number_of_renders: 0,
            last_frame_time_s: 0.0,
            running_time_s: 0.0,
            blending_factor: 0.0,
            max_frame_time_s: config.max_frame_time_s,
        }
    }

    pub fn next_frame(&mut self) -> anyhow::Result<FrameLoopResult> {
        if self.exit_next_frame {
            return Ok(FrameLoopResult::Exit);
        }

        let now = Instant::now();
        let elapsed_s = now.duration_since(self.previous_instant).as_secs_f64();
        self.previous_instant = now;

        self.advance(elapsed_s)?;
        Ok(FrameLoopResult::Continue)
    }

    /// Runs the fixed updates that fit into `elapsed_s` (clamped), then renders once.
    #[profiling::function]
    pub fn advance(&mut self, elapsed_s: f64) -> anyhow::Result<()> {
        let elapsed_s = elapsed_s.clamp(0.0, self.max_frame_time_s);

        self.last_frame_time_s = elapsed_s;
        self.running_time_s += elapsed_s;
        self.accumulated_time_s += elapsed_s;

        while self.accumulated_time_s >= self.fixed_time_step_s {
            let time = FrameTime {
                delta_time_s: self.fixed_time_step_s,
                elapsed_time_s: self.running_time_s,
                // Only meaningful for rendering
                blending_factor: 0.0,
            };
            self.handler.update(&time)?;
            self.accumulated_time_s -= self.fixed_time_step_s;
            self.number_of_updates += 1;
        }

        self.blending_factor = self.accumulated_time_s / self.fixed_time_step_s;

        let time = FrameTime {
            delta_time_s: self.last_frame_time_s,
            elapsed_time_s: self.running_time_s,
            blending_factor: self.blending_factor,
        };
        self.handler.render(&time)?;
        self.number_of_renders += 1;

        Ok(())
    }

    pub fn exit(&mut self) {
        self.exit_next_frame = true;
    }

    pub fn last_frame_time_s(&self) -> f64 {
        self.last_frame_time_s
    }

    pub fn running_time_s(&self) -> f64 {
        self.running_time_s
    }

    pub fn blending_factor(&self) -> f64 {
        self.blending_factor
    }

    pub fn number_of_updates(&self) -> u64 {
        self.number_of_updates
    }

    pub fn number_of_renders(&self) -> u64 {
        self.number_of_renders
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoopResult {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameTime {
    pub delta_time_s: f64,
    pub elapsed_time_s: f64,
    pub blending_factor: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHandler {
        updates: Vec<FrameTime>,
        renders: Vec<FrameTime>,
    }

    impl FrameHandler for CountingHandler {
        fn update(&mut self, time: &FrameTime) -> anyhow::Result<()> {
            self.updates.push(*time);
            Ok(())
        }

        fn render(&mut self, time: &FrameTime) -> anyhow::Result<()> {
            self.renders.push(*time);
            Ok(())
        }
    }

    fn frame_loop() -> FrameLoop<CountingHandler> {
        FrameLoop::new(
            CountingHandler::default(),
            FrameLoopConfig {
                updates_per_s: 10,
                max_frame_time_s: 0.5,
            },
        )
    }

    #[test]
    fn test_fixed_updates_accumulate() {
        let mut frame_loop = frame_loop();

        frame_loop.advance(0.25).unwrap();
        assert_eq!(frame_loop.number_of_updates(), 2);
        assert_eq!(frame_loop.number_of_renders(), 1);
        assert!((frame_loop.blending_factor() - 0.5).abs() < 1e-9);

        // Leftover 0.05 s plus 0.1 s makes one more step
        frame_loop.advance(0.1).unwrap();
        assert_eq!(frame_loop.number_of_updates(), 3);
        assert_eq!(frame_loop.handler.renders.len(), 2);

        for update in &frame_loop.handler.updates {
            assert!((update.delta_time_s - 0.1).abs() < 1e-9);
        }
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut frame_loop = frame_loop();

        frame_loop.advance(10.0).unwrap();
        assert_eq!(frame_loop.last_frame_time_s(), 0.5);
        assert_eq!(frame_loop.number_of_updates(), 5);
        assert!((frame_loop.running_time_s() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_exit() {
        let mut frame_loop = frame_loop();
        frame_loop.exit();
        assert_eq!(frame_loop.next_frame().unwrap(), FrameLoopResult::Exit);
        assert_eq!(frame_loop.number_of_renders(), 0);
    }
}
