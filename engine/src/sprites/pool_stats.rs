use std::fmt;

/// Snapshot of a sprite pool's occupancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolStats {
    pub capacity: usize,
    pub allocated: usize,
    pub free: usize,
    pub growth_events: usize,
}

impl PoolStats {
    pub fn occupancy(&self) -> f32 {
        if self.capacity == 0 {
            return 0.0;
        }

        self.allocated as f32 / self.capacity as f32
    }
}

impl fmt::Display for PoolStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} / {} sprites ({} free, grown {} times)",
            self.allocated, self.capacity, self.free, self.growth_events
        )
    }
}
