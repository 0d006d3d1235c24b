// src/job/progress.rs
// Cosmetic progress estimation while a job polls

/// Monotone progress estimate shown while the server works.
///
/// Climbs in fixed steps to a holding ceiling and jumps to 100 only when
/// the server reports real completion. Purely cosmetic: never consulted as
/// a completion signal.
#[derive(Debug, Clone, Copy)]
pub struct ProgressEstimator {
    value: u8,
    step: u8,
    ceiling: u8,
}

impl ProgressEstimator {
    pub fn new(step: u8, ceiling: u8) -> Self {
        Self {
            value: 0,
            step,
            ceiling: ceiling.min(100),
        }
    }

    pub fn value(&self) -> u8 {
        self.value
    }

    /// One estimator tick. Never decreases and never passes the ceiling.
    pub fn tick(&mut self) -> u8 {
        let next = self.value.saturating_add(self.step).min(self.ceiling);
        if next > self.value {
            self.value = next;
        }
        self.value
    }

    /// Real completion: snap to 100.
    pub fn complete(&mut self) -> u8 {
        self.value = 100;
        self.value
    }
}
