/// Simulation step used when the host does not supply its own, in milliseconds.
pub const DEFAULT_STEP_MS: f32 = 1000.0 / 60.0;

/// Most ticks a single frame may produce. Backlog past this is dropped.
pub const MAX_STEPS_PER_FRAME: u32 = 8;

/// Fixed-step accumulator. Frame deltas go in, whole simulation ticks come out.
pub struct StepClock {
    step_ms: f32,
    accumulator: f32,
    pub ticks: u64,
}

impl StepClock {
    pub fn new(step_ms: f32) -> Self {
        Self {
            step_ms: step_ms.max(f32::EPSILON),
            accumulator: 0.0,
            ticks: 0,
        }
    }

    pub fn step_ms(&self) -> f32 {
        self.step_ms
    }

    /// Feed one frame's elapsed time and return how many ticks to run.
    /// Non-finite frame times are ignored.
    pub fn advance(&mut self, frame_ms: f32) -> u32 {
        if frame_ms.is_finite() {
            self.accumulator += frame_ms.max(0.0);
        }
        let mut steps = 0;
        while self.accumulator >= self.step_ms {
            if steps == MAX_STEPS_PER_FRAME {
                self.accumulator = 0.0;
                break;
            }
            self.accumulator -= self.step_ms;
            steps += 1;
        }
        self.ticks += u64::from(steps);
        steps
    }

    /// How far into the next tick the current frame falls, in [0, 1).
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step_ms
    }
}

impl Default for StepClock {
    fn default() -> Self {
        Self::new(DEFAULT_STEP_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_partial_frames() {
        let mut clock = StepClock::new(10.0);
        assert_eq!(clock.advance(4.0), 0);
        assert_eq!(clock.advance(7.0), 1);
        assert!((clock.alpha() - 0.1).abs() < 1e-4);
        assert_eq!(clock.advance(25.0), 2);
        assert_eq!(clock.ticks, 3);
    }

    #[test]
    fn long_or_bogus_frames_are_bounded() {
        let mut clock = StepClock::new(10.0);
        assert_eq!(clock.advance(1e30), MAX_STEPS_PER_FRAME);
        assert_eq!(clock.alpha(), 0.0);
        assert_eq!(clock.advance(f32::INFINITY), 0);
        assert_eq!(clock.advance(f32::NAN), 0);
        assert_eq!(clock.advance(10.0), 1);
    }
}
