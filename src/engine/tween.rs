//! Time-driven interpolation, advanced by the caller each tick.

use std::f32::consts::PI;

pub const WHITE: u32 = 0xffffff;
pub const RED: u32 = 0xff0000;

pub fn sine_in_out(t: f32) -> f32 {
    if t <= 0.0 {
        0.0
    } else if t >= 1.0 {
        1.0
    } else {
        -0.5 * ((PI * t).cos() - 1.0)
    }
}

/// Per-channel blend of two `0xRRGGBB` colors, `t` in [0, 1].
pub fn lerp_color(from: u32, to: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let channel = |shift: u32| {
        let a = ((from >> shift) & 0xff) as f32;
        let b = ((to >> shift) & 0xff) as f32;
        ((a + (b - a) * t).round() as u32) << shift
    };
    channel(16) | channel(8) | channel(0)
}

/// Tint flash that runs white → red → white a fixed number of times.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorFlash {
    pub from: u32,
    pub to: u32,
    /// Duration of one leg (from→to or back), ms.
    pub leg_ms: f32,
    pub cycles: u32,
    elapsed: f32,
}

impl ColorFlash {
    pub fn new(from: u32, to: u32, leg_ms: f32, cycles: u32) -> Self {
        Self {
            from,
            to,
            leg_ms,
            cycles,
            elapsed: 0.0,
        }
    }

    /// The hit flash: white to red, 100 ms each way, three times.
    pub fn hit() -> Self {
        Self::new(WHITE, RED, 100.0, 3)
    }

    pub fn duration(&self) -> f32 {
        self.leg_ms * 2.0 * self.cycles as f32
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration()
    }

    /// Advance by `dt` ms and return the tint to show.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed = (self.elapsed + dt).min(self.duration());
        self.color()
    }

    pub fn color(&self) -> u32 {
        if self.is_finished() || self.leg_ms <= 0.0 {
            return self.from;
        }
        let cycle = self.leg_ms * 2.0;
        let phase = self.elapsed % cycle;
        let progress = if phase < self.leg_ms {
            phase / self.leg_ms
        } else {
            1.0 - (phase - self.leg_ms) / self.leg_ms
        };
        lerp_color(self.from, self.to, sine_in_out(progress))
    }
}

/// Eased counter from one value to another, e.g. the HUD health bar.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueTween {
    pub from: f32,
    pub to: f32,
    pub duration_ms: f32,
    elapsed: f32,
}

impl ValueTween {
    pub fn new(from: f32, to: f32, duration_ms: f32) -> Self {
        Self {
            from,
            to,
            duration_ms,
            elapsed: 0.0,
        }
    }

    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt).min(self.duration_ms);
        self.value()
    }

    pub fn value(&self) -> f32 {
        if self.is_finished() {
            return self.to;
        }
        let t = sine_in_out(self.elapsed / self.duration_ms);
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_endpoints() {
        assert!(sine_in_out(0.0).abs() < 1e-6);
        assert!((sine_in_out(0.5) - 0.5).abs() < 1e-6);
        assert!((sine_in_out(1.0) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn color_blend() {
        assert_eq!(lerp_color(WHITE, RED, 0.0), WHITE);
        assert_eq!(lerp_color(WHITE, RED, 1.0), RED);
        assert_eq!(lerp_color(WHITE, RED, 0.5), 0xff8080);
    }

    #[test]
    fn hit_flash_peaks_red_each_cycle_and_ends_white() {
        let mut flash = ColorFlash::hit();
        assert_eq!(flash.duration(), 600.0);

        assert_eq!(flash.advance(100.0), RED);
        assert_eq!(flash.advance(100.0), WHITE);
        assert_eq!(flash.advance(100.0), RED);
        assert!(!flash.is_finished());

        assert_eq!(flash.advance(1000.0), WHITE);
        assert!(flash.is_finished());
    }

    #[test]
    fn value_tween_reaches_target() {
        let mut tween = ValueTween::new(100.0, 90.0, 200.0);
        let mid = tween.advance(100.0);
        assert!((mid - 95.0).abs() < 1e-3);
        assert_eq!(tween.advance(500.0), 90.0);
        assert!(tween.is_finished());
    }
}
