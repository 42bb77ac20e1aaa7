/// Seconds of continued holding between two breaking sounds.
pub const BREAK_SOUND_INTERVAL: f32 = 0.3;

/// Result of holding the break button for one frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum BreakTick {
    /// First frame of a hold; nothing accumulates yet.
    Started,
    /// Still breaking. `damage` is in `0..100`.
    Damaged { damage: f32, play_sound: bool },
    /// Threshold reached; the block must be removed. The timer is reset.
    Broken,
}

/// Hold-to-break timer for the current target.
#[derive(Clone, Debug, Default)]
pub struct BreakProgress {
    breaking: bool,
    elapsed: f32,
    since_sound: f32,
    damage: f32,
}

impl BreakProgress {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_breaking(&self) -> bool {
        self.breaking
    }

    #[inline]
    pub fn damage(&self) -> f32 {
        self.damage
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance by `dt` seconds against a block that takes `threshold` seconds.
    pub fn hold(&mut self, dt: f32, threshold: f32) -> BreakTick {
        if !self.breaking {
            self.breaking = true;
            self.elapsed = 0.0;
            return BreakTick::Started;
        }

        self.elapsed += dt;
        if self.elapsed >= threshold {
            self.elapsed = 0.0;
            self.damage = 0.0;
            return BreakTick::Broken;
        }

        self.damage = self.elapsed / threshold * 100.0;
        let play_sound = if self.since_sound > BREAK_SOUND_INTERVAL {
            self.since_sound = 0.0;
            true
        } else {
            self.since_sound += dt;
            false
        };
        BreakTick::Damaged {
            damage: self.damage,
            play_sound,
        }
    }

    /// Stop holding; progress is discarded.
    pub fn release(&mut self) {
        self.breaking = false;
        self.elapsed = 0.0;
        self.damage = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_hold_only_arms_the_timer() {
        let mut b = BreakProgress::new();
        assert_eq!(b.hold(5.0, 1.0), BreakTick::Started);
        assert!(b.is_breaking());
        assert_eq!(b.elapsed(), 0.0);
    }

    #[test]
    fn damage_is_linear_then_breaks_once() {
        let mut b = BreakProgress::new();
        b.hold(0.0, 1.0);
        match b.hold(0.25, 1.0) {
            BreakTick::Damaged { damage, .. } => assert!((damage - 25.0).abs() < 1e-4),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(b.hold(0.5, 1.0), BreakTick::Damaged { .. }));
        assert_eq!(b.hold(0.25, 1.0), BreakTick::Broken);
        assert_eq!(b.elapsed(), 0.0);
        assert!(b.is_breaking());
        assert!(matches!(b.hold(0.1, 1.0), BreakTick::Damaged { .. }));
    }

    #[test]
    fn release_before_threshold_resets() {
        let mut b = BreakProgress::new();
        b.hold(0.0, 2.0);
        b.hold(1.5, 2.0);
        assert!(b.damage() > 0.0);
        b.release();
        assert_eq!(b.damage(), 0.0);
        assert!(!b.is_breaking());
        assert_eq!(b.hold(1.0, 2.0), BreakTick::Started);
    }

    #[test]
    fn breaking_sound_is_throttled() {
        let mut b = BreakProgress::new();
        b.hold(0.0, 100.0);
        let sounds = (0..60)
            .filter(|_| matches!(b.hold(0.05, 100.0), BreakTick::Damaged { play_sound: true, .. }))
            .count();
        // 3 s of holding with a replay after every 0.3 s accumulated
        assert!((7..=9).contains(&sounds), "{sounds}");
    }
}
