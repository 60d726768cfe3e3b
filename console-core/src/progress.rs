//! Cosmetic progress estimate for long storefront runs. It never reaches 100
//! on its own; only a successful settle does.

pub const SEED_PERCENT: u8 = 8;
pub const CEILING_PERCENT: u8 = 92;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProgressSimulator {
    percent: u8,
    running: bool,
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn start(&mut self) {
        self.running = true;
        self.percent = SEED_PERCENT;
    }

    /// Advances by a step that shrinks as the bar fills. No-op once settled.
    pub fn tick(&mut self) -> u8 {
        if !self.running || self.percent >= CEILING_PERCENT {
            return self.percent;
        }
        let bump = match self.percent {
            0..=39 => 6,
            40..=69 => 4,
            _ => 2,
        };
        self.percent = (self.percent + bump).min(CEILING_PERCENT);
        self.percent
    }

    pub fn finish(&mut self, success: bool) {
        self.running = false;
        self.percent = if success { 100 } else { 0 };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn climbs_monotonically_below_ceiling() {
        let mut p = ProgressSimulator::new();
        p.start();
        assert_eq!(p.percent(), SEED_PERCENT);

        let mut last = p.percent();
        for _ in 0..200 {
            let now = p.tick();
            assert!(now >= last);
            assert!(now < 100);
            last = now;
        }
        assert_eq!(last, CEILING_PERCENT);
    }

    #[test]
    fn step_size_decelerates() {
        let mut p = ProgressSimulator::new();
        p.start();
        assert_eq!(p.tick(), 14);
        while p.percent() < 40 {
            p.tick();
        }
        let before = p.percent();
        assert_eq!(p.tick(), before + 4);
        while p.percent() < 70 {
            p.tick();
        }
        let before = p.percent();
        assert_eq!(p.tick(), before + 2);
    }

    #[test]
    fn settles_to_full_or_empty() {
        let mut p = ProgressSimulator::new();
        p.start();
        p.tick();
        p.finish(true);
        assert_eq!(p.percent(), 100);
        assert!(!p.is_running());
        assert_eq!(p.tick(), 100);

        p.start();
        p.tick();
        p.finish(false);
        assert_eq!(p.percent(), 0);
        assert_eq!(p.tick(), 0);
    }
}
