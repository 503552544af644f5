//! Frames-per-second readout

/// Counts frames and publishes a new total once per second
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    window_start: Option<f64>,
    frames: u32,
    fps: u32,
}

impl FpsCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a frame at `now` seconds
    ///
    /// Returns the new readout when a full second has elapsed since the last
    /// one, `None` otherwise.
    pub fn tick(&mut self, now: f64) -> Option<u32> {
        let start = *self.window_start.get_or_insert(now);
        self.frames += 1;

        if now - start >= 1.0 {
            self.fps = self.frames;
            self.frames = 0;
            self.window_start = Some(now);
            Some(self.fps)
        } else {
            None
        }
    }

    /// Most recent readout (0 until the first second has passed)
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_readout_within_first_second() {
        let mut fps = FpsCounter::new();
        for i in 0..30 {
            assert_eq!(fps.tick(i as f64 / 60.0), None);
        }
        assert_eq!(fps.fps(), 0);
    }

    #[test]
    fn test_readout_every_second() {
        let mut fps = FpsCounter::new();
        let mut readouts = Vec::new();
        // 60 Hz for a little over three seconds
        for i in 0..=185 {
            if let Some(value) = fps.tick(i as f64 / 60.0) {
                readouts.push(value);
            }
        }
        assert_eq!(readouts, vec![61, 60, 60]);
        assert_eq!(fps.fps(), 60);
    }
}
