//! Loading spinner

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    current_frame: usize,
    last_update: Instant,
    interval: Duration,
}

impl Spinner {
    pub fn dots() -> Self {
        Self {
            frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            current_frame: 0,
            last_update: Instant::now(),
            interval: Duration::from_millis(80),
        }
    }

    pub fn tick(&mut self) {
        if self.last_update.elapsed() >= self.interval {
            self.advance();
            self.last_update = Instant::now();
        }
    }

    fn advance(&mut self) {
        self.current_frame = (self.current_frame + 1) % self.frames.len();
    }

    pub fn frame(&self) -> &'static str {
        self.frames[self.current_frame]
    }
}

impl Default for Spinner {
    fn default() -> Self {
        Self::dots()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_wraps() {
        let mut spinner = Spinner::dots();
        let first = spinner.frame();
        for _ in 0..10 {
            spinner.advance();
        }
        assert_eq!(spinner.frame(), first);
    }
}
