//! Exponential ease-out toward a scroll target.
//!
//! Each frame closes a fixed fraction of the remaining distance, which gives the visible
//! deceleration of a smooth scroll; once within half a unit the value snaps onto the target.

#[derive(Clone, Debug, PartialEq)]
pub struct SmoothScroll {
    value: f64,
    target: f64,
    /// Fraction of the remaining distance covered per frame.
    speed: f64,
}

impl SmoothScroll {
    #[must_use]
    pub fn new(speed: f64) -> Self {
        Self {
            value: 0.0,
            target: 0.0,
            speed: speed.clamp(0.05, 1.0),
        }
    }

    #[must_use]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Starts animating toward `target`.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
    }

    /// Moves to `value` at once, abandoning any animation.
    pub fn jump_to(&mut self, value: f64) {
        self.value = value;
        self.target = value;
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.value != self.target
    }

    /// Advances one frame. Returns whether the value moved.
    pub fn tick(&mut self) -> bool {
        if !self.is_animating() {
            return false;
        }
        let remaining = self.target - self.value;
        if remaining.abs() <= 0.5 {
            self.value = self.target;
        } else {
            self.value += remaining * self.speed;
        }
        true
    }
}

#[cfg(test)]
#[path = "tests/smooth.rs"]
mod tests;
