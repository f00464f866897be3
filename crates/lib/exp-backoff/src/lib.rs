//! Exponential backoff calculator.

#![no_std]

use core::time::Duration;

/// Exponential backoff parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Params {
    /// The first delay to hand out, and the delay after a reset.
    pub initial: Duration,

    /// Factor to multiply the current delay to calculate the next one.
    pub factor: u32,

    /// Delay clamp.
    pub max: Duration,
}

/// An exponential backoff state.
#[derive(Debug, Clone)]
pub struct State {
    /// Parameters this state was built from.
    params: Params,

    /// Precomputed delay value to return.
    value: Duration,
}

impl State {
    /// Start a fresh backoff sequence.
    pub const fn new(params: Params) -> Self {
        Self {
            value: params.initial,
            params,
        }
    }

    /// Obtain the stored delay value and precompute next one.
    pub fn advance(&mut self) -> Duration {
        let current = self.value;
        self.value = current
            .saturating_mul(self.params.factor)
            .min(self.params.max);
        current
    }

    /// Peek the stored delay value.
    pub const fn peek(&self) -> Duration {
        self.value
    }

    /// Go back to the initial delay.
    pub fn reset(&mut self) {
        self.value = self.params.initial;
    }
}
