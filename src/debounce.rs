//! Per-switch debounce state machine
//!
//! Every switch keeps one byte of debounce state. The upper bits count the
//! scans since the last confirmed transition (the settle window), the lower
//! bits are a shift register of raw samples, newest sample in bit 0. Raw
//! samples are only admitted once the settle window has elapsed, and a state
//! is only confirmed once every bit of the history agrees.

use crate::Scancode;

/// Scans after a confirmed transition during which raw samples are ignored.
pub const SETTLE_COUNT: u8 = 4;
/// Width of the settle counter.
pub const SETTLE_BITS: u8 = 3;
/// Width of the sample history.
pub const SAMPLE_BITS: u8 = 5;

const SETTLE_SHIFT: u8 = SAMPLE_BITS;
const SETTLE_MASK: u8 = ((1 << SETTLE_BITS) - 1) << SETTLE_SHIFT;
const SAMPLE_MASK: u8 = (1 << SAMPLE_BITS) - 1;

const _: () = assert!(
    SETTLE_COUNT <= (1 << SETTLE_BITS) - 1,
    "SETTLE_COUNT must fit in SETTLE_BITS"
);
const _: () = assert!(
    SETTLE_BITS + SAMPLE_BITS <= 8,
    "settle counter and sample history must share one byte"
);

/// Confirmed logical state of a switch.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SwitchState {
    /// Nothing has been confirmed yet
    #[default]
    Unknown,
    Open,
    Closed,
}

/// A confirmed change of [`SwitchState`] that is reported to the consumer.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Transition {
    Closed,
    Opened,
}

/// Packed settle counter and sample history.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SampleBuffer(u8);

impl SampleBuffer {
    pub const fn new() -> Self {
        SampleBuffer(0)
    }

    pub fn settle_count(self) -> u8 {
        (self.0 & SETTLE_MASK) >> SETTLE_SHIFT
    }

    pub fn history(self) -> u8 {
        self.0 & SAMPLE_MASK
    }

    /// Feed one raw sample through the settle window and into the history.
    pub fn sample(&mut self, pressed: bool) {
        let settle_count = self.settle_count();
        if settle_count < SETTLE_COUNT {
            self.0 = ((settle_count + 1) << SETTLE_SHIFT) | self.history();
        } else {
            self.0 = (settle_count << SETTLE_SHIFT)
                | (SAMPLE_MASK & (self.0 << 1))
                | u8::from(pressed);
        }
    }

    /// Overwrite the whole buffer with a single sample, bypassing debounce.
    pub fn force(&mut self, pressed: bool) {
        self.0 = if pressed { u8::MAX } else { 0 };
    }

    /// Every tracked sample was a press
    pub fn is_closed(self) -> bool {
        self.0 & SAMPLE_MASK == SAMPLE_MASK
    }

    /// Every tracked sample was a release
    pub fn is_open(self) -> bool {
        self.0 & SAMPLE_MASK == 0
    }

    /// Start a new settle window, keeping the history.
    pub fn restart_settle(&mut self) {
        self.0 &= SAMPLE_MASK;
    }
}

/// One cell of the matrix.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Switch {
    scancode: Scancode,
    state: SwitchState,
    samples: SampleBuffer,
}

impl Switch {
    pub const fn new(scancode: Scancode) -> Self {
        Switch {
            scancode,
            state: SwitchState::Unknown,
            samples: SampleBuffer::new(),
        }
    }

    pub fn scancode(&self) -> Scancode {
        self.scancode
    }

    pub fn state(&self) -> SwitchState {
        self.state
    }

    pub fn samples(&self) -> SampleBuffer {
        self.samples
    }

    /// Record a raw sample. With `debounce` off the sample is taken as-is.
    pub fn sample(&mut self, pressed: bool, debounce: bool) {
        if debounce {
            self.samples.sample(pressed);
        } else {
            self.samples.force(pressed);
        }
    }

    /// Check the history and move to a new confirmed state if it is unanimous.
    ///
    /// Returns the transition to report, if any. A confirmed transition
    /// restarts the settle window.
    pub fn confirm(&mut self) -> Option<Transition> {
        let transition = if self.samples.is_closed() && self.state != SwitchState::Closed {
            self.state = SwitchState::Closed;
            Transition::Closed
        } else if self.samples.is_open() && self.state != SwitchState::Open {
            self.state = SwitchState::Open;
            Transition::Opened
        } else {
            return None;
        };
        self.samples.restart_settle();
        Some(transition)
    }
}
