//! GPIO lines driven and sampled by the scanner

use embedded_hal::digital::v2::{InputPin, OutputPin};

/// Digital line level.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    Low,
    High,
}

/// A row line. It is left floating except while its row is being scanned.
pub trait RowLine {
    type Error;

    /// One-time setup: make the line an input so it floats.
    fn configure_input(&mut self) -> Result<(), Self::Error>;

    /// Turn the line into an output before driving it.
    fn set_output(&mut self) -> Result<(), Self::Error>;

    fn drive_low(&mut self) -> Result<(), Self::Error>;

    /// Stop driving the line.
    fn set_high_impedance(&mut self) -> Result<(), Self::Error>;
}

/// A column line, sampled once per row.
pub trait ColumnLine {
    type Error;

    /// One-time setup, optionally enabling the internal pull-up.
    fn configure_input(&mut self, pull_up: bool) -> Result<(), Self::Error>;

    fn read(&mut self) -> Result<Level, Self::Error>;
}

/// Row on an open-drain output pin: high releases the line, low drives it.
///
/// The pin mode itself is fixed when the HAL pin is built, so switching
/// between input and output is a matter of releasing the line.
#[derive(Debug)]
pub struct OpenDrainRow<P>(pub P);

impl<P: OutputPin> RowLine for OpenDrainRow<P> {
    type Error = P::Error;

    fn configure_input(&mut self) -> Result<(), P::Error> {
        self.0.set_high()
    }

    fn set_output(&mut self) -> Result<(), P::Error> {
        Ok(())
    }

    fn drive_low(&mut self) -> Result<(), P::Error> {
        self.0.set_low()
    }

    fn set_high_impedance(&mut self) -> Result<(), P::Error> {
        self.0.set_high()
    }
}

/// Column on an input pin whose pull resistor was chosen when the HAL pin was built.
///
/// `configure_input` ignores its `pull_up` argument, so `Config::pull_up`
/// has no effect on this adapter: build the HAL pin as a pull-up input (or a
/// floating one with external pull-ups) instead. Implement [`ColumnLine`]
/// directly for pins whose pull resistor can be switched at runtime.
#[derive(Debug)]
pub struct InputColumn<P>(pub P);

impl<P: InputPin> ColumnLine for InputColumn<P> {
    type Error = P::Error;

    /// Does nothing; the pull resistor is part of the HAL pin's type.
    fn configure_input(&mut self, _pull_up: bool) -> Result<(), P::Error> {
        Ok(())
    }

    fn read(&mut self) -> Result<Level, P::Error> {
        Ok(if self.0.is_low()? {
            Level::Low
        } else {
            Level::High
        })
    }
}
