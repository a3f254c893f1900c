//! Switch matrix scanning with software debounce
//!
//! A [`matrix::SwitchMatrix`] owns the row and column lines of a keyboard or
//! button matrix. Call [`matrix::SwitchMatrix::scan`] at a fixed period; every
//! debounced press and release is handed to a [`events::SwitchHandler`] as a
//! batch of scancodes before `scan` returns.
//!
//! ```ignore
//! let rows = [OpenDrainRow(row0), OpenDrainRow(row1)];
//! let cols = [InputColumn(col0), InputColumn(col1), InputColumn(col2)];
//! let mut matrix: SwitchMatrix<_, _, 2, 3, _> =
//!     SwitchMatrix::new(rows, cols, Config::default(), MyHandler::default());
//! matrix.setup()?;
//! loop {
//!     matrix.scan()?;
//!     delay.delay_ms(1u32);
//! }
//! ```

#![no_std]

#[macro_use]
mod fmt;

pub mod debounce;
pub mod events;
pub mod matrix;
pub mod pins;

#[cfg(test)]
mod testing;

/// 1-based identifier of a switch, assigned in row-major order.
pub type Scancode = u16;

pub use debounce::{SwitchState, Transition};
pub use events::{Callbacks, SwitchHandler};
pub use matrix::{Config, SwitchMatrix};
pub use pins::{ColumnLine, InputColumn, Level, OpenDrainRow, RowLine};
