//! Scans a switch matrix and reports debounced transitions
//!
//! Rows are driven one at a time while every column is sampled. Each sample
//! goes through that switch's debouncer, and confirmed transitions are queued
//! in two bounded batches (closed, opened). A batch that would overflow is
//! flushed to the handler on the spot; whatever is left is flushed at the end
//! of the scan, so every transition is delivered within the scan that
//! confirmed it.

use crate::debounce::{Switch, SwitchState};
use crate::events::{EventBatches, SwitchHandler};
use crate::pins::{ColumnLine, Level, RowLine};
use crate::Scancode;

/// Largest scancode value; scancodes start at 1.
pub const SCANCODE_MAX: usize = 0xFFFF;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Enable the internal pull-up of every column pin
    pub pull_up: bool,
    /// Debounce samples in software, otherwise trust each sample on its own
    pub software_debounce: bool,
    /// Column level read while a switch on the driven row is closed
    pub active_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            pull_up: true,
            software_debounce: true,
            active_level: Level::Low,
        }
    }
}

/// A `ROWS` x `COLS` matrix of switches.
///
/// Scancodes are 1-based in row-major order; for three rows of three:
///
/// ```text
/// +---+---+---+
/// | 1 | 2 | 3 |
/// | 4 | 5 | 6 |
/// | 7 | 8 | 9 |
/// +---+---+---+
/// ```
///
/// `scan` must be called from one place at a steady period, the debounce
/// window is counted in scans.
pub struct SwitchMatrix<
    R,
    C,
    const ROWS: usize,
    const COLS: usize,
    H = (),
    const EVENTS: usize = 10,
> {
    rows: [R; ROWS],
    cols: [C; COLS],
    switches: [[Switch; COLS]; ROWS],
    config: Config,
    handler: H,
    events: EventBatches<EVENTS>,
}

impl<E, R, C, H, const ROWS: usize, const COLS: usize, const EVENTS: usize>
    SwitchMatrix<R, C, ROWS, COLS, H, EVENTS>
where
    R: RowLine<Error = E>,
    C: ColumnLine<Error = E>,
    H: SwitchHandler,
{
    pub const ROW_COUNT: usize = ROWS;
    pub const COL_COUNT: usize = COLS;
    pub const EVENT_BUFFER_SIZE: usize = EVENTS;
    pub const SWITCH_COUNT: usize = ROWS * COLS;

    const VALID: () = {
        assert!(ROWS > 0, "a switch matrix needs at least one row");
        assert!(COLS > 0, "a switch matrix needs at least one column");
        assert!(EVENTS > 0, "event batches need room for at least one scancode");
        assert!(
            ROWS * COLS < SCANCODE_MAX - 1,
            "too many switches for 16-bit scancodes"
        );
    };

    /// Build the matrix. Pins are not touched until [`Self::setup`].
    pub fn new(rows: [R; ROWS], cols: [C; COLS], config: Config, handler: H) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Self::VALID;

        let switches = core::array::from_fn(|row| {
            core::array::from_fn(|col| Switch::new((row * COLS + col + 1) as Scancode))
        });
        SwitchMatrix {
            rows,
            cols,
            switches,
            config,
            handler,
            events: EventBatches::new(),
        }
    }

    /// Configure the pins: rows floating, columns as inputs.
    pub fn setup(&mut self) -> Result<(), E> {
        debug!(
            "setting up {}x{} matrix, pull-up {}, debounce {}",
            ROWS,
            COLS,
            self.config.pull_up,
            self.config.software_debounce
        );
        for row in self.rows.iter_mut() {
            row.configure_input()?;
        }
        for col in self.cols.iter_mut() {
            col.configure_input(self.config.pull_up)?;
        }
        Ok(())
    }

    /// Run one scan cycle over the whole matrix.
    ///
    /// The handler is called from in here. On a pin error the row is
    /// released, pending events are flushed and the error returned.
    pub fn scan(&mut self) -> Result<(), E> {
        let result = self.scan_rows();
        self.events.flush(&mut self.handler);
        result
    }

    fn scan_rows(&mut self) -> Result<(), E> {
        for r in 0..ROWS {
            let sampled = self.drive_row(r).and_then(|()| self.scan_row(r));
            // Released even if driving or sampling failed.
            let released = self.rows[r].set_high_impedance();
            sampled?;
            released?;
        }
        Ok(())
    }

    fn drive_row(&mut self, r: usize) -> Result<(), E> {
        self.rows[r].set_output()?;
        self.rows[r].drive_low()
    }

    fn scan_row(&mut self, r: usize) -> Result<(), E> {
        let debounce = self.config.software_debounce;
        let active_level = self.config.active_level;
        for (col, switch) in self.cols.iter_mut().zip(self.switches[r].iter_mut()) {
            // Sample every switch, even settling ones, to keep scan timing even.
            let pressed = col.read()? == active_level;
            switch.sample(pressed, debounce);
            if let Some(transition) = switch.confirm() {
                trace!("switch {} {}", switch.scancode(), transition);
                self.events
                    .record(transition, switch.scancode(), &mut self.handler);
            }
        }
        Ok(())
    }

    /// Whether the switch is currently confirmed closed.
    ///
    /// Unknown scancodes, including 0, are never closed.
    pub fn is_switch_closed(&self, scancode: Scancode) -> bool {
        self.state(scancode) == Some(SwitchState::Closed)
    }

    /// Confirmed state of a switch, `None` for unknown scancodes.
    pub fn state(&self, scancode: Scancode) -> Option<SwitchState> {
        let (row, col) = Self::position(scancode)?;
        Some(self.switches[row][col].state())
    }

    /// Scancode of the switch at `row`, `col`.
    pub fn scancode(row: usize, col: usize) -> Option<Scancode> {
        if row < ROWS && col < COLS {
            Some((row * COLS + col + 1) as Scancode)
        } else {
            None
        }
    }

    /// Row and column of a scancode.
    pub fn position(scancode: Scancode) -> Option<(usize, usize)> {
        let index = usize::from(scancode).checked_sub(1)?;
        if index >= ROWS * COLS {
            return None;
        }
        Some((index / COLS, index % COLS))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }
}
