//! Fake GPIO and a recording handler for the unit tests

extern crate std;

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use crate::events::SwitchHandler;
use crate::pins::{ColumnLine, Level, RowLine};
use crate::Scancode;

/// Everything that happened on the fake lines, in order.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Call {
    RowInput(usize),
    RowOutput(usize),
    RowLow(usize),
    RowHighZ(usize),
    ColumnInput(usize, bool),
    ColumnRead(usize),
}

#[derive(Debug, Default)]
pub struct Board {
    /// Pressed cells as (row, column)
    pub pressed: Vec<(usize, usize)>,
    pub driven: Option<usize>,
    /// Row currently switched to output mode
    pub output: Option<usize>,
    pub calls: Vec<Call>,
    /// Column reads left to succeed before one fails
    pub fail_after: Option<usize>,
    /// Fail the next attempt to drive this row
    pub fail_drive: Option<usize>,
}

pub type SharedBoard = Rc<RefCell<Board>>;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PinFault;

pub struct FakeRow {
    index: usize,
    board: SharedBoard,
}

impl RowLine for FakeRow {
    type Error = PinFault;

    fn configure_input(&mut self) -> Result<(), PinFault> {
        self.board.borrow_mut().calls.push(Call::RowInput(self.index));
        Ok(())
    }

    fn set_output(&mut self) -> Result<(), PinFault> {
        let mut board = self.board.borrow_mut();
        board.calls.push(Call::RowOutput(self.index));
        board.output = Some(self.index);
        Ok(())
    }

    fn drive_low(&mut self) -> Result<(), PinFault> {
        let mut board = self.board.borrow_mut();
        board.calls.push(Call::RowLow(self.index));
        if board.fail_drive == Some(self.index) {
            board.fail_drive = None;
            return Err(PinFault);
        }
        board.driven = Some(self.index);
        Ok(())
    }

    fn set_high_impedance(&mut self) -> Result<(), PinFault> {
        let mut board = self.board.borrow_mut();
        board.calls.push(Call::RowHighZ(self.index));
        if board.driven == Some(self.index) {
            board.driven = None;
        }
        if board.output == Some(self.index) {
            board.output = None;
        }
        Ok(())
    }
}

pub struct FakeColumn {
    index: usize,
    board: SharedBoard,
}

impl ColumnLine for FakeColumn {
    type Error = PinFault;

    fn configure_input(&mut self, pull_up: bool) -> Result<(), PinFault> {
        self.board
            .borrow_mut()
            .calls
            .push(Call::ColumnInput(self.index, pull_up));
        Ok(())
    }

    fn read(&mut self) -> Result<Level, PinFault> {
        let mut board = self.board.borrow_mut();
        board.calls.push(Call::ColumnRead(self.index));
        match board.fail_after {
            Some(0) => {
                board.fail_after = None;
                return Err(PinFault);
            }
            Some(n) => board.fail_after = Some(n - 1),
            None => {}
        }
        let closed = board
            .driven
            .map_or(false, |row| board.pressed.contains(&(row, self.index)));
        Ok(if closed { Level::Low } else { Level::High })
    }
}

pub fn board<const ROWS: usize, const COLS: usize>(
) -> (SharedBoard, [FakeRow; ROWS], [FakeColumn; COLS]) {
    let board = SharedBoard::default();
    let rows = core::array::from_fn(|index| FakeRow {
        index,
        board: board.clone(),
    });
    let cols = core::array::from_fn(|index| FakeColumn {
        index,
        board: board.clone(),
    });
    (board, rows, cols)
}

/// Keeps every payload handed to it.
#[derive(Debug, Default)]
pub struct Recorder {
    pub closed: Vec<Vec<Scancode>>,
    pub opened: Vec<Vec<Scancode>>,
}

impl Recorder {
    pub fn all_closed(&self) -> Vec<Scancode> {
        self.closed.concat()
    }

    pub fn all_opened(&self) -> Vec<Scancode> {
        self.opened.concat()
    }

    pub fn clear(&mut self) {
        self.closed.clear();
        self.opened.clear();
    }
}

impl SwitchHandler for Recorder {
    fn switches_closed(&mut self, scancodes: &[Scancode]) {
        self.closed.push(scancodes.to_vec());
    }

    fn switches_opened(&mut self, scancodes: &[Scancode]) {
        self.opened.push(scancodes.to_vec());
    }
}
