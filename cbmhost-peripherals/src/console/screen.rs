/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
use core::fmt;
#[cfg(feature = "snapshot")]
use core::convert::TryFrom;
use std::collections::VecDeque;
use std::io;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use super::host::HostConsole;

/// The default number of columns of a [TextScreen], as of the C64 and the C128 40 column screen.
pub const DEFAULT_COLUMNS: u16 = 40;
/// The default number of rows of a [TextScreen].
pub const DEFAULT_ROWS: u16 = 25;

/// A single character cell of a [TextScreen].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
pub struct Cell {
    pub glyph: u8,
    pub reverse: bool,
}

impl Default for Cell {
    fn default() -> Self {
        Cell { glyph: b' ', reverse: false }
    }
}

/// An in-memory character screen with a cursor.
///
/// Unlike an output stream, the screen knows its cursor position and size, so it uses the
/// default cursor motion of [HostConsole]. Writing past the last column wraps to the next
/// line and a new line at the last row scrolls the screen up.
///
/// The host input is simulated with a queue of lines that are echoed on the screen when read.
/// A windowed renderer can draw the screen from [TextScreen::rows].
#[derive(Clone, Debug)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase", try_from = "TextScreenState"))]
pub struct TextScreen {
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
    cursor: (u16, u16),
    reverse: bool,
    #[cfg_attr(feature = "snapshot", serde(skip))]
    input: VecDeque<Vec<u8>>,
}

/// The error returned when restoring a [TextScreen] with inconsistent dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidScreenError {
    /// One of the dimensions is `0`.
    Empty,
    /// The number of cells doesn't match the dimensions.
    CellCount(usize),
    /// The cursor is outside of the screen.
    Cursor(u16, u16),
}

impl std::error::Error for InvalidScreenError {}

impl fmt::Display for InvalidScreenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidScreenError::Empty => f.write_str("the screen must not be empty"),
            InvalidScreenError::CellCount(count) => write!(f, "wrong number of screen cells: {}", count),
            InvalidScreenError::Cursor(column, row) => write!(f, "cursor ({}, {}) out of the screen", column, row)
        }
    }
}

#[cfg(feature = "snapshot")]
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TextScreenState {
    columns: u16,
    rows: u16,
    cells: Vec<Cell>,
    cursor: (u16, u16),
    reverse: bool,
}

#[cfg(feature = "snapshot")]
impl TryFrom<TextScreenState> for TextScreen {
    type Error = InvalidScreenError;
    fn try_from(state: TextScreenState) -> Result<Self, Self::Error> {
        let TextScreenState { columns, rows, cells, cursor, reverse } = state;
        if columns == 0 || rows == 0 {
            return Err(InvalidScreenError::Empty)
        }
        if cells.len() != usize::from(columns) * usize::from(rows) {
            return Err(InvalidScreenError::CellCount(cells.len()))
        }
        if cursor.0 >= columns || cursor.1 >= rows {
            return Err(InvalidScreenError::Cursor(cursor.0, cursor.1))
        }
        Ok(TextScreen { columns, rows, cells, cursor, reverse, input: VecDeque::new() })
    }
}

impl Default for TextScreen {
    fn default() -> Self {
        TextScreen::new(DEFAULT_COLUMNS, DEFAULT_ROWS)
    }
}

impl TextScreen {
    /// Creates a blank screen of the given size.
    ///
    /// # Panics
    /// Panics if any of the dimensions is `0`.
    pub fn new(columns: u16, rows: u16) -> Self {
        assert!(columns > 0 && rows > 0, "the screen must not be empty");
        let cells = vec![Cell::default(); usize::from(columns) * usize::from(rows)];
        TextScreen { columns, rows, cells, cursor: (0, 0), reverse: false, input: VecDeque::new() }
    }
    /// Returns the cursor position as `(column, row)`.
    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }
    /// Returns `true` if the subsequent characters will be drawn in reverse video.
    pub fn is_reverse(&self) -> bool {
        self.reverse
    }
    /// Returns the cell at the given position.
    pub fn cell(&self, column: u16, row: u16) -> Option<&Cell> {
        if column < self.columns && row < self.rows {
            self.cells.get(self.index(column, row))
        }
        else {
            None
        }
    }
    /// Returns an iterator over the rows of cells.
    pub fn rows(&self) -> impl Iterator<Item=&[Cell]> {
        self.cells.chunks(usize::from(self.columns))
    }
    /// Returns the glyphs of the row with the trailing spaces removed.
    pub fn row_text(&self, row: u16) -> String {
        let text: String = self.rows().nth(usize::from(row))
                                .map(|cells| cells.iter().map(|cell| char::from(cell.glyph)).collect())
                                .unwrap_or_default();
        text.trim_end().to_string()
    }
    /// Queues a line of the simulated host input.
    pub fn push_input_line<L: Into<Vec<u8>>>(&mut self, line: L) {
        self.input.push_back(line.into());
    }

    fn index(&self, column: u16, row: u16) -> usize {
        usize::from(row) * usize::from(self.columns) + usize::from(column)
    }

    fn scroll_up(&mut self) {
        let columns = usize::from(self.columns);
        self.cells.drain(..columns);
        self.cells.resize(columns * usize::from(self.rows), Cell::default());
    }

    fn line_feed(&mut self) {
        let (_, row) = self.cursor;
        if row + 1 < self.rows {
            self.cursor = (0, row + 1);
        }
        else {
            self.scroll_up();
            self.cursor = (0, row);
        }
    }
}

impl HostConsole for TextScreen {
    fn write_glyph(&mut self, glyph: u8) -> io::Result<()> {
        let (column, row) = self.cursor;
        let index = self.index(column, row);
        self.cells[index] = Cell { glyph, reverse: self.reverse };
        if column + 1 < self.columns {
            self.cursor = (column + 1, row);
        }
        else {
            self.line_feed();
        }
        Ok(())
    }

    fn newline(&mut self) -> io::Result<()> {
        self.line_feed();
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        for cell in self.cells.iter_mut() {
            *cell = Cell::default();
        }
        self.cursor = (0, 0);
        Ok(())
    }

    fn set_reverse(&mut self, reverse: bool) -> io::Result<()> {
        self.reverse = reverse;
        Ok(())
    }

    fn read_line(&mut self, line: &mut Vec<u8>) -> io::Result<usize> {
        match self.input.pop_front() {
            Some(input) => {
                for &byte in input.iter().filter(|&&b| b != b'\n' && b != b'\r') {
                    self.write_glyph(byte)?;
                }
                self.line_feed();
                line.extend_from_slice(&input);
                Ok(input.len())
            }
            None => Ok(0)
        }
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        Ok(self.cursor)
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> io::Result<()> {
        self.cursor = (column.min(self.columns - 1), row.min(self.rows - 1));
        Ok(())
    }

    fn size(&mut self) -> io::Result<(u16, u16)> {
        Ok((self.columns, self.rows))
    }
}
