/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
use std::io::{self, BufRead, Write};

/// The host terminal driven by the [CbmConsole][super::CbmConsole].
///
/// Positions are `(column, row)` pairs counted from `0`. Sizes are `(columns, rows)` pairs.
///
/// The cursor motion methods have default implementations built on [HostConsole::cursor_position],
/// [HostConsole::set_cursor_position], [HostConsole::size] and [HostConsole::newline]. Hosts that
/// can't be queried for the cursor position should override them.
pub trait HostConsole {
    /// Writes a printable character at the cursor and advances the cursor.
    fn write_glyph(&mut self, glyph: u8) -> io::Result<()>;
    /// Moves the cursor to the beginning of the next line, scrolling if necessary.
    fn newline(&mut self) -> io::Result<()>;
    /// Clears the whole screen and moves the cursor to the top left corner.
    fn clear(&mut self) -> io::Result<()>;
    /// Turns the reverse video attribute of the subsequent characters on or off.
    fn set_reverse(&mut self, reverse: bool) -> io::Result<()>;
    /// Reads one line of the host input, blocking if necessary, and appends it to `line`
    /// including the line terminator.
    ///
    /// Returns the number of bytes read. `0` indicates the end of the host input.
    fn read_line(&mut self, line: &mut Vec<u8>) -> io::Result<usize>;
    /// Returns the current cursor position.
    fn cursor_position(&mut self) -> io::Result<(u16, u16)>;
    /// Moves the cursor to the given position.
    fn set_cursor_position(&mut self, column: u16, row: u16) -> io::Result<()>;
    /// Returns the size of the screen.
    fn size(&mut self) -> io::Result<(u16, u16)>;
    /// Flushes the pending output.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
    /// Moves the cursor one column left.
    ///
    /// At the first column the cursor moves to the last column of the previous row, unless
    /// it's already in the first row.
    fn cursor_left(&mut self) -> io::Result<()> {
        let (column, row) = self.cursor_position()?;
        if column > 0 {
            self.set_cursor_position(column - 1, row)
        }
        else if row > 0 {
            let (columns, _) = self.size()?;
            self.set_cursor_position(columns.saturating_sub(1), row - 1)
        }
        else {
            Ok(())
        }
    }
    /// Moves the cursor one column right.
    ///
    /// At the last column the cursor moves to the next line.
    fn cursor_right(&mut self) -> io::Result<()> {
        let (column, row) = self.cursor_position()?;
        let (columns, _) = self.size()?;
        if column + 1 < columns {
            self.set_cursor_position(column + 1, row)
        }
        else {
            self.newline()
        }
    }
    /// Moves the cursor one row up, unless it's already in the first row.
    fn cursor_up(&mut self) -> io::Result<()> {
        let (column, row) = self.cursor_position()?;
        if row > 0 {
            self.set_cursor_position(column, row - 1)
        }
        else {
            Ok(())
        }
    }
    /// Moves the cursor to the next line preserving the column.
    fn cursor_down(&mut self) -> io::Result<()> {
        let (column, _) = self.cursor_position()?;
        self.newline()?;
        let (_, row) = self.cursor_position()?;
        self.set_cursor_position(column, row)
    }
    /// Moves the cursor to the top left corner.
    fn home(&mut self) -> io::Result<()> {
        self.set_cursor_position(0, 0)
    }
}

/// A host console writing ANSI (VT100) escape sequences to `W` and reading lines from `R`.
///
/// The output stream can't be queried for the cursor position, so the cursor motion is
/// expressed with relative escape sequences and the terminal is responsible for the
/// clamping at the screen edges.
#[derive(Debug)]
pub struct AnsiConsole<W, R> {
    pub writer: W,
    pub reader: R,
}

/// An [AnsiConsole] connected to the process standard output and input.
///
/// The cursor motion doesn't wrap at the screen edges. Moving left from the first column
/// leaves the cursor where the terminal clamps it instead of going to the end of the previous
/// row. Use a host that reports its cursor position, like [TextScreen][super::TextScreen],
/// for the wrapping motion.
pub type StdioConsole = AnsiConsole<io::Stdout, io::BufReader<io::Stdin>>;

const CSI_LEFT: &[u8]    = b"\x1B[D";
const CSI_RIGHT: &[u8]   = b"\x1B[C";
const CSI_UP: &[u8]      = b"\x1B[A";
const CSI_DOWN: &[u8]    = b"\x1B[B";
const CSI_HOME: &[u8]    = b"\x1B[H";
const CSI_CLEAR: &[u8]   = b"\x1B[2J\x1B[H";
const SGR_REVERSE: &[u8] = b"\x1B[7m";
const SGR_RESET: &[u8]   = b"\x1B[m";

impl<W, R> AnsiConsole<W, R> {
    pub fn new(writer: W, reader: R) -> Self {
        AnsiConsole { writer, reader }
    }

    pub fn into_inner(self) -> (W, R) {
        (self.writer, self.reader)
    }
}

impl StdioConsole {
    /// Creates a console on the process standard output and input.
    pub fn stdio() -> Self {
        AnsiConsole::new(io::stdout(), io::BufReader::new(io::stdin()))
    }
}

fn unsupported(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{} is not supported by an ANSI stream", what))
}

impl<W: Write, R: BufRead> HostConsole for AnsiConsole<W, R> {
    fn write_glyph(&mut self, glyph: u8) -> io::Result<()> {
        self.writer.write_all(&[glyph])
    }

    fn newline(&mut self) -> io::Result<()> {
        self.writer.write_all(b"\n")
    }

    fn clear(&mut self) -> io::Result<()> {
        self.writer.write_all(CSI_CLEAR)
    }

    fn set_reverse(&mut self, reverse: bool) -> io::Result<()> {
        self.writer.write_all(if reverse { SGR_REVERSE } else { SGR_RESET })
    }

    fn read_line(&mut self, line: &mut Vec<u8>) -> io::Result<usize> {
        self.reader.read_until(b'\n', line)
    }

    fn cursor_position(&mut self) -> io::Result<(u16, u16)> {
        Err(unsupported("querying the cursor position"))
    }

    fn set_cursor_position(&mut self, column: u16, row: u16) -> io::Result<()> {
        write!(self.writer, "\x1B[{};{}H", u32::from(row) + 1, u32::from(column) + 1)
    }

    fn size(&mut self) -> io::Result<(u16, u16)> {
        Err(unsupported("querying the screen size"))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    fn cursor_left(&mut self) -> io::Result<()> {
        self.writer.write_all(CSI_LEFT)
    }

    fn cursor_right(&mut self) -> io::Result<()> {
        self.writer.write_all(CSI_RIGHT)
    }

    fn cursor_up(&mut self) -> io::Result<()> {
        self.writer.write_all(CSI_UP)
    }

    fn cursor_down(&mut self) -> io::Result<()> {
        self.writer.write_all(CSI_DOWN)
    }

    fn home(&mut self) -> io::Result<()> {
        self.writer.write_all(CSI_HOME)
    }
}
