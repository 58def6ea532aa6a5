/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! The Commodore console emulator.
//!
//! [CbmConsole] interprets the characters printed by the emulated machine, translating the
//! PETSCII control codes to the cursor motion, screen clearing and reverse video effects of
//! a [HostConsole]. In the other direction it feeds the lines typed on the host, and the
//! text injected by the host application, to the emulated machine one byte at a time.
use core::fmt;
use std::error::Error;
use std::io;

use bitflags::bitflags;
use log::{debug, warn};

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use cbmhost_core::petscii;

mod buffer;
mod host;
mod screen;

pub use buffer::*;
pub use host::*;
pub use screen::*;

/// The maximum number of bytes of a single host input line passed to the emulated machine,
/// not counting the end of line code.
pub const MAX_LINE_LENGTH: usize = KEYSTROKE_BUFFER_SIZE - 1;

bitflags! {
    /// The state flags of the [CbmConsole].
    #[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "snapshot", serde(from = "u8", into = "u8"))]
    #[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct ConsoleFlags: u8 {
        /// The next `CLEAR` code will be ignored.
        const SUPPRESS_FIRST_CLEAR = 0b001;
        /// The next `HOME` code will be ignored.
        const SUPPRESS_NEXT_HOME   = 0b010;
        /// The reverse video is active.
        const REVERSE              = 0b100;
    }
}

/// The [CbmConsole] configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(default, rename_all = "camelCase"))]
pub struct ConsoleConfig {
    /// Ignore the first `CLEAR` code, so the host terminal content survives the machine reset.
    pub suppress_first_clear: bool,
    /// The code appended to every host input line.
    pub end_of_line: u8,
}

/// The error returned by [CbmConsole::read_input_byte].
#[derive(Debug)]
pub enum ConsoleError {
    /// The host input has ended, no more keystrokes will ever arrive.
    EndOfInput,
    /// Reading the host input failed.
    Io(io::Error),
}

/// The console emulator connecting the emulated machine's character I/O with a host console.
#[derive(Debug)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(rename_all = "camelCase"))]
pub struct CbmConsole<H> {
    /// The host console.
    #[cfg_attr(feature = "snapshot", serde(skip))]
    pub host: H,
    buffer: KeystrokeBuffer,
    flags: ConsoleFlags,
    end_of_line: u8,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        ConsoleConfig {
            suppress_first_clear: true,
            end_of_line: petscii::RETURN
        }
    }
}

impl fmt::Display for ConsoleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleError::EndOfInput => f.write_str("the host input has ended"),
            ConsoleError::Io(e) => write!(f, "the host input failed: {}", e)
        }
    }
}

impl Error for ConsoleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ConsoleError::Io(e) => Some(e),
            _ => None
        }
    }
}

impl From<io::Error> for ConsoleError {
    fn from(e: io::Error) -> Self {
        ConsoleError::Io(e)
    }
}

impl From<u8> for ConsoleFlags {
    fn from(flags: u8) -> Self {
        ConsoleFlags::from_bits_truncate(flags)
    }
}

impl From<ConsoleFlags> for u8 {
    fn from(flags: ConsoleFlags) -> Self {
        flags.bits()
    }
}

impl<H: Default> Default for CbmConsole<H> {
    fn default() -> Self {
        CbmConsole::new(H::default(), ConsoleConfig::default())
    }
}

impl<H> CbmConsole<H> {
    pub fn new(host: H, config: ConsoleConfig) -> Self {
        let mut flags = ConsoleFlags::empty();
        flags.set(ConsoleFlags::SUPPRESS_FIRST_CLEAR, config.suppress_first_clear);
        CbmConsole {
            host,
            buffer: KeystrokeBuffer::default(),
            flags,
            end_of_line: config.end_of_line
        }
    }

    pub fn into_host(self) -> H {
        self.host
    }
    /// Returns `true` if the reverse video is active.
    pub fn is_reverse(&self) -> bool {
        self.flags.contains(ConsoleFlags::REVERSE)
    }

    pub fn flags(&self) -> ConsoleFlags {
        self.flags
    }
    /// Returns a reference to the keystroke buffer.
    pub fn buffer(&self) -> &KeystrokeBuffer {
        &self.buffer
    }
    /// Queues `text` to be read by the emulated machine as if it was typed.
    ///
    /// Returns the number of bytes queued. If the keystroke buffer fills up the remaining bytes
    /// are dropped.
    pub fn inject_text(&mut self, text: &[u8]) -> usize {
        let count = self.buffer.push_slice(text);
        if count < text.len() {
            debug!("keystroke buffer full, dropped {} bytes", text.len() - count);
        }
        count
    }
}

impl<H: HostConsole> CbmConsole<H> {
    /// Interprets a single character printed by the emulated machine.
    ///
    /// If `suppress_next_home` is `true` the next `HOME` code will be ignored.
    ///
    /// The host console errors are logged and otherwise ignored.
    pub fn write_output_byte(&mut self, byte: u8, suppress_next_home: bool) {
        if suppress_next_home {
            self.flags.insert(ConsoleFlags::SUPPRESS_NEXT_HOME);
        }
        if let Err(e) = self.dispatch(byte) {
            warn!("console output of 0x{:02x} failed: {}", byte, e);
        }
    }
    /// Turns the reverse video on, unless it's already active.
    pub fn reverse_on(&mut self) {
        if let Err(e) = self.set_reverse(true) {
            warn!("console reverse on failed: {}", e);
        }
    }
    /// Turns the reverse video off, unless it's not active.
    pub fn reverse_off(&mut self) {
        if let Err(e) = self.set_reverse(false) {
            warn!("console reverse off failed: {}", e);
        }
    }
    /// Returns the next character typed on the host.
    ///
    /// If no keystrokes are queued, this reads a whole line from the host console, blocking if
    /// necessary. The line terminator is replaced with the end of line code and the host cursor
    /// is moved back up, because the emulated machine will echo the line itself.
    ///
    /// # Errors
    /// [ConsoleError::EndOfInput] if the host input has ended, [ConsoleError::Io] if reading
    /// the host input failed.
    pub fn read_input_byte(&mut self) -> Result<u8, ConsoleError> {
        if self.buffer.is_empty() {
            self.read_host_line()?;
        }
        self.buffer.pop().ok_or(ConsoleError::EndOfInput)
    }

    fn read_host_line(&mut self) -> Result<(), ConsoleError> {
        if let Err(e) = self.host.flush() {
            warn!("console flush failed: {}", e);
        }
        let mut line = Vec::with_capacity(KEYSTROKE_BUFFER_SIZE);
        if self.host.read_line(&mut line)? == 0 {
            return Err(ConsoleError::EndOfInput)
        }
        if line.last() == Some(&b'\n') {
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
        }
        line.truncate(MAX_LINE_LENGTH);
        line.push(self.end_of_line);
        self.buffer.push_slice(&line);
        if let Err(e) = self.host.cursor_up() {
            warn!("console cursor up failed: {}", e);
        }
        Ok(())
    }

    fn set_reverse(&mut self, reverse: bool) -> io::Result<()> {
        if self.is_reverse() != reverse {
            self.host.set_reverse(reverse)?;
            self.flags.set(ConsoleFlags::REVERSE, reverse);
        }
        Ok(())
    }

    fn dispatch(&mut self, byte: u8) -> io::Result<()> {
        match byte {
            petscii::RETURN => {
                self.host.newline()?;
                self.set_reverse(false)
            }
            b if petscii::is_printable(b) => self.host.write_glyph(b),
            petscii::CURSOR_LEFT => self.host.cursor_left(),
            petscii::CURSOR_RIGHT => self.host.cursor_right(),
            petscii::CURSOR_UP => self.host.cursor_up(),
            petscii::CURSOR_DOWN => self.host.cursor_down(),
            petscii::HOME => {
                if self.flags.contains(ConsoleFlags::SUPPRESS_NEXT_HOME) {
                    self.flags.remove(ConsoleFlags::SUPPRESS_NEXT_HOME);
                    Ok(())
                }
                else {
                    self.host.home()
                }
            }
            petscii::CLEAR => {
                if self.flags.contains(ConsoleFlags::SUPPRESS_FIRST_CLEAR) {
                    self.flags.remove(ConsoleFlags::SUPPRESS_FIRST_CLEAR);
                    Ok(())
                }
                else {
                    self.host.clear()
                }
            }
            petscii::REVERSE_ON => self.set_reverse(true),
            petscii::REVERSE_OFF => self.set_reverse(false),
            _ => Ok(())
        }
    }
}
