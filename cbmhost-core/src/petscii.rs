/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! PETSCII control codes interpreted by the console.
pub const RETURN: u8        = 0x0D;
pub const CURSOR_DOWN: u8   = 0x11;
pub const REVERSE_ON: u8    = 0x12;
pub const HOME: u8          = 0x13;
pub const CURSOR_RIGHT: u8  = 0x1D;
pub const CURSOR_UP: u8     = 0x91;
pub const REVERSE_OFF: u8   = 0x92;
pub const CLEAR: u8         = 0x93;
pub const CURSOR_LEFT: u8   = 0x9D;

/// The first printable code passed through to the host as is.
pub const PRINTABLE_FIRST: u8 = 0x20;
/// The last printable code passed through to the host as is.
pub const PRINTABLE_LAST: u8  = 0x7E;

/// Returns `true` if `byte` is a glyph the console passes through unchanged.
#[inline]
pub fn is_printable(byte: u8) -> bool {
    (PRINTABLE_FIRST..=PRINTABLE_LAST).contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn petscii_values() {
        assert_eq!(CURSOR_LEFT, 157);
        assert_eq!(CURSOR_RIGHT, 29);
        assert_eq!(CURSOR_UP, 145);
        assert_eq!(CURSOR_DOWN, 17);
        assert_eq!(HOME, 19);
        assert_eq!(CLEAR, 147);
        assert_eq!(REVERSE_ON, 18);
        assert_eq!(REVERSE_OFF, 146);
        assert!(is_printable(b' '));
        assert!(is_printable(b'~'));
        assert!(!is_printable(0x7F));
        assert!(!is_printable(RETURN));
    }
}
