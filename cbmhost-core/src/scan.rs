/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Commodore 128 keyboard scan codes.
//!
//! A scan code is the index of a key in the C128 keyboard matrix as seen by the KERNAL
//! keyboard scan routine: `column * 8 + row` for the 64 keys shared with the C64 and the
//! VIC-20, followed by the 24 extra C128 keys wired to the `K0`-`K2` lines.
//!
//! ```text
//!    0*8 1*8 2*8 3*8 4*8 5*8 6*8 7*8 K0  K1  K2
//! +0 DEL 3#  5%  7'  9)  +   £|  1!  Hlp ESC Alt
//! +1 RET W   R   Y   I   P   *   LAr 8   +   0
//! +2 Rt  A   D   G   J   L   ;]  Ctl 5   -   .
//! +3 F7  4$  6&  8(  0   -   Hme 2"  Tab Lf  Up
//! +4 F1  Z   C   B   M   .>  RSh Spc 2   Ent Down
//! +5 F3  S   F   H   K   :[  =   C=  4   6   Lt
//! +6 F5  E   T   U   O   @   UpA Q   7   9   Rt
//! +7 Dn  LSh X   V   N   ,<  /?  Stp 1   3   NoScroll
//! ```
use core::fmt;
use core::convert::TryFrom;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use bitflags::bitflags;

/// A number of distinct scan codes, including [ScanCode::NO_KEY].
pub const SCAN_CODE_COUNT: usize = 89;

/// A flag added to a raw scan code when the `RESTORE` key is being held.
pub const RESTORE_FLAG: u16 = 0x400;

/// A single Commodore 128 keyboard matrix code.
///
/// The C64 and the VIC-20 codes are derived from these with
/// [MachineModel::encode][crate::MachineModel::encode].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "snapshot", serde(try_from = "u8", into = "u8"))]
pub struct ScanCode(u8);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TryFromU8ScanCodeError(pub u8);

macro_rules! scan_codes {
    ($($name:ident = $code:expr;)*) => {
        #[allow(missing_docs)]
        impl ScanCode {
            $(pub const $name: ScanCode = ScanCode($code);)*
        }
        const SCAN_CODE_NAMES: [&str; SCAN_CODE_COUNT] = [$(stringify!($name)),*];
        #[cfg(test)]
        const ALL_SCAN_CODES: [ScanCode; SCAN_CODE_COUNT] = [$(ScanCode::$name),*];
    };
}

scan_codes! {
    BACKSPACE = 0;
    RETURN = 1;
    RIGHT = 2;
    F7 = 3;
    F1 = 4;
    F3 = 5;
    F5 = 6;
    DOWN = 7;
    N3 = 8;
    W = 9;
    A = 10;
    N4 = 11;
    Z = 12;
    S = 13;
    E = 14;
    LSHIFT = 15;
    N5 = 16;
    R = 17;
    D = 18;
    N6 = 19;
    C = 20;
    F = 21;
    T = 22;
    X = 23;
    N7 = 24;
    Y = 25;
    G = 26;
    N8 = 27;
    B = 28;
    H = 29;
    U = 30;
    V = 31;
    N9 = 32;
    I = 33;
    J = 34;
    N0 = 35;
    M = 36;
    K = 37;
    O = 38;
    N = 39;
    PLUS = 40;
    P = 41;
    L = 42;
    MINUS = 43;
    PERIOD = 44;
    COLON = 45;
    AT = 46;
    COMMA = 47;
    POUND = 48;
    ASTERISK = 49;
    SEMICOLON = 50;
    HOME = 51;
    RSHIFT = 52;
    EQUALS = 53;
    UPARROW = 54;
    SLASH = 55;
    N1 = 56;
    LTARROW = 57;
    CTRL = 58;
    N2 = 59;
    SPACE = 60;
    COMMODORE = 61;
    Q = 62;
    STOP = 63;
    HELP = 64;
    NUM_8 = 65;
    NUM_5 = 66;
    TAB = 67;
    NUM_2 = 68;
    NUM_4 = 69;
    NUM_7 = 70;
    NUM_1 = 71;
    ESC = 72;
    NUM_PLUS = 73;
    NUM_MINUS = 74;
    LINE_FEED = 75;
    ENTER = 76;
    NUM_6 = 77;
    NUM_9 = 78;
    NUM_3 = 79;
    ALT = 80;
    NUM_0 = 81;
    NUM_DECIMAL = 82;
    CURSOR_UP = 83;
    CURSOR_DOWN = 84;
    CURSOR_LEFT = 85;
    CURSOR_RIGHT = 86;
    NO_SCROLL = 87;
    NO_KEY = 88;
}

bitflags! {
    /// Extra effects of a key mapping beyond asserting its own scan code.
    ///
    /// These reconcile the host keyboard layout with the Commodore one, e.g. a host `"`
    /// is reached with `SHIFT`+`'` but on the Commodore keyboard it is `SHIFT`+`2`.
    #[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
    #[cfg_attr(feature = "snapshot", serde(from = "u8", into = "u8"))]
    #[derive(Default, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy)]
    pub struct KeyOverrides: u8 {
        /// Assert a synthesized `SHIFT` in the reserved matrix slot.
        const FORCE_SHIFT     = 0b0001;
        /// Suppress a `SHIFT` currently held in the first matrix slot.
        const FORCE_NO_SHIFT  = 0b0010;
        /// Assert a synthesized `C=` key in the reserved matrix slot.
        const FORCE_COMMODORE = 0b0100;
        /// Hold the `RESTORE` line (not a part of the matrix).
        const RESTORE         = 0b1000;
    }
}

impl ScanCode {
    /// Returns the raw matrix code.
    #[inline]
    pub const fn code(self) -> u8 {
        self.0
    }
    /// Returns `true` if this is the [ScanCode::NO_KEY] sentinel.
    #[inline]
    pub const fn is_no_key(self) -> bool {
        self.0 == ScanCode::NO_KEY.0
    }
    /// Returns `true` for one of the `SHIFT` keys.
    #[inline]
    pub const fn is_shift(self) -> bool {
        self.0 == ScanCode::LSHIFT.0 || self.0 == ScanCode::RSHIFT.0
    }
    /// Returns `true` for the keys found only on the C128 keyboard.
    #[inline]
    pub const fn is_c128_only(self) -> bool {
        self.0 >= ScanCode::HELP.0 && self.0 < ScanCode::NO_KEY.0
    }
    /// Returns the name of the key.
    pub fn name(self) -> &'static str {
        SCAN_CODE_NAMES[usize::from(self.0)]
    }
}

impl Default for ScanCode {
    fn default() -> Self {
        ScanCode::NO_KEY
    }
}

impl fmt::Debug for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScanCode::{}", self.name())
    }
}

impl fmt::Display for ScanCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::error::Error for TryFromU8ScanCodeError {}

impl fmt::Display for TryFromU8ScanCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "converted integer ({}) out of range for `ScanCode`", self.0)
    }
}

impl TryFrom<u8> for ScanCode {
    type Error = TryFromU8ScanCodeError;
    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if usize::from(code) < SCAN_CODE_COUNT {
            Ok(ScanCode(code))
        }
        else {
            Err(TryFromU8ScanCodeError(code))
        }
    }
}

impl From<ScanCode> for u8 {
    fn from(code: ScanCode) -> u8 {
        code.0
    }
}

impl From<ScanCode> for u16 {
    fn from(code: ScanCode) -> u16 {
        code.0.into()
    }
}

impl From<u8> for KeyOverrides {
    fn from(flags: u8) -> Self {
        KeyOverrides::from_bits_truncate(flags)
    }
}

impl From<KeyOverrides> for u8 {
    fn from(flags: KeyOverrides) -> Self {
        flags.bits()
    }
}
