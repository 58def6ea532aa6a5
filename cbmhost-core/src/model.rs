/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! Emulated machine models and their keyboard wiring.
use core::fmt;
use core::str::FromStr;

#[cfg(feature = "snapshot")]
use serde::{Serialize, Deserialize};

use crate::scan::{ScanCode, RESTORE_FLAG};

/// The emulated Commodore computer.
///
/// The model determines how the native C128 matrix codes are presented to the
/// emulated keyboard scan routine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "snapshot", derive(Serialize, Deserialize))]
pub enum MachineModel {
    C64,
    C128,
    Vic20,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParseMachineModelError;

/// The "no key" code of the C64 and the VIC-20 keyboard scan routines.
pub const C64_NO_KEY: u16 = 64;

// C64 equivalents of the C128 only keys, indexed by `code - 64`.
const C128_TO_C64: [u8; 24] = [
    64, 27, 16, 64, 59, 11, 24, 56,
    64, 40, 43, 64,  1, 19, 32,  8,
    64, 35, 44,  7,  7,  2,  2, 64
];

const VIC20_ROW: [u8; 8] = [0, 1, 2, 7, 4, 5, 6, 3];
const VIC20_COL: [u8; 8] = [7, 1, 2, 3, 4, 5, 6, 0];

impl Default for MachineModel {
    fn default() -> Self {
        MachineModel::C64
    }
}

impl MachineModel {
    /// Returns the raw code the keyboard scan routine of this model reads as "no key".
    pub fn no_key(self) -> u16 {
        match self {
            MachineModel::C128 => ScanCode::NO_KEY.into(),
            _ => C64_NO_KEY
        }
    }
    /// Translates a C128 matrix `code` to the raw code of this model.
    ///
    /// The C128 only keys are translated to their C64 equivalents, if there are any.
    /// If `restore` is `true` the [RESTORE_FLAG] is added to the result.
    ///
    /// # Example
    /// ```
    /// use cbmhost_core::{MachineModel, ScanCode};
    /// // the C128 numeric pad 8 is the C64 digit 8
    /// assert_eq!(MachineModel::C64.encode(ScanCode::NUM_8, false), 27);
    /// assert_eq!(MachineModel::C64.encode(ScanCode::NO_KEY, true), 0x440);
    /// ```
    pub fn encode(self, code: ScanCode, restore: bool) -> u16 {
        let flag = if restore { RESTORE_FLAG } else { 0 };
        let code = code.code();
        if self == MachineModel::C128 {
            return u16::from(code) | flag
        }
        let code = if code >= ScanCode::NO_KEY.code() {
            C64_NO_KEY as u8
        }
        else if code > C64_NO_KEY as u8 {
            C128_TO_C64[usize::from(code) - C64_NO_KEY as usize]
        }
        else {
            code
        };
        let code = if self == MachineModel::Vic20 && u16::from(code) < C64_NO_KEY {
            (VIC20_ROW[usize::from(code & 7)] << 3) | VIC20_COL[usize::from(code >> 3)]
        }
        else {
            code
        };
        u16::from(code) | flag
    }
    /// Returns `true` if the model's keyboard has the extra C128 keys.
    pub fn has_extended_keys(self) -> bool {
        self == MachineModel::C128
    }
}

impl From<MachineModel> for &'static str {
    fn from(model: MachineModel) -> &'static str {
        match model {
            MachineModel::C64   => "C64",
            MachineModel::C128  => "C128",
            MachineModel::Vic20 => "VIC-20",
        }
    }
}

impl fmt::Display for MachineModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(<&str>::from(*self))
    }
}

impl std::error::Error for ParseMachineModelError {}

impl fmt::Display for ParseMachineModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("unrecognized machine model")
    }
}

impl FromStr for MachineModel {
    type Err = ParseMachineModelError;
    /// Parses the model name using case insensitive matching.
    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let name = name.trim();
        if name.eq_ignore_ascii_case("c64") {
            Ok(MachineModel::C64)
        }
        else if name.eq_ignore_ascii_case("c128") {
            Ok(MachineModel::C128)
        }
        else if name.eq_ignore_ascii_case("vic-20") ||
                name.eq_ignore_ascii_case("vic20") {
            Ok(MachineModel::Vic20)
        }
        else {
            Err(ParseMachineModelError)
        }
    }
}
