/*
    Copyright (C) 2024  CBMHOST contributors

    This file is part of CBMHOST, a Rust library for connecting emulated
    Commodore 8-bit computers to host keyboards and terminals.

    For the full copyright notice, see the lib.rs file.
*/
//! The Commodore keyboard scan matrix emulator.
//!
//! Host key events are resolved through an ordered [key map][keymap::DEFAULT_KEY_MAP] into
//! the Commodore 128 matrix codes held in a [ScanMatrix]. The emulated keyboard scan routine
//! reads a snapshot of the matrix, optionally [translated][ScanMatrix::encode] to the codes
//! of the C64 or the VIC-20.
pub mod keymap;
mod matrix;

pub use keymap::{KeyMapEntry, KeyMapping, DEFAULT_KEY_MAP};
pub use matrix::*;
